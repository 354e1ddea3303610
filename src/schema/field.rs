// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Field types and per-field descriptors.
//!
//! A [`Field`] mirrors one entry of a Typesense collection schema:
//!
//! ```text
//! { "type": "string", "facet": true, "sort": true }
//! { "type": "float[]", "num_dim": 384 }
//! { "type": "int64", "index": false }
//! ```

use serde::{Deserialize, Serialize};

/// Primitive Typesense field type, including the array variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "string[]")]
    StringArray,
    /// `string*`: a string or an array of strings
    #[serde(rename = "string*")]
    StringAuto,
    #[serde(rename = "int32")]
    Int32,
    #[serde(rename = "int32[]")]
    Int32Array,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "int64[]")]
    Int64Array,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "float[]")]
    FloatArray,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "bool[]")]
    BoolArray,
    #[serde(rename = "geopoint")]
    Geopoint,
    #[serde(rename = "geopoint[]")]
    GeopointArray,
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "object[]")]
    ObjectArray,
    #[serde(rename = "auto")]
    Auto,
}

impl FieldType {
    /// Wire name as used in collection declarations.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::StringArray => "string[]",
            FieldType::StringAuto => "string*",
            FieldType::Int32 => "int32",
            FieldType::Int32Array => "int32[]",
            FieldType::Int64 => "int64",
            FieldType::Int64Array => "int64[]",
            FieldType::Float => "float",
            FieldType::FloatArray => "float[]",
            FieldType::Bool => "bool",
            FieldType::BoolArray => "bool[]",
            FieldType::Geopoint => "geopoint",
            FieldType::GeopointArray => "geopoint[]",
            FieldType::Object => "object",
            FieldType::ObjectArray => "object[]",
            FieldType::Auto => "auto",
        }
    }

    /// Free-text matching only applies to string-like types.
    #[must_use]
    pub fn is_string_like(self) -> bool {
        matches!(
            self,
            FieldType::String | FieldType::StringArray | FieldType::StringAuto
        )
    }

    #[must_use]
    pub fn is_array(self) -> bool {
        matches!(
            self,
            FieldType::StringArray
                | FieldType::StringAuto
                | FieldType::Int32Array
                | FieldType::Int64Array
                | FieldType::FloatArray
                | FieldType::BoolArray
                | FieldType::GeopointArray
                | FieldType::ObjectArray
        )
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative description of a single field.
///
/// Capability flags left as `None` are omitted from the collection
/// declaration so Typesense applies its own defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infix: Option<bool>,
    /// Dimensions of a `float[]` embedding field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_dim: Option<u32>,
    /// Auto-embedding: Typesense computes the vector from other fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<EmbedConfig>,
}

/// `embed` block of an auto-embedded `float[]` field.
///
/// ```text
/// {"from": ["name"], "model_config": {"model_name": "ts/all-MiniLM-L12-v2"}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Fields combined into the embedded text
    pub from: Vec<String>,
    pub model_config: ModelConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Provider-specific settings (`url`, `indexing_prefix`, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Field {
    /// Create a field of the given type with every flag unset.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            index: None,
            optional: None,
            facet: None,
            sort: None,
            locale: None,
            infix: None,
            num_dim: None,
            embed: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn string_array() -> Self {
        Self::new(FieldType::StringArray)
    }

    pub fn int32() -> Self {
        Self::new(FieldType::Int32)
    }

    pub fn int64() -> Self {
        Self::new(FieldType::Int64)
    }

    pub fn float() -> Self {
        Self::new(FieldType::Float)
    }

    pub fn bool() -> Self {
        Self::new(FieldType::Bool)
    }

    pub fn geopoint() -> Self {
        Self::new(FieldType::Geopoint)
    }

    /// An embedding field: `float[]` with a fixed dimensionality.
    pub fn vector(num_dim: u32) -> Self {
        let mut field = Self::new(FieldType::FloatArray);
        field.num_dim = Some(num_dim);
        field
    }

    /// An auto-embedded `float[]` field computed from `from` with the named model.
    pub fn embedding<I, S>(from: I, model_name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = Self::new(FieldType::FloatArray);
        field.embed = Some(EmbedConfig {
            from: from.into_iter().map(Into::into).collect(),
            model_config: ModelConfig {
                model_name: model_name.into(),
                api_key: None,
                extra: serde_json::Map::new(),
            },
        });
        field
    }

    /// Mark as facetable
    pub fn facet(mut self) -> Self {
        self.facet = Some(true);
        self
    }

    /// Mark as sortable
    pub fn sort(mut self) -> Self {
        self.sort = Some(true);
        self
    }

    /// Mark as optional
    pub fn optional(mut self) -> Self {
        self.optional = Some(true);
        self
    }

    /// Store the value without indexing it. Unindexed fields are always optional.
    pub fn no_index(mut self) -> Self {
        self.index = Some(false);
        self
    }

    /// Enable infix (substring) search
    pub fn infix(mut self) -> Self {
        self.infix = Some(true);
        self
    }

    /// Set the tokenizer locale (e.g. "ja", "th")
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.index != Some(false)
    }

    #[must_use]
    pub fn is_facetable(&self) -> bool {
        self.facet == Some(true)
    }

    #[must_use]
    pub fn is_sortable(&self) -> bool {
        self.sort == Some(true)
    }

    /// Normalized optionality: unindexed fields can never be required.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        !self.is_indexed() || self.optional == Some(true)
    }

    /// `float[]` with either a fixed `num_dim` or an `embed` source.
    #[must_use]
    pub fn is_vector(&self) -> bool {
        self.field_type == FieldType::FloatArray && (self.num_dim.is_some() || self.embed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_wire_names() {
        assert_eq!(FieldType::String.to_string(), "string");
        assert_eq!(FieldType::FloatArray.to_string(), "float[]");
        assert_eq!(FieldType::StringAuto.to_string(), "string*");
        assert_eq!(
            serde_json::to_string(&FieldType::GeopointArray).unwrap(),
            "\"geopoint[]\""
        );
        let parsed: FieldType = serde_json::from_str("\"int64[]\"").unwrap();
        assert_eq!(parsed, FieldType::Int64Array);
    }

    #[test]
    fn test_string_like_types() {
        assert!(FieldType::String.is_string_like());
        assert!(FieldType::StringArray.is_string_like());
        assert!(FieldType::StringAuto.is_string_like());
        assert!(!FieldType::Float.is_string_like());
        assert!(!FieldType::Auto.is_string_like());
    }

    #[test]
    fn test_unset_flags_are_not_serialized() {
        let field = Field::string().facet().sort();
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "string", "facet": true, "sort": true})
        );
    }

    #[test]
    fn test_no_index_implies_optional() {
        assert!(Field::int64().no_index().is_optional());
        assert!(Field::string().optional().is_optional());
        assert!(!Field::string().is_optional());
    }

    #[test]
    fn test_vector_field() {
        let field = Field::vector(384);
        assert!(field.is_vector());
        assert!(!Field::new(FieldType::FloatArray).is_vector());
        assert!(!Field::float().is_vector());
    }

    #[test]
    fn test_embedded_field_is_vector() {
        let field = Field::embedding(["name", "description"], "ts/all-MiniLM-L12-v2");
        assert!(field.is_vector());
        assert_eq!(field.num_dim, None);
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            serde_json::json!({
                "type": "float[]",
                "embed": {
                    "from": ["name", "description"],
                    "model_config": {"model_name": "ts/all-MiniLM-L12-v2"}
                }
            })
        );
    }

    #[test]
    fn test_embed_model_config_keeps_provider_keys() {
        let field: Field = serde_json::from_value(serde_json::json!({
            "type": "float[]",
            "embed": {
                "from": ["name"],
                "model_config": {"model_name": "openai/text-embedding-ada-002", "api_key": "sk", "url": "http://proxy"}
            }
        }))
        .unwrap();
        let config = &field.embed.as_ref().unwrap().model_config;
        assert_eq!(config.api_key.as_deref(), Some("sk"));
        assert_eq!(config.extra["url"], "http://proxy");
    }
}
