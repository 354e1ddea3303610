// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Collection schema: validated, ordered field set plus derived capabilities.
//!
//! # Collection Declaration
//!
//! ```text
//! POST /collections
//! {
//!   "name": "products",
//!   "fields": [
//!     {"name": ".*", "type": "auto", "sort": false, "facet": false, "index": true},
//!     {"name": "id", "type": "string", "optional": false},
//!     {"name": "name", "type": "string", "optional": false, "facet": true, "sort": true},
//!     {"name": "price", "type": "float", "optional": false, "sort": true}
//!   ],
//!   "token_separators": ["@", "-", ".", ...]
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::field::{EmbedConfig, Field, FieldType};
use crate::config::DEFAULT_TOKEN_SEPARATORS;
use crate::error::QueryError;

/// Name of the mandatory document id field.
pub const ID_FIELD: &str = "id";

/// Name of the catch-all declaration that lets Typesense auto-type undeclared fields.
pub const WILDCARD_FIELD: &str = ".*";

/// Field-name sets derived once from a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCapabilities {
    /// Indexed, string-like, not `id` (default `query_by` set)
    pub searchable: Vec<String>,
    /// `facet: true`
    pub facetable: Vec<String>,
    /// `sort: true`
    pub sortable: Vec<String>,
    /// `float[]` with `num_dim`
    pub vector: Vec<String>,
}

impl FieldCapabilities {
    fn derive(fields: &[(String, Field)]) -> Self {
        let mut caps = Self::default();
        for (name, field) in fields {
            if field.is_indexed()
                && field.field_type.is_string_like()
                && name != ID_FIELD
                && name != WILDCARD_FIELD
            {
                caps.searchable.push(name.clone());
            }
            if field.is_facetable() {
                caps.facetable.push(name.clone());
            }
            if field.is_sortable() {
                caps.sortable.push(name.clone());
            }
            if field.is_vector() {
                caps.vector.push(name.clone());
            }
        }
        caps
    }
}

/// Immutable, validated description of a collection.
///
/// Built with [`CollectionSchema::builder`]. Guarantees:
/// - an `id` field exists, is a `string`, and is never optional
/// - field names are unique and never the reserved wildcard `.*`
/// - declaration order is preserved
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSchema {
    name: String,
    fields: Vec<(String, Field)>,
    token_separators: Option<Vec<String>>,
    default_sorting_field: Option<String>,
    capabilities: FieldCapabilities,
}

impl CollectionSchema {
    /// Start building a schema for the named collection.
    pub fn builder(name: impl Into<String>) -> CollectionSchemaBuilder {
        CollectionSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            token_separators: None,
            default_sorting_field: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, field)| field)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    #[must_use]
    pub fn capabilities(&self) -> &FieldCapabilities {
        &self.capabilities
    }

    /// Fields used for `query_by` when the caller does not pick any.
    #[must_use]
    pub fn searchable_fields(&self) -> &[String] {
        &self.capabilities.searchable
    }

    #[must_use]
    pub fn facetable_fields(&self) -> &[String] {
        &self.capabilities.facetable
    }

    #[must_use]
    pub fn sortable_fields(&self) -> &[String] {
        &self.capabilities.sortable
    }

    #[must_use]
    pub fn vector_fields(&self) -> &[String] {
        &self.capabilities.vector
    }

    #[must_use]
    pub fn default_sorting_field(&self) -> Option<&str> {
        self.default_sorting_field.as_deref()
    }

    /// Project the schema into Typesense field declarations.
    ///
    /// The wildcard `.*` auto declaration always comes first, followed by every
    /// declared field with `optional` normalized to a concrete boolean.
    #[must_use]
    pub fn to_fields_array(&self) -> Vec<FieldDeclaration> {
        let mut declarations = Vec::with_capacity(self.fields.len() + 1);
        declarations.push(FieldDeclaration::wildcard());
        declarations.extend(
            self.fields
                .iter()
                .map(|(name, field)| FieldDeclaration::from_field(name, field)),
        );
        declarations
    }

    /// Full `POST /collections` body, falling back to the default token separators.
    #[must_use]
    pub fn to_declaration(&self) -> CollectionDeclaration {
        CollectionDeclaration {
            name: self.name.clone(),
            fields: self.to_fields_array(),
            token_separators: self.token_separators.clone().unwrap_or_else(|| {
                DEFAULT_TOKEN_SEPARATORS
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            }),
            default_sorting_field: self.default_sorting_field.clone(),
        }
    }

    /// Parse a schema from its JSON form, keeping the field order of the object.
    ///
    /// ```text
    /// {"name": "products", "fields": {"name": {"type": "string"}, ...}}
    /// ```
    pub fn from_json(value: &serde_json::Value) -> Result<Self, QueryError> {
        let raw: RawCollectionSchema = serde_json::from_value(value.clone())
            .map_err(|e| QueryError::InvalidSchema(e.to_string()))?;

        let mut builder = Self::builder(raw.name);
        for (name, field) in raw.fields {
            let field: Field = serde_json::from_value(field)
                .map_err(|e| QueryError::InvalidSchema(format!("field '{}': {}", name, e)))?;
            builder = builder.field(name, field);
        }
        if let Some(separators) = raw.token_separators {
            builder = builder.token_separators(separators);
        }
        if let Some(sorting_field) = raw.default_sorting_field {
            builder = builder.default_sorting_field(sorting_field);
        }
        builder.build()
    }
}

#[derive(Deserialize)]
struct RawCollectionSchema {
    name: String,
    fields: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    token_separators: Option<Vec<String>>,
    #[serde(default)]
    default_sorting_field: Option<String>,
}

/// Builder for [`CollectionSchema`].
#[derive(Debug, Clone)]
pub struct CollectionSchemaBuilder {
    name: String,
    fields: Vec<(String, Field)>,
    token_separators: Option<Vec<String>>,
    default_sorting_field: Option<String>,
}

impl CollectionSchemaBuilder {
    /// Declare a field. Order of calls is the declaration order.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    /// Add a plain string field
    pub fn string(self, name: impl Into<String>) -> Self {
        self.field(name, Field::string())
    }

    /// Add a facetable string field
    pub fn string_facet(self, name: impl Into<String>) -> Self {
        self.field(name, Field::string().facet())
    }

    /// Add a sortable float field
    pub fn float_sortable(self, name: impl Into<String>) -> Self {
        self.field(name, Field::float().sort())
    }

    /// Add a sortable int64 field (timestamps, counters)
    pub fn int64_sortable(self, name: impl Into<String>) -> Self {
        self.field(name, Field::int64().sort())
    }

    /// Add an embedding field
    pub fn vector(self, name: impl Into<String>, num_dim: u32) -> Self {
        self.field(name, Field::vector(num_dim))
    }

    pub fn token_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.token_separators = Some(separators.into_iter().map(Into::into).collect());
        self
    }

    pub fn default_sorting_field(mut self, name: impl Into<String>) -> Self {
        self.default_sorting_field = Some(name.into());
        self
    }

    /// Validate and freeze the schema.
    pub fn build(self) -> Result<CollectionSchema, QueryError> {
        if self.name.trim().is_empty() {
            return Err(QueryError::InvalidSchema(
                "collection name must not be empty".into(),
            ));
        }

        let mut fields = self.fields;
        for (i, (name, field)) in fields.iter().enumerate() {
            if name.is_empty() {
                return Err(QueryError::InvalidSchema("field name must not be empty".into()));
            }
            if name == WILDCARD_FIELD {
                return Err(QueryError::InvalidSchema(format!(
                    "'{}' is reserved for the auto-typed wildcard declaration",
                    WILDCARD_FIELD
                )));
            }
            if fields[..i].iter().any(|(earlier, _)| earlier == name) {
                return Err(QueryError::InvalidSchema(format!(
                    "field '{}' declared more than once",
                    name
                )));
            }
            if name == ID_FIELD {
                if field.field_type != FieldType::String {
                    return Err(QueryError::InvalidSchema(format!(
                        "'id' must be of type string, got {}",
                        field.field_type
                    )));
                }
                if field.is_optional() {
                    return Err(QueryError::InvalidSchema("'id' can never be optional".into()));
                }
            }
        }

        if !fields.iter().any(|(name, _)| name == ID_FIELD) {
            fields.insert(0, (ID_FIELD.to_string(), Field::string()));
        }

        if let Some(ref sorting_field) = self.default_sorting_field {
            let field = fields
                .iter()
                .find(|(name, _)| name == sorting_field)
                .map(|(_, field)| field)
                .ok_or_else(|| {
                    QueryError::InvalidSchema(format!(
                        "default_sorting_field '{}' is not declared",
                        sorting_field
                    ))
                })?;
            if !matches!(
                field.field_type,
                FieldType::Int32 | FieldType::Int64 | FieldType::Float
            ) {
                return Err(QueryError::InvalidSchema(format!(
                    "default_sorting_field '{}' must be numeric, got {}",
                    sorting_field, field.field_type
                )));
            }
        }

        let capabilities = FieldCapabilities::derive(&fields);
        Ok(CollectionSchema {
            name: self.name,
            fields,
            token_separators: self.token_separators,
            default_sorting_field: self.default_sorting_field,
            capabilities,
        })
    }
}

/// One entry of the `fields` array sent to Typesense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub name: String,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_dim: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<EmbedConfig>,
}

impl FieldDeclaration {
    /// `{name: ".*", type: "auto", sort: false, facet: false, index: true}`
    #[must_use]
    pub fn wildcard() -> Self {
        Self {
            name: WILDCARD_FIELD.to_string(),
            field_type: FieldType::Auto,
            index: Some(true),
            optional: None,
            facet: Some(false),
            sort: Some(false),
            locale: None,
            infix: None,
            num_dim: None,
            embed: None,
        }
    }

    fn from_field(name: &str, field: &Field) -> Self {
        Self {
            name: name.to_string(),
            field_type: field.field_type,
            index: field.index,
            optional: Some(field.is_optional()),
            facet: field.facet,
            sort: field.sort,
            locale: field.locale.clone(),
            infix: field.infix,
            num_dim: field.num_dim,
            embed: field.embed.clone(),
        }
    }
}

/// Body of a create-collection request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDeclaration {
    pub name: String,
    pub fields: Vec<FieldDeclaration>,
    pub token_separators: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sorting_field: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn products() -> CollectionSchema {
        CollectionSchema::builder("products")
            .field("id", Field::string())
            .field("name", Field::string().facet().sort())
            .field("description", Field::string())
            .field("price", Field::float().facet().sort())
            .build()
            .unwrap()
    }

    #[test]
    fn test_searchable_fields_skip_id_and_non_strings() {
        let schema = products();
        assert_eq!(schema.searchable_fields(), ["name", "description"]);
        assert_eq!(schema.facetable_fields(), ["name", "price"]);
        assert_eq!(schema.sortable_fields(), ["name", "price"]);
        assert!(schema.vector_fields().is_empty());
    }

    #[test]
    fn test_unindexed_string_not_searchable() {
        let schema = CollectionSchema::builder("notes")
            .string("title")
            .field("raw", Field::string().no_index())
            .field("tags", Field::string_array().facet())
            .build()
            .unwrap();
        assert_eq!(schema.searchable_fields(), ["title", "tags"]);
    }

    #[test]
    fn test_id_inserted_when_missing() {
        let schema = CollectionSchema::builder("notes").string("title").build().unwrap();
        let names: Vec<&str> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["id", "title"]);
        assert_eq!(schema.field("id").unwrap().field_type, FieldType::String);
    }

    #[test]
    fn test_id_must_be_required_string() {
        let err = CollectionSchema::builder("notes")
            .field("id", Field::int64())
            .build()
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidSchema(_)));

        let err = CollectionSchema::builder("notes")
            .field("id", Field::string().optional())
            .build()
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidSchema(_)));
    }

    #[test]
    fn test_duplicate_and_reserved_names_rejected() {
        assert!(CollectionSchema::builder("notes")
            .string("title")
            .string("title")
            .build()
            .is_err());
        assert!(CollectionSchema::builder("notes")
            .field(".*", Field::new(FieldType::Auto))
            .build()
            .is_err());
        assert!(CollectionSchema::builder("  ").build().is_err());
    }

    #[test]
    fn test_default_sorting_field_must_be_numeric_and_declared() {
        assert!(CollectionSchema::builder("p")
            .float_sortable("price")
            .default_sorting_field("price")
            .build()
            .is_ok());
        assert!(CollectionSchema::builder("p")
            .default_sorting_field("missing")
            .build()
            .is_err());
        assert!(CollectionSchema::builder("p")
            .string("name")
            .default_sorting_field("name")
            .build()
            .is_err());
    }

    #[test]
    fn test_fields_array_starts_with_wildcard() {
        let fields = products().to_fields_array();
        assert_eq!(fields.len(), 5);
        assert_eq!(
            serde_json::to_value(&fields[0]).unwrap(),
            json!({"name": ".*", "type": "auto", "sort": false, "facet": false, "index": true})
        );
        assert_eq!(
            serde_json::to_value(&fields[1]).unwrap(),
            json!({"name": "id", "type": "string", "optional": false})
        );
        assert_eq!(
            serde_json::to_value(&fields[2]).unwrap(),
            json!({"name": "name", "type": "string", "optional": false, "facet": true, "sort": true})
        );
    }

    #[test]
    fn test_fields_array_normalizes_optional() {
        let schema = CollectionSchema::builder("events")
            .field("payload", Field::string().no_index())
            .field("note", Field::string().optional())
            .build()
            .unwrap();
        let fields = schema.to_fields_array();
        assert_eq!(fields[2].optional, Some(true));
        assert_eq!(fields[2].index, Some(false));
        assert_eq!(fields[3].optional, Some(true));
    }

    #[test]
    fn test_declaration_uses_default_separators() {
        let declaration = products().to_declaration();
        assert_eq!(declaration.name, "products");
        assert_eq!(declaration.token_separators.len(), DEFAULT_TOKEN_SEPARATORS.len());
        assert_eq!(declaration.token_separators[0], "@");

        let custom = CollectionSchema::builder("tags")
            .token_separators(["-"])
            .build()
            .unwrap()
            .to_declaration();
        assert_eq!(custom.token_separators, vec!["-".to_string()]);
    }

    #[test]
    fn test_from_json_preserves_field_order() {
        let schema = CollectionSchema::from_json(&json!({
            "name": "products",
            "fields": {
                "id": {"type": "string"},
                "title": {"type": "string", "facet": true},
                "brand": {"type": "string"},
                "embedding": {"type": "float[]", "num_dim": 3}
            }
        }))
        .unwrap();
        assert_eq!(schema.searchable_fields(), ["title", "brand"]);
        assert_eq!(schema.vector_fields(), ["embedding"]);

        let err = CollectionSchema::from_json(&json!({
            "name": "products",
            "fields": {"title": {"type": "text"}}
        }))
        .unwrap_err();
        assert!(matches!(err, QueryError::InvalidSchema(_)));
    }

    #[test]
    fn test_embed_carried_into_declaration() {
        let schema = CollectionSchema::from_json(&json!({
            "name": "products",
            "fields": {
                "name": {"type": "string"},
                "embedding": {
                    "type": "float[]",
                    "embed": {
                        "from": ["name"],
                        "model_config": {"model_name": "ts/all-MiniLM-L12-v2"}
                    }
                }
            }
        }))
        .unwrap();
        assert_eq!(schema.vector_fields(), ["embedding"]);

        let declaration = serde_json::to_value(schema.to_declaration()).unwrap();
        assert_eq!(
            declaration["fields"][3],
            json!({
                "name": "embedding",
                "type": "float[]",
                "optional": false,
                "embed": {
                    "from": ["name"],
                    "model_config": {"model_name": "ts/all-MiniLM-L12-v2"}
                }
            })
        );
    }
}
