// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search criteria: the caller-facing description of a search.
//!
//! Every field is optional; [`super::to_search_params`] fills in defaults.
//! Criteria also deserialize from their JSON form:
//!
//! ```text
//! {
//!   "q": "laptop",
//!   "queryBy": {"name": 2, "description": 1},
//!   "sort": ["price:desc", "name:asc"],
//!   "facets": ["brand", {"field": "category", "facet_query": "category:shoe"}],
//!   "filter": {"price": {"gte": 100}},
//!   "_searchParams": {"num_typos": 0}
//! }
//! ```

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::filter::Filter;
use super::params::SearchParams;
use crate::error::QueryError;
use crate::schema::CollectionSchema;

/// Ordered `field → weight` mapping for `query_by` / `query_by_weights`.
///
/// Weights are relative boosts, 0 to 127.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
pub struct QueryBy {
    fields: Vec<(String, u32)>,
}

impl QueryBy {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field with its weight. Re-adding a field updates the weight in place.
    pub fn field(mut self, name: impl Into<String>, weight: u32) -> Self {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = weight;
        } else {
            self.fields.push((name, weight));
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.fields.iter().map(|(name, weight)| (name.as_str(), *weight))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `name,description`
    #[must_use]
    pub fn fields_param(&self) -> String {
        join(self.fields.iter().map(|(name, _)| name.clone()))
    }

    /// `2,1`
    #[must_use]
    pub fn weights_param(&self) -> String {
        join(self.fields.iter().map(|(_, weight)| weight.to_string()))
    }
}

impl TryFrom<Map<String, Value>> for QueryBy {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut query_by = QueryBy::new();
        for (name, weight) in map {
            let weight = weight
                .as_u64()
                .and_then(|w| u32::try_from(w).ok())
                .ok_or_else(|| format!("weight for '{}' must be a non-negative integer", name))?;
            query_by = query_by.field(name, weight);
        }
        Ok(query_by)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// `sort_by`: a raw string passed through, or a list joined with commas.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SortSpec {
    One(String),
    Many(Vec<String>),
}

impl SortSpec {
    /// `field:asc` / `field:desc`
    pub fn by(field: &str, order: SortOrder) -> Self {
        SortSpec::One(format!("{}:{}", field, order.as_str()))
    }

    /// Append another sort key, turning a single key into a list.
    pub fn then(self, field: &str, order: SortOrder) -> Self {
        let next = format!("{}:{}", field, order.as_str());
        match self {
            SortSpec::One(first) => SortSpec::Many(vec![first, next]),
            SortSpec::Many(mut keys) => {
                keys.push(next);
                SortSpec::Many(keys)
            }
        }
    }

    /// Wire value, `None` when nothing is left to sort by.
    #[must_use]
    pub fn to_param(&self) -> Option<String> {
        let param = match self {
            SortSpec::One(raw) => raw.clone(),
            SortSpec::Many(keys) => keys.join(","),
        };
        if param.is_empty() {
            None
        } else {
            Some(param)
        }
    }

    /// Field names referenced by the sort keys, skipping `_text_match` and friends.
    pub fn fields(&self) -> Vec<String> {
        let keys: Vec<&str> = match self {
            SortSpec::One(raw) => raw.split(',').collect(),
            SortSpec::Many(keys) => keys.iter().map(String::as_str).collect(),
        };
        keys.into_iter()
            .filter_map(|key| key.split(':').next())
            .map(str::trim)
            .filter(|name| !name.is_empty() && !name.starts_with('_'))
            .map(str::to_string)
            .collect()
    }
}

impl From<&str> for SortSpec {
    fn from(value: &str) -> Self {
        SortSpec::One(value.to_string())
    }
}

impl From<String> for SortSpec {
    fn from(value: String) -> Self {
        SortSpec::One(value)
    }
}

impl From<Vec<String>> for SortSpec {
    fn from(value: Vec<String>) -> Self {
        SortSpec::Many(value)
    }
}

impl From<Vec<&str>> for SortSpec {
    fn from(value: Vec<&str>) -> Self {
        SortSpec::Many(value.into_iter().map(str::to_string).collect())
    }
}

/// A facet request: a bare field name or a field with a `facet_query`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FacetRequest {
    Field(String),
    Query {
        field: String,
        /// Filters returned facet values, e.g. `category:shoe`
        #[serde(default)]
        facet_query: Option<String>,
    },
}

impl FacetRequest {
    pub fn with_query(field: impl Into<String>, facet_query: impl Into<String>) -> Self {
        FacetRequest::Query {
            field: field.into(),
            facet_query: Some(facet_query.into()),
        }
    }

    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            FacetRequest::Field(field) => field,
            FacetRequest::Query { field, .. } => field,
        }
    }

    #[must_use]
    pub fn facet_query(&self) -> Option<&str> {
        match self {
            FacetRequest::Field(_) => None,
            FacetRequest::Query { facet_query, .. } => {
                facet_query.as_deref().filter(|q| !q.is_empty())
            }
        }
    }
}

impl From<&str> for FacetRequest {
    fn from(value: &str) -> Self {
        FacetRequest::Field(value.to_string())
    }
}

impl From<String> for FacetRequest {
    fn from(value: String) -> Self {
        FacetRequest::Field(value)
    }
}

/// `filter_by`: a raw Typesense expression or a structured predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    Raw(String),
    Structured(Filter),
}

impl<'de> Deserialize<'de> for FilterSpec {
    fn deserialize<De>(deserializer: De) -> Result<Self, De::Error>
    where
        De: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(raw) => Ok(FilterSpec::Raw(raw)),
            value @ Value::Object(_) => Filter::from_json(&value)
                .map(FilterSpec::Structured)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "filter must be a string or an object, got {}",
                other
            ))),
        }
    }
}

impl From<Filter> for FilterSpec {
    fn from(value: Filter) -> Self {
        FilterSpec::Structured(value)
    }
}

impl From<&str> for FilterSpec {
    fn from(value: &str) -> Self {
        FilterSpec::Raw(value.to_string())
    }
}

impl From<String> for FilterSpec {
    fn from(value: String) -> Self {
        FilterSpec::Raw(value)
    }
}

/// Declarative description of a search.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    /// Query text (default `*`)
    #[serde(default)]
    pub q: Option<String>,
    /// Fields and weights (default: every searchable field, unweighted)
    #[serde(default)]
    pub query_by: Option<QueryBy>,
    /// Default: text-match relevance
    #[serde(default)]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub page: Option<u32>,
    /// Max 250
    #[serde(default, rename = "per_page")]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub facets: Vec<FacetRequest>,
    /// Only sent together with `facets`
    #[serde(default)]
    pub max_facet_values: Option<u32>,
    #[serde(default)]
    pub filter: Option<FilterSpec>,
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    /// Facetable fields to group hits by
    #[serde(default)]
    pub group_by: Option<Vec<String>>,
    /// Max hits per group
    #[serde(default)]
    pub group_limit: Option<u32>,
    /// Prefix matching on the last token (typeahead)
    #[serde(default)]
    pub prefix: Option<bool>,
    /// Raw parameter overrides, applied last
    #[serde(default, rename = "_searchParams")]
    pub search_params: Option<SearchParams>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn query_by(mut self, query_by: QueryBy) -> Self {
        self.query_by = Some(query_by);
        self
    }

    pub fn sort(mut self, sort: impl Into<SortSpec>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn facet(mut self, facet: impl Into<FacetRequest>) -> Self {
        self.facets.push(facet.into());
        self
    }

    pub fn max_facet_values(mut self, max: u32) -> Self {
        self.max_facet_values = Some(max);
        self
    }

    pub fn filter(mut self, filter: impl Into<FilterSpec>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn include<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn group_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn group_limit(mut self, limit: u32) -> Self {
        self.group_limit = Some(limit);
        self
    }

    pub fn prefix(mut self, prefix: bool) -> Self {
        self.prefix = Some(prefix);
        self
    }

    pub fn search_params(mut self, overrides: SearchParams) -> Self {
        self.search_params = Some(overrides);
        self
    }

    /// Check field capabilities against the schema.
    ///
    /// Only declared fields are checked; undeclared ones are auto-typed by
    /// Typesense and cannot be judged here.
    pub fn validate(&self, schema: &CollectionSchema) -> Result<(), QueryError> {
        if let Some(ref query_by) = self.query_by {
            for (name, _) in query_by.iter() {
                if schema.contains(name) && !schema.searchable_fields().iter().any(|f| f == name) {
                    return Err(QueryError::NotSearchable(name.to_string()));
                }
            }
        }

        if let Some(ref sort) = self.sort {
            for name in sort.fields() {
                if schema.contains(&name) && !schema.sortable_fields().contains(&name) {
                    return Err(QueryError::NotSortable(name));
                }
            }
        }

        let facet_fields = self
            .facets
            .iter()
            .map(FacetRequest::field)
            .chain(self.group_by.iter().flatten().map(String::as_str));
        for name in facet_fields {
            if schema.contains(name) && !schema.facetable_fields().iter().any(|f| f == name) {
                return Err(QueryError::NotFacetable(name.to_string()));
            }
        }

        Ok(())
    }
}

fn join<I: Iterator<Item = String>>(parts: I) -> String {
    parts.collect::<Vec<_>>().join(",")
}
