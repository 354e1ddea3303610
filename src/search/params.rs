// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Parameter Assembler
//!
//! Flattens [`SearchCriteria`] into the parameter set Typesense reads from
//! `GET /collections/{name}/documents/search`.
//!
//! # Defaults
//!
//! ```text
//! q         → "*"
//! query_by  → every searchable schema field, declaration order
//! sort_by   → omitted (text-match relevance)
//! filter_by → omitted when the compiled filter is empty
//! ```
//!
//! `criteria.search_params` is merged last and wins over everything above.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::criteria::{FilterSpec, SearchCriteria};
use super::filter_compiler::FilterCompiler;
use crate::schema::CollectionSchema;

/// Compiled, wire-ready search parameters.
///
/// Unset parameters are omitted from the serialized form. Parameters this
/// crate does not model (`num_typos`, `highlight_fields`, ...) live in
/// `extra` and pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_by_weights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_facet_values: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_fields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_fields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_query: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchParams {
    /// Shallow merge: every parameter set in `overrides` replaces ours.
    #[must_use]
    pub fn merge(mut self, overrides: SearchParams) -> Self {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.q, overrides.q);
        take(&mut self.query_by, overrides.query_by);
        take(&mut self.query_by_weights, overrides.query_by_weights);
        take(&mut self.sort_by, overrides.sort_by);
        take(&mut self.facet_by, overrides.facet_by);
        take(&mut self.facet_query, overrides.facet_query);
        take(&mut self.max_facet_values, overrides.max_facet_values);
        take(&mut self.filter_by, overrides.filter_by);
        take(&mut self.include_fields, overrides.include_fields);
        take(&mut self.exclude_fields, overrides.exclude_fields);
        take(&mut self.group_by, overrides.group_by);
        take(&mut self.group_limit, overrides.group_limit);
        take(&mut self.page, overrides.page);
        take(&mut self.per_page, overrides.per_page);
        take(&mut self.prefix, overrides.prefix);
        take(&mut self.vector_query, overrides.vector_query);
        self.extra.extend(overrides.extra);
        self
    }

    /// Flatten into `(name, value)` query-string pairs, in declaration order.
    pub fn to_query_pairs(&self) -> Result<Vec<(String, String)>, serde_json::Error> {
        let Value::Object(object) = serde_json::to_value(self)? else {
            return Ok(Vec::new());
        };

        Ok(object
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect())
    }
}

/// One entry of a `POST /multi_search` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiSearchRequest {
    pub collection: String,
    #[serde(flatten)]
    pub params: SearchParams,
}

/// Assemble search parameters from criteria and the collection schema.
///
/// Total over well-typed input: no I/O, no failure path. Capability checks
/// live in [`SearchCriteria::validate`].
pub fn to_search_params(criteria: &SearchCriteria, schema: &CollectionSchema) -> SearchParams {
    let mut params = SearchParams {
        q: Some(
            criteria
                .q
                .clone()
                .filter(|q| !q.is_empty())
                .unwrap_or_else(|| "*".to_string()),
        ),
        ..SearchParams::default()
    };

    // Field selection; weights only when the caller chose the fields
    match criteria.query_by {
        Some(ref query_by) => {
            params.query_by = Some(query_by.fields_param());
            if !query_by.is_empty() {
                params.query_by_weights = Some(query_by.weights_param());
            }
        }
        None => params.query_by = Some(schema.searchable_fields().join(",")),
    }

    params.sort_by = criteria.sort.as_ref().and_then(|sort| sort.to_param());

    // Facets
    let facet_fields: Vec<&str> = criteria
        .facets
        .iter()
        .map(|facet| facet.field())
        .filter(|field| !field.is_empty())
        .collect();
    if !facet_fields.is_empty() {
        params.facet_by = Some(facet_fields.join(","));
        params.max_facet_values = criteria.max_facet_values;

        let mut queries = criteria.facets.iter().filter_map(|facet| facet.facet_query());
        params.facet_query = queries.next().map(str::to_string);
        for ignored in queries {
            warn!(
                collection = %schema.name(),
                facet_query = %ignored,
                "Only one facet_query is sent per search; ignoring"
            );
        }
    }

    params.filter_by = match criteria.filter {
        Some(FilterSpec::Raw(ref raw)) => Some(raw.clone()),
        Some(FilterSpec::Structured(ref filter)) => Some(FilterCompiler::compile_for(filter, schema)),
        None => None,
    }
    .filter(|compiled| !compiled.is_empty());

    params.include_fields = join_non_empty(criteria.include.as_deref());
    params.exclude_fields = join_non_empty(criteria.exclude.as_deref());

    params.group_by = join_non_empty(criteria.group_by.as_deref());
    if params.group_by.is_some() {
        params.group_limit = criteria.group_limit;
    }

    params.page = criteria.page;
    params.per_page = criteria.per_page;
    params.prefix = criteria.prefix;

    match criteria.search_params {
        Some(ref overrides) => params.merge(overrides.clone()),
        None => params,
    }
}

fn join_non_empty(fields: Option<&[String]>) -> Option<String> {
    fields.filter(|f| !f.is_empty()).map(|f| f.join(","))
}
