// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error types for schema validation, filter construction and repository calls.

use thiserror::Error;

use crate::backend::BackendError;

/// Errors raised by the pure query layer (schema, filters, criteria).
///
/// None of these are transient: they describe input that can never
/// compile into a valid Typesense request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown filter operator '{operator}' on field '{field}' (expected one of eq, contains, neq, gt, gte, lt, lte)")]
    UnknownOperator { field: String, operator: String },

    #[error("Invalid filter value for '{field}': {reason}")]
    InvalidFilter { field: String, reason: String },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Field '{0}' is not searchable")]
    NotSearchable(String),

    #[error("Field '{0}' is not sortable")]
    NotSortable(String),

    #[error("Field '{0}' is not facetable")]
    NotFacetable(String),

    #[error("Field '{0}' is not a vector field")]
    NotVectorField(String),
}

/// Errors surfaced by [`crate::collection::CollectionRepo`].
#[derive(Error, Debug)]
pub enum RepoError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Failed to decode backend response: {0}")]
    Decode(#[source] serde_json::Error),
}
