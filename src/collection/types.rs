// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Public types for the collection repository.

use crate::search::{Facets, SearchHit, SearchResponse};

/// A search response plus its facets keyed by field name.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<D> {
    pub response: SearchResponse<D>,
    pub facets: Facets,
}

impl<D> SearchResult<D> {
    pub fn hits(&self) -> &[SearchHit<D>] {
        &self.response.hits
    }

    pub fn documents(&self) -> impl Iterator<Item = &D> {
        self.response.documents()
    }

    #[must_use]
    pub fn found(&self) -> u64 {
        self.response.found
    }
}

/// A nearest-neighbour search request.
///
/// # Example
///
/// ```rust
/// use typesense_criteria::collection::VectorSearch;
///
/// let request = VectorSearch::new("embedding", vec![0.1, 0.2, 0.3])
///     .k(5)
///     .include(["title"]);
/// assert_eq!(request.k, Some(5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSearch {
    /// A declared `float[]` field with `num_dim`
    pub field: String,
    pub vector: Vec<f32>,
    /// Neighbours to return (default: `RepoConfig::default_vector_k`)
    pub k: Option<usize>,
    /// Fields to return (default: all)
    pub include: Option<Vec<String>>,
}

impl VectorSearch {
    pub fn new(field: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            field: field.into(),
            vector,
            k: None,
            include: None,
        }
    }

    pub fn k(mut self, k: usize) -> Self {
        self.k = Some(k);
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
}
