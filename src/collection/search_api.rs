// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search API for CollectionRepo
//!
//! ```text
//! search(criteria)
//!       │
//!       ├─→ validate against schema capabilities
//!       ├─→ ensure collection
//!       ├─→ to_search_params → backend.search
//!       └─→ decode hits + parse_facets
//!
//! vector_search(request)
//!       │
//!       └─→ vector_query via backend.multi_search → first response
//! ```

use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::types::{SearchResult, VectorSearch};
use super::{decode, observe, CollectionRepo};
use crate::backend::BackendError;
use crate::error::RepoError;
use crate::metrics::{self, LatencyTimer};
use crate::search::{
    parse_facets, to_search_params, MultiSearchRequest, SearchCriteria, SearchParams,
    SearchResponse, VectorQuery,
};

impl<D> CollectionRepo<D>
where
    D: Serialize + DeserializeOwned + Send + Sync,
{
    // ═══════════════════════════════════════════════════════════════════════════
    // Search API
    // ═══════════════════════════════════════════════════════════════════════════

    /// Full-text search.
    ///
    /// Criteria referencing declared fields without the needed capability
    /// (e.g. faceting on a non-facet field) are rejected before any backend call.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResult<D>, RepoError> {
        let start = Instant::now();
        criteria.validate(&self.schema)?;
        self.ensure_collection().await;

        let params = to_search_params(criteria, &self.schema);
        debug!(collection = %self.collection_name(), params = ?params, "Searching");

        let raw = {
            let _timer = LatencyTimer::new("search");
            observe("search", self.backend.search(self.collection_name(), &params).await)?
        };
        let response: SearchResponse<D> = decode(raw)?;
        let facets = parse_facets(&response);

        metrics::record_search_results(response.hits.len());
        metrics::record_search_latency("text", start.elapsed());
        Ok(SearchResult { response, facets })
    }

    /// Nearest-neighbour search over a vector field.
    ///
    /// Sent through multi-search so the embedding travels in the request body
    /// rather than the query string.
    pub async fn vector_search(&self, request: &VectorSearch) -> Result<SearchResponse<D>, RepoError> {
        let start = Instant::now();
        let query = VectorQuery::new(
            request.field.clone(),
            request.vector.clone(),
            request.k.unwrap_or(self.config.default_vector_k),
        );
        query.validate(&self.schema)?;

        let search = MultiSearchRequest {
            collection: self.collection_name().to_string(),
            params: SearchParams {
                q: Some("*".to_string()),
                query_by: Some(String::new()),
                vector_query: Some(query.to_string()),
                include_fields: request.include.as_ref().map(|fields| fields.join(",")),
                ..SearchParams::default()
            },
        };
        debug!(
            collection = %self.collection_name(),
            field = %query.field,
            dims = query.vector.len(),
            k = query.k,
            "Vector search"
        );

        let mut responses = {
            let _timer = LatencyTimer::new("multi_search");
            observe("multi_search", self.backend.multi_search(std::slice::from_ref(&search)).await)?
        };
        if responses.is_empty() {
            return Err(BackendError::Backend("multi_search returned no results".into()).into());
        }
        let raw = responses.swap_remove(0);
        if let Some(message) = embedded_error(&raw) {
            return Err(BackendError::Backend(message).into());
        }

        let response: SearchResponse<D> = decode(raw)?;
        metrics::record_search_results(response.hits.len());
        metrics::record_search_latency("vector", start.elapsed());
        Ok(response)
    }
}

/// Multi-search reports per-search failures inline: `{"code": 404, "error": "..."}`.
fn embedded_error(raw: &Value) -> Option<String> {
    raw.get("error").and_then(Value::as_str).map(str::to_string)
}
