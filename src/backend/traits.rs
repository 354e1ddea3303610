// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::ImportOptions;
use crate::schema::CollectionDeclaration;
use crate::search::{MultiSearchRequest, SearchParams};

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Not found")]
    NotFound,
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Typesense error: {0}")]
    Backend(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BackendError {
    /// Metric label for this outcome.
    pub(crate) fn status(&self) -> &'static str {
        match self {
            BackendError::NotFound => "not_found",
            _ => "error",
        }
    }
}

/// Per-document outcome of a bulk import (one JSONL line of the response).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub success: bool,
    /// Present with `return_id: true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The rejected document, verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

/// Remote collection and document operations.
///
/// Documents cross this boundary as JSON; typed (de)serialization happens
/// in [`crate::collection::CollectionRepo`]. Missing documents surface as
/// [`BackendError::NotFound`].
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn collection_exists(&self, name: &str) -> Result<bool, BackendError>;
    async fn create_collection(&self, declaration: &CollectionDeclaration) -> Result<(), BackendError>;
    async fn delete_collection(&self, name: &str) -> Result<(), BackendError>;

    /// `GET /collections/{collection}/documents/search`
    async fn search(&self, collection: &str, params: &SearchParams) -> Result<Value, BackendError>;

    /// `POST /multi_search`; one response per request, same order.
    async fn multi_search(&self, searches: &[MultiSearchRequest]) -> Result<Vec<Value>, BackendError>;

    async fn import_documents(
        &self,
        collection: &str,
        documents: &[Value],
        options: &ImportOptions,
    ) -> Result<Vec<ImportResult>, BackendError>;

    async fn retrieve_document(&self, collection: &str, id: &str) -> Result<Value, BackendError>;
    async fn create_document(&self, collection: &str, document: &Value) -> Result<Value, BackendError>;
    async fn update_document(&self, collection: &str, id: &str, document: &Value) -> Result<Value, BackendError>;

    /// Returns the deleted document.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<Value, BackendError>;

    /// `DELETE /collections/{collection}/documents?filter_by=...`; returns the number deleted.
    async fn delete_by_filter(&self, collection: &str, filter_by: &str) -> Result<u64, BackendError>;
}
