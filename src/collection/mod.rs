// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Collection repository.
//!
//! [`CollectionRepo`] ties one [`CollectionSchema`] to a [`SearchBackend`]:
//! it declares the collection on first use, assembles search parameters,
//! and decodes documents into `D`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use typesense_criteria::backend::SearchBackend;
//! use typesense_criteria::collection::CollectionRepo;
//! use typesense_criteria::schema::{CollectionSchema, Field};
//! use typesense_criteria::search::{Filter, SearchCriteria};
//!
//! # async fn example(backend: Arc<dyn SearchBackend>) -> Result<(), Box<dyn std::error::Error>> {
//! let schema = CollectionSchema::builder("products")
//!     .field("name", Field::string().facet())
//!     .field("price", Field::float().sort())
//!     .build()?;
//!
//! let repo: CollectionRepo = CollectionRepo::new(backend, schema);
//! let results = repo
//!     .search(&SearchCriteria::new().q("laptop").facet("name").filter(Filter::new().eq("name", "Acme")))
//!     .await?;
//! println!("{} hits, facets: {:?}", results.found(), results.facets);
//! # Ok(())
//! # }
//! ```

mod document_api;
mod search_api;
mod types;

pub use types::{SearchResult, VectorSearch};

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::backend::{BackendError, ImportResult, SearchBackend};
use crate::config::RepoConfig;
use crate::error::RepoError;
use crate::metrics::{self, LatencyTimer};
use crate::schema::CollectionSchema;

/// Typed access to one Typesense collection.
///
/// `D` is the document type; it defaults to raw JSON.
pub struct CollectionRepo<D = Value> {
    backend: Arc<dyn SearchBackend>,
    schema: CollectionSchema,
    config: RepoConfig,
    _document: PhantomData<fn() -> D>,
}

impl<D> CollectionRepo<D>
where
    D: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(backend: Arc<dyn SearchBackend>, schema: CollectionSchema) -> Self {
        Self::with_config(backend, schema, RepoConfig::default())
    }

    pub fn with_config(backend: Arc<dyn SearchBackend>, schema: CollectionSchema, config: RepoConfig) -> Self {
        Self {
            backend,
            schema,
            config,
            _document: PhantomData,
        }
    }

    #[must_use]
    pub fn collection_name(&self) -> &str {
        self.schema.name()
    }

    #[must_use]
    pub fn schema(&self) -> &CollectionSchema {
        &self.schema
    }

    #[must_use]
    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Collection lifecycle
    // ═══════════════════════════════════════════════════════════════════════════

    /// Create the collection unless it already exists.
    ///
    /// Failures are logged and swallowed so the calling operation can still
    /// reach the backend; returns whether the collection is known to exist.
    pub async fn ensure_collection(&self) -> bool {
        match self.try_ensure_collection().await {
            Ok(()) => {
                metrics::record_collection_operation("ensure", true);
                true
            }
            Err(e) => {
                metrics::record_collection_operation("ensure", false);
                warn!(collection = %self.collection_name(), error = %e, "Failed to ensure collection");
                false
            }
        }
    }

    async fn try_ensure_collection(&self) -> Result<(), BackendError> {
        let name = self.collection_name();
        let exists = observe("collection_exists", self.backend.collection_exists(name).await)?;
        if exists {
            return Ok(());
        }

        let declaration = self.schema.to_declaration();
        debug!(collection = %name, fields = declaration.fields.len(), "Creating collection");
        observe("create_collection", self.backend.create_collection(&declaration).await)?;
        metrics::record_collection_operation("create", true);
        info!(collection = %name, "Collection created");
        Ok(())
    }

    /// Drop the collection if it exists. Returns whether anything was dropped.
    pub async fn delete_collection(&self) -> Result<bool, RepoError> {
        let name = self.collection_name();
        if !observe("collection_exists", self.backend.collection_exists(name).await)? {
            debug!(collection = %name, "Collection absent, nothing to drop");
            return Ok(false);
        }

        observe("delete_collection", self.backend.delete_collection(name).await)?;
        metrics::record_collection_operation("drop", true);
        info!(collection = %name, "Collection dropped");
        Ok(true)
    }

    /// Bulk import with the configured [`crate::config::ImportOptions`].
    pub async fn import_documents(&self, documents: &[D]) -> Result<Vec<ImportResult>, RepoError> {
        self.ensure_collection().await;

        let documents = documents
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(BackendError::from)?;

        let _timer = LatencyTimer::new("import");
        let results = observe(
            "import",
            self.backend
                .import_documents(self.collection_name(), &documents, &self.config.import)
                .await,
        )?;

        let failed = results.iter().filter(|r| !r.success).count();
        if failed > 0 {
            warn!(
                collection = %self.collection_name(),
                failed,
                total = results.len(),
                "Some documents were rejected on import"
            );
        } else {
            debug!(collection = %self.collection_name(), imported = results.len(), "Documents imported");
        }
        Ok(results)
    }
}

/// Record the outcome of one backend call and pass it through.
fn observe<T>(operation: &'static str, result: Result<T, BackendError>) -> Result<T, BackendError> {
    let status = match result {
        Ok(_) => "success",
        Err(ref e) => e.status(),
    };
    metrics::record_backend_operation(operation, status);
    result
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, RepoError> {
    serde_json::from_value(value).map_err(RepoError::Decode)
}
