// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Document API for CollectionRepo

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{decode, observe, CollectionRepo};
use crate::backend::BackendError;
use crate::error::RepoError;
use crate::metrics::LatencyTimer;
use crate::search::{Filter, FilterCompiler};

impl<D> CollectionRepo<D>
where
    D: Serialize + DeserializeOwned + Send + Sync,
{
    /// Fetch a document by id.
    ///
    /// Any backend failure reads as "absent"; only an undecodable document
    /// is an error.
    pub async fn get_document(&self, id: &str) -> Result<Option<D>, RepoError> {
        self.ensure_collection().await;

        match observe(
            "retrieve",
            self.backend.retrieve_document(self.collection_name(), id).await,
        ) {
            Ok(raw) => decode(raw).map(Some),
            Err(BackendError::NotFound) => Ok(None),
            Err(e) => {
                warn!(collection = %self.collection_name(), id = %id, error = %e, "Document lookup failed");
                Ok(None)
            }
        }
    }

    /// Delete a document by id, returning it. `None` if it did not exist.
    pub async fn delete_document(&self, id: &str) -> Result<Option<D>, RepoError> {
        if self.get_document(id).await?.is_none() {
            debug!(collection = %self.collection_name(), id = %id, "Nothing to delete");
            return Ok(None);
        }

        let _timer = LatencyTimer::new("delete");
        let raw = observe(
            "delete",
            self.backend.delete_document(self.collection_name(), id).await,
        )?;
        decode(raw).map(Some)
    }

    /// Update a document, creating it when it does not exist yet.
    pub async fn update_document(&self, id: &str, document: &D) -> Result<D, RepoError> {
        let existing = self.get_document(id).await?;
        let body = serde_json::to_value(document).map_err(BackendError::from)?;

        let _timer = LatencyTimer::new("upsert");
        let raw = match existing {
            Some(_) => observe(
                "update",
                self.backend.update_document(self.collection_name(), id, &body).await,
            )?,
            None => {
                debug!(collection = %self.collection_name(), id = %id, "Document missing, creating");
                observe(
                    "create",
                    self.backend.create_document(self.collection_name(), &body).await,
                )?
            }
        };
        decode(raw)
    }

    /// Delete every document matching the filter. Returns the number deleted.
    ///
    /// A filter that compiles to nothing is a no-op returning `None`, never
    /// "delete everything".
    pub async fn delete_documents(&self, filter: &Filter) -> Result<Option<u64>, RepoError> {
        let filter_by = FilterCompiler::compile_for(filter, &self.schema);
        if filter_by.is_empty() {
            debug!(collection = %self.collection_name(), "Empty filter, skipping delete");
            return Ok(None);
        }

        self.ensure_collection().await;
        let _timer = LatencyTimer::new("delete_by_filter");
        let deleted = observe(
            "delete_by_filter",
            self.backend.delete_by_filter(self.collection_name(), &filter_by).await,
        )?;
        debug!(collection = %self.collection_name(), filter_by = %filter_by, deleted, "Deleted by filter");
        Ok(Some(deleted))
    }
}
