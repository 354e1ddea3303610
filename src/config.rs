// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Configuration for the Typesense client and collection repositories.
//!
//! # Example
//!
//! ```
//! use typesense_criteria::config::{ClientConfig, RepoConfig};
//!
//! let config: ClientConfig = serde_json::from_value(serde_json::json!({
//!     "url": "https://search.example.com",
//!     "api_key": "xyz"
//! }))
//! .unwrap();
//! assert_eq!(config.connection_timeout_secs, 2);
//!
//! let node = config.node().unwrap();
//! assert_eq!(node.host, "search.example.com");
//! assert_eq!(node.port, 443);
//!
//! let repo = RepoConfig::default();
//! assert_eq!(repo.default_vector_k, 10);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Characters Typesense splits tokens on, unless the collection overrides them.
pub const DEFAULT_TOKEN_SEPARATORS: &[&str] =
    &["@", "-", ".", ",", ";", ":", "_", "/", "|", "(", ")"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid Typesense URL: {0}")]
    InvalidUrl(String),
}

/// Connection settings handed to whatever transport implements the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL (e.g., "https://xyz.a1.typesense.net")
    pub url: String,

    pub api_key: String,

    /// Connection timeout in seconds (default: 2)
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,

    /// Send the API key as a query parameter instead of a header (default: true)
    #[serde(default = "default_send_api_key_as_query_param")]
    pub send_api_key_as_query_param: bool,
}

fn default_connection_timeout_secs() -> u64 { 2 }
fn default_send_api_key_as_query_param() -> bool { true }

impl ClientConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            connection_timeout_secs: default_connection_timeout_secs(),
            send_api_key_as_query_param: default_send_api_key_as_query_param(),
        }
    }

    /// Split the URL into a Typesense node. Port defaults to 443.
    pub fn node(&self) -> Result<NodeConfig, ConfigError> {
        let url = Url::parse(&self.url).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.url, e)))?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ConfigError::InvalidUrl(format!("{}: missing host", self.url)))?;

        Ok(NodeConfig {
            host: host.to_string(),
            port: url.port().unwrap_or(443),
            protocol: url.scheme().to_string(),
        })
    }
}

/// One Typesense node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub protocol: String,
}

/// What to do when an imported document id already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportAction {
    Create,
    #[default]
    Upsert,
    Update,
    Emplace,
}

/// How Typesense treats values that don't match the declared field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirtyValues {
    CoerceOrReject,
    #[default]
    CoerceOrDrop,
    Drop,
    Reject,
}

/// Bulk import options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    #[serde(default)]
    pub action: ImportAction,
    #[serde(default)]
    pub dirty_values: DirtyValues,
    #[serde(default = "default_return_id")]
    pub return_id: bool,
}

fn default_return_id() -> bool { true }

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            action: ImportAction::default(),
            dirty_values: DirtyValues::default(),
            return_id: default_return_id(),
        }
    }
}

/// Per-repository behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoConfig {
    /// Neighbours returned by a vector search when the caller gives no `k` (default: 10)
    #[serde(default = "default_vector_k")]
    pub default_vector_k: usize,

    #[serde(default)]
    pub import: ImportOptions,
}

fn default_vector_k() -> usize { 10 }

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            default_vector_k: default_vector_k(),
            import: ImportOptions::default(),
        }
    }
}
