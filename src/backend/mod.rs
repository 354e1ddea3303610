// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! The remote Typesense service, as seen by this crate.
//!
//! Transport, authentication and retries belong to the implementor; see
//! [`crate::config::ClientConfig`] for the settings a transport needs.

mod traits;

pub use traits::{BackendError, ImportResult, SearchBackend};
