// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for typesense-criteria.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host application is responsible for choosing the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `typesense_criteria_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `operation`: search, multi_search, import, retrieve, create, update, delete, ...
//! - `status`: success, error, not_found

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Record one compiled filter and how many top-level clauses survived.
pub fn record_filter_compiled(clauses: usize) {
    let outcome = if clauses == 0 { "empty" } else { "compiled" };
    counter!(
        "typesense_criteria_filters_compiled_total",
        "outcome" => outcome
    )
    .increment(1);
    histogram!("typesense_criteria_filter_clauses").record(clauses as f64);
}

/// Record a call to the search backend
pub fn record_backend_operation(operation: &str, status: &str) {
    counter!(
        "typesense_criteria_backend_operations_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record backend call latency
pub fn record_backend_latency(operation: &str, duration: Duration) {
    histogram!(
        "typesense_criteria_backend_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record end-to-end search latency (assemble + backend + decode)
pub fn record_search_latency(kind: &str, duration: Duration) {
    histogram!(
        "typesense_criteria_search_seconds",
        "kind" => kind.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record number of hits returned by a search
pub fn record_search_results(count: usize) {
    histogram!("typesense_criteria_search_results").record(count as f64);
}

/// Record collection lifecycle operations (ensure, create, drop)
pub fn record_collection_operation(operation: &str, success: bool) {
    counter!(
        "typesense_criteria_collection_operations_total",
        "operation" => operation.to_string(),
        "status" => if success { "success" } else { "error" }
    )
    .increment(1);
}

/// A timing guard that records backend latency on drop
pub struct LatencyTimer {
    operation: &'static str,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_backend_latency(self.operation, self.start.elapsed());
    }
}
