//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start
//! - Thread-safe but lock-minimal

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Metrics registry containing all operational counters
///
/// All counters use Relaxed atomics; readers may observe counters from
/// concurrent queries in any interleaving.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Successful query count
    queries_executed: AtomicU64,
    /// Rejected query count (all categories)
    queries_rejected: AtomicU64,
    /// Queries rejected for exceeding the result bound
    results_too_large: AtomicU64,
    /// Datasets added
    datasets_added: AtomicU64,
    /// Datasets removed
    datasets_removed: AtomicU64,
    /// Total rows returned by successful queries
    rows_returned: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    // Query metrics

    /// Record a successful query returning `rows` rows
    pub fn record_query_executed(&self, rows: u64) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
        self.rows_returned.fetch_add(rows, Ordering::Relaxed);
    }

    /// Increment queries rejected
    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment results too large; also counts as a rejection
    pub fn increment_results_too_large(&self) {
        self.results_too_large.fetch_add(1, Ordering::Relaxed);
        self.increment_queries_rejected();
    }

    // Dataset metrics

    /// Increment datasets added
    pub fn increment_datasets_added(&self) {
        self.datasets_added.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment datasets removed
    pub fn increment_datasets_removed(&self) {
        self.datasets_removed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or(serde_json::Value::Null)
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            results_too_large: self.results_too_large.load(Ordering::Relaxed),
            datasets_added: self.datasets_added.load(Ordering::Relaxed),
            datasets_removed: self.datasets_removed.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_rejected: u64,
    pub results_too_large: u64,
    pub datasets_added: u64,
    pub datasets_removed: u64,
    pub rows_returned: u64,
}
