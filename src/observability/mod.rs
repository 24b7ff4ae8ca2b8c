//! Observability subsystem
//!
//! - Structured logging (JSON lines) for domain events
//! - Counters for queries and dataset lifecycle
//!
//! HTTP request tracing goes through `tracing` and is installed by the CLI.
//! The planner and executor never log; only the facade and the outer
//! layers report events.
//!
//! # Usage
//!
//! ```ignore
//! use campusql::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::QueryExecuted, &[("rows", "42")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.record_query_executed(42);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // This just verifies no panic
        log_event(Event::ConfigLoaded);
        log_event_with_fields(Event::DatasetAdded, &[("dataset_id", "courses")]);
    }
}
