//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in the query service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// HTTP server listening
    Serving,

    // Dataset lifecycle
    /// Dataset added to the registry
    DatasetAdded,
    /// Dataset add rejected
    DatasetRejected,
    /// Dataset removed from the registry
    DatasetRemoved,

    // Queries
    /// Query received
    QueryReceived,
    /// Query executed successfully
    QueryExecuted,
    /// Query rejected (malformed, unknown dataset, too large)
    QueryRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "CAMPUSQL_SERVING",
            Event::DatasetAdded => "DATASET_ADDED",
            Event::DatasetRejected => "DATASET_REJECTED",
            Event::DatasetRemoved => "DATASET_REMOVED",
            Event::QueryReceived => "QUERY_RECEIVED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryRejected => "QUERY_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryRejected | Event::DatasetRejected => Severity::Warn,
            Event::QueryReceived => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::Serving,
            Event::DatasetAdded,
            Event::DatasetRejected,
            Event::DatasetRemoved,
            Event::QueryReceived,
            Event::QueryExecuted,
            Event::QueryRejected,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_rejections_are_warnings() {
        assert_eq!(Event::QueryRejected.severity(), Severity::Warn);
        assert_eq!(Event::QueryExecuted.severity(), Severity::Info);
        assert_eq!(format!("{}", Event::DatasetAdded), "DATASET_ADDED");
    }
}
