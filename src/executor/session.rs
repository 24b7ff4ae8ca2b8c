//! Query session
//!
//! Runs one raw query object end to end: validate and bind against the
//! currently known datasets, fetch the bound snapshot, execute. The dataset
//! collection is passed in; the session holds no state between calls.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::catalog::Record;
use crate::planner::{KnownDatasets, PlannerError, QueryValidator};

use super::errors::ExecutorError;
use super::executor::QueryExecutor;
use super::result::ExecutionResult;

/// Read-only view of the loaded datasets
pub trait DatasetSource {
    /// Currently known dataset ids and their kinds
    fn known_datasets(&self) -> KnownDatasets;

    /// Snapshot of a dataset's records, if loaded
    fn records(&self, dataset_id: &str) -> Option<Arc<Vec<Record>>>;
}

/// Query failure categories
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("{0}")]
    MalformedQuery(#[from] PlannerError),

    #[error("Dataset not loaded: {0}")]
    UnknownDataset(String),

    #[error("{0}")]
    ResultTooLarge(#[from] ExecutorError),
}

impl QueryError {
    /// Category name of the failure
    pub fn category(&self) -> &'static str {
        match self {
            QueryError::MalformedQuery(_) => "MalformedQuery",
            QueryError::UnknownDataset(_) => "UnknownDataset",
            QueryError::ResultTooLarge(_) => "ResultTooLarge",
        }
    }

    /// Stable code of the failure
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::MalformedQuery(err) => err.code().code(),
            QueryError::UnknownDataset(_) => "QUERY_UNKNOWN_DATASET",
            QueryError::ResultTooLarge(err) => err.code().code(),
        }
    }
}

/// Runs single queries against a dataset source
pub struct QuerySession<'a, S: DatasetSource> {
    source: &'a S,
    executor: QueryExecutor,
}

impl<'a, S: DatasetSource> QuerySession<'a, S> {
    /// Creates a session with the standard result bound
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            executor: QueryExecutor::new(),
        }
    }

    /// Replaces the executor (e.g. to change the result bound)
    pub fn with_executor(mut self, executor: QueryExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// Validates, binds and executes one query object
    pub fn run(&self, raw: &Value) -> Result<ExecutionResult, QueryError> {
        let known = self.source.known_datasets();
        let bound = QueryValidator::new(&known).validate_and_bind(raw)?;

        let records = self
            .source
            .records(bound.dataset_id())
            .ok_or_else(|| QueryError::UnknownDataset(bound.dataset_id().to_string()))?;

        Ok(self.executor.execute(&bound, &records)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DatasetKind;
    use serde_json::json;
    use std::collections::HashMap;

    /// Source whose id list can disagree with its records
    struct StaticSource {
        known: KnownDatasets,
        records: HashMap<String, Arc<Vec<Record>>>,
    }

    impl DatasetSource for StaticSource {
        fn known_datasets(&self) -> KnownDatasets {
            self.known.clone()
        }

        fn records(&self, dataset_id: &str) -> Option<Arc<Vec<Record>>> {
            self.records.get(dataset_id).cloned()
        }
    }

    fn rooms() -> Vec<Record> {
        ["DMP", "DMP", "ANGU"]
            .iter()
            .zip([120.0, 40.0, 260.0])
            .map(|(name, seats)| Record::new().with("shortname", *name).with("seats", seats))
            .collect()
    }

    fn source() -> StaticSource {
        let mut records = HashMap::new();
        records.insert("rooms".to_string(), Arc::new(rooms()));
        StaticSource {
            known: KnownDatasets::new()
                .with("rooms", DatasetKind::Room)
                .with("ghost", DatasetKind::Room),
            records,
        }
    }

    #[test]
    fn test_run_query() {
        let source = source();
        let result = QuerySession::new(&source)
            .run(&json!({
                "WHERE": {"GT": {"rooms_seats": 100}},
                "OPTIONS": {"COLUMNS": ["rooms_shortname"], "ORDER": "rooms_shortname"}
            }))
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(
            result.rows[0].get("rooms_shortname").and_then(|v| v.as_text()),
            Some("ANGU")
        );
    }

    #[test]
    fn test_malformed_query_category() {
        let source = source();
        let err = QuerySession::new(&source)
            .run(&json!({"WHERE": {}}))
            .unwrap_err();
        assert_eq!(err.category(), "MalformedQuery");
        assert_eq!(err.code(), "QUERY_MALFORMED");
    }

    #[test]
    fn test_vanished_dataset_is_unknown() {
        let source = source();
        let err = QuerySession::new(&source)
            .run(&json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["ghost_seats"]}}))
            .unwrap_err();
        assert_eq!(err, QueryError::UnknownDataset("ghost".into()));
    }

    #[test]
    fn test_result_too_large_category() {
        let source = source();
        let err = QuerySession::new(&source)
            .with_executor(QueryExecutor::with_max_rows(2))
            .run(&json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["rooms_seats"]}}))
            .unwrap_err();
        assert_eq!(err.category(), "ResultTooLarge");
        assert_eq!(err.code(), "QUERY_RESULT_TOO_LARGE");
    }
}
