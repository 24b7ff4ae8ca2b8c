//! In-memory dataset registry
//!
//! Owns dataset lifecycle (add, remove, list) and runs queries against
//! immutable snapshots. Adds and removes take the write lock; queries only
//! hold the read lock long enough to copy the known ids and clone an `Arc`.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use uuid::Uuid;

use crate::catalog::{DatasetKind, Record};
use crate::executor::{DatasetSource, QueryError, QueryExecutor, QuerySession, ResultRow};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::planner::KnownDatasets;

use super::dataset::{parse_records, validate_dataset_id, Dataset, DatasetInfo};
use super::errors::{FacadeError, FacadeResult};

/// Thread-safe registry of loaded datasets
#[derive(Debug)]
pub struct DatasetRegistry {
    datasets: RwLock<BTreeMap<String, Dataset>>,
    metrics: Arc<MetricsRegistry>,
    executor: QueryExecutor,
}

impl Default for DatasetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetRegistry {
    /// Creates an empty registry with its own metrics
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(MetricsRegistry::new()))
    }

    /// Creates an empty registry reporting into shared metrics
    pub fn with_metrics(metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            datasets: RwLock::new(BTreeMap::new()),
            metrics,
            executor: QueryExecutor::new(),
        }
    }

    /// Replaces the query executor (e.g. to change the result bound)
    pub fn with_executor(mut self, executor: QueryExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// Metrics this registry reports into
    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Dataset>> {
        self.datasets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Dataset>> {
        self.datasets.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a dataset of complete records.
    ///
    /// Returns the sorted ids of all loaded datasets.
    pub fn add_dataset(
        &self,
        id: &str,
        kind: DatasetKind,
        records: Vec<Record>,
    ) -> FacadeResult<Vec<String>> {
        let result = self.try_add(id, kind, records);
        if let Err(err) = &result {
            log_rejected_dataset(id, err);
        }
        result
    }

    /// Parses a JSON array of records, then adds it as a dataset
    pub fn add_dataset_json(
        &self,
        id: &str,
        kind: DatasetKind,
        payload: &Value,
    ) -> FacadeResult<Vec<String>> {
        match parse_records(kind, payload) {
            Ok(records) => self.add_dataset(id, kind, records),
            Err(err) => {
                log_rejected_dataset(id, &err);
                Err(err)
            }
        }
    }

    fn try_add(&self, id: &str, kind: DatasetKind, records: Vec<Record>) -> FacadeResult<Vec<String>> {
        validate_dataset_id(id)?;
        if records.is_empty() {
            return Err(FacadeError::EmptyDataset(id.to_string()));
        }
        for (index, record) in records.iter().enumerate() {
            record
                .validate(kind)
                .map_err(|source| FacadeError::InvalidRecord { index, source })?;
        }

        let num_rows = records.len().to_string();
        let ids = {
            let mut datasets = self.write();
            if datasets.contains_key(id) {
                return Err(FacadeError::DuplicateDataset(id.to_string()));
            }
            datasets.insert(id.to_string(), Dataset::new(id, kind, records));
            datasets.keys().cloned().collect::<Vec<_>>()
        };

        self.metrics.increment_datasets_added();
        log_event_with_fields(
            Event::DatasetAdded,
            &[
                ("dataset_id", id),
                ("kind", kind.as_str()),
                ("num_rows", num_rows.as_str()),
            ],
        );
        Ok(ids)
    }

    /// Removes a dataset, returning its id
    pub fn remove_dataset(&self, id: &str) -> FacadeResult<String> {
        validate_dataset_id(id)?;

        let removed = self.write().remove(id);
        match removed {
            Some(dataset) => {
                self.metrics.increment_datasets_removed();
                let num_rows = dataset.len().to_string();
                log_event_with_fields(
                    Event::DatasetRemoved,
                    &[("dataset_id", id), ("num_rows", num_rows.as_str())],
                );
                Ok(id.to_string())
            }
            None => Err(FacadeError::NotFound(id.to_string())),
        }
    }

    /// Summaries of all loaded datasets, sorted by id
    pub fn list_datasets(&self) -> Vec<DatasetInfo> {
        self.read().values().map(Dataset::info).collect()
    }

    /// Validates and runs one query object.
    ///
    /// Each call gets a fresh query id for log correlation.
    pub fn perform_query(&self, raw: &Value) -> FacadeResult<Vec<ResultRow>> {
        let query_id = Uuid::new_v4().to_string();
        log_event_with_fields(Event::QueryReceived, &[("query_id", query_id.as_str())]);

        let session = QuerySession::new(self).with_executor(self.executor);
        match session.run(raw) {
            Ok(result) => {
                self.metrics.record_query_executed(result.len() as u64);
                let groups = result.group_count.to_string();
                let matched = result.matched_count.to_string();
                let rows = result.len().to_string();
                let scanned = result.scanned_count.to_string();
                log_event_with_fields(
                    Event::QueryExecuted,
                    &[
                        ("groups", groups.as_str()),
                        ("matched", matched.as_str()),
                        ("query_id", query_id.as_str()),
                        ("rows", rows.as_str()),
                        ("scanned", scanned.as_str()),
                    ],
                );
                Ok(result.into_rows())
            }
            Err(err) => {
                match &err {
                    QueryError::ResultTooLarge(_) => self.metrics.increment_results_too_large(),
                    _ => self.metrics.increment_queries_rejected(),
                }
                let message = err.to_string();
                log_event_with_fields(
                    Event::QueryRejected,
                    &[
                        ("category", err.category()),
                        ("code", err.code()),
                        ("message", message.as_str()),
                        ("query_id", query_id.as_str()),
                    ],
                );
                Err(err.into())
            }
        }
    }
}

fn log_rejected_dataset(id: &str, err: &FacadeError) {
    let message = err.to_string();
    log_event_with_fields(
        Event::DatasetRejected,
        &[
            ("code", err.code()),
            ("dataset_id", id),
            ("message", message.as_str()),
        ],
    );
}

impl DatasetSource for DatasetRegistry {
    fn known_datasets(&self) -> KnownDatasets {
        self.read()
            .values()
            .map(|dataset| (dataset.id().to_string(), dataset.kind()))
            .collect()
    }

    fn records(&self, dataset_id: &str) -> Option<Arc<Vec<Record>>> {
        self.read().get(dataset_id).map(Dataset::records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn room(shortname: &str, number: &str, seats: f64) -> Record {
        Record::new()
            .with("fullname", format!("{} building", shortname))
            .with("shortname", shortname)
            .with("number", number)
            .with("name", format!("{}_{}", shortname, number))
            .with("address", "2329 West Mall")
            .with("lat", 49.26)
            .with("lon", -123.25)
            .with("seats", seats)
            .with("type", "Small Group")
            .with("furniture", "Tables")
            .with("href", "http://example.invalid")
    }

    fn rooms() -> Vec<Record> {
        vec![
            room("DMP", "110", 120.0),
            room("DMP", "201", 40.0),
            room("ANGU", "098", 260.0),
        ]
    }

    #[test]
    fn test_add_returns_sorted_ids() {
        let registry = DatasetRegistry::new();
        assert_eq!(
            registry.add_dataset("rooms", DatasetKind::Room, rooms()).unwrap(),
            vec!["rooms"]
        );
        assert_eq!(
            registry.add_dataset("auditoria", DatasetKind::Room, rooms()).unwrap(),
            vec!["auditoria", "rooms"]
        );
        assert_eq!(registry.metrics().snapshot().datasets_added, 2);
    }

    #[test]
    fn test_add_rejections() {
        let registry = DatasetRegistry::new();
        registry.add_dataset("rooms", DatasetKind::Room, rooms()).unwrap();

        assert_eq!(
            registry.add_dataset("rooms", DatasetKind::Room, rooms()),
            Err(FacadeError::DuplicateDataset("rooms".into()))
        );
        assert_eq!(
            registry.add_dataset("ubc_rooms", DatasetKind::Room, rooms()),
            Err(FacadeError::InvalidDatasetId("ubc_rooms".into()))
        );
        assert_eq!(
            registry.add_dataset("empty", DatasetKind::Room, Vec::new()),
            Err(FacadeError::EmptyDataset("empty".into()))
        );
        assert!(matches!(
            registry.add_dataset("partial", DatasetKind::Room, vec![Record::new().with("seats", 1.0)]),
            Err(FacadeError::InvalidRecord { index: 0, .. })
        ));
        assert_eq!(registry.list_datasets().len(), 1);
    }

    #[test]
    fn test_remove() {
        let registry = DatasetRegistry::new();
        registry.add_dataset("rooms", DatasetKind::Room, rooms()).unwrap();

        assert_eq!(registry.remove_dataset("rooms").unwrap(), "rooms");
        assert_eq!(
            registry.remove_dataset("rooms"),
            Err(FacadeError::NotFound("rooms".into()))
        );
        assert_eq!(
            registry.remove_dataset("a_b"),
            Err(FacadeError::InvalidDatasetId("a_b".into()))
        );
        assert!(registry.list_datasets().is_empty());
    }

    #[test]
    fn test_list_datasets() {
        let registry = DatasetRegistry::new();
        registry.add_dataset("rooms", DatasetKind::Room, rooms()).unwrap();

        let infos = registry.list_datasets();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].id, "rooms");
        assert_eq!(infos[0].kind, DatasetKind::Room);
        assert_eq!(infos[0].num_rows, 3);
    }

    #[test]
    fn test_perform_query() {
        let registry = DatasetRegistry::new();
        registry.add_dataset("rooms", DatasetKind::Room, rooms()).unwrap();

        let rows = registry
            .perform_query(&json!({
                "WHERE": {},
                "OPTIONS": {
                    "COLUMNS": ["rooms_shortname", "maxSeats"],
                    "ORDER": {"dir": "DOWN", "keys": ["maxSeats"]}
                },
                "TRANSFORMATIONS": {
                    "GROUP": ["rooms_shortname"],
                    "APPLY": [{"maxSeats": {"MAX": "rooms_seats"}}]
                }
            }))
            .unwrap();

        assert_eq!(
            rows,
            vec![
                ResultRow::new().with("rooms_shortname", "ANGU").with("maxSeats", 260.0),
                ResultRow::new().with("rooms_shortname", "DMP").with("maxSeats", 120.0),
            ]
        );
        assert_eq!(registry.metrics().snapshot().rows_returned, 2);
    }

    #[test]
    fn test_query_after_remove_is_malformed() {
        let registry = DatasetRegistry::new();
        registry.add_dataset("rooms", DatasetKind::Room, rooms()).unwrap();
        registry.remove_dataset("rooms").unwrap();

        let err = registry
            .perform_query(&json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["rooms_seats"]}}))
            .unwrap_err();
        assert!(matches!(err, FacadeError::Query(QueryError::MalformedQuery(_))));
        assert_eq!(registry.metrics().snapshot().queries_rejected, 1);
    }

    #[test]
    fn test_result_too_large_counted() {
        let registry = DatasetRegistry::new().with_executor(QueryExecutor::with_max_rows(2));
        registry.add_dataset("rooms", DatasetKind::Room, rooms()).unwrap();

        let err = registry
            .perform_query(&json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["rooms_name"]}}))
            .unwrap_err();
        assert_eq!(err.code(), "QUERY_RESULT_TOO_LARGE");

        let snapshot = registry.metrics().snapshot();
        assert_eq!(snapshot.results_too_large, 1);
        assert_eq!(snapshot.queries_rejected, 1);
    }

    #[test]
    fn test_add_dataset_json() {
        let registry = DatasetRegistry::new();
        let payload = serde_json::to_value(
            rooms()
                .iter()
                .map(|r| {
                    r.iter()
                        .map(|(k, v)| (k.to_string(), v.to_json()))
                        .collect::<serde_json::Map<_, _>>()
                })
                .collect::<Vec<_>>(),
        )
        .unwrap();

        assert_eq!(
            registry.add_dataset_json("rooms", DatasetKind::Room, &payload).unwrap(),
            vec!["rooms"]
        );
        assert!(registry
            .add_dataset_json("more", DatasetKind::CourseSection, &payload)
            .is_err());
    }
}
