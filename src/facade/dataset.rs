//! Loaded datasets and their summaries

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::catalog::{DatasetKind, Record, KEY_SEPARATOR};

use super::errors::{FacadeError, FacadeResult};

/// Checks a dataset id: non-blank and free of the key separator
pub fn validate_dataset_id(id: &str) -> FacadeResult<()> {
    if id.trim().is_empty() || id.contains(KEY_SEPARATOR) {
        return Err(FacadeError::InvalidDatasetId(id.to_string()));
    }
    Ok(())
}

/// Parses a JSON array of flat records of one kind
pub fn parse_records(kind: DatasetKind, payload: &Value) -> FacadeResult<Vec<Record>> {
    let items = payload.as_array().ok_or(FacadeError::InvalidPayload)?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            Record::from_json(kind, item)
                .map_err(|source| FacadeError::InvalidRecord { index, source })
        })
        .collect()
}

/// An immutable, loaded dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    id: String,
    kind: DatasetKind,
    records: Arc<Vec<Record>>,
    added_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(id: impl Into<String>, kind: DatasetKind, records: Vec<Record>) -> Self {
        Self {
            id: id.into(),
            kind,
            records: Arc::new(records),
            added_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Shared snapshot of the records
    pub fn records(&self) -> Arc<Vec<Record>> {
        Arc::clone(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summary for listing
    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            id: self.id.clone(),
            kind: self.kind,
            num_rows: self.records.len(),
            added_at: self.added_at,
        }
    }
}

/// Summary of a loaded dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub id: String,
    pub kind: DatasetKind,
    pub num_rows: usize,
    pub added_at: DateTime<Utc>,
}
