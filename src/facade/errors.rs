//! Facade error types

use thiserror::Error;

use crate::catalog::RecordError;
use crate::executor::QueryError;

/// Errors returned by the dataset registry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FacadeError {
    #[error("Invalid dataset id '{0}': ids must be non-blank and contain no underscore")]
    InvalidDatasetId(String),

    #[error("Dataset '{0}' already exists")]
    DuplicateDataset(String),

    #[error("Dataset '{0}' has no records")]
    EmptyDataset(String),

    #[error("Dataset payload must be a JSON array of records")]
    InvalidPayload,

    #[error("Record {index} is invalid: {source}")]
    InvalidRecord { index: usize, source: RecordError },

    #[error("Dataset '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl FacadeError {
    /// Stable code of the failure
    pub fn code(&self) -> &'static str {
        match self {
            FacadeError::InvalidDatasetId(_) => "DATASET_INVALID_ID",
            FacadeError::DuplicateDataset(_) => "DATASET_DUPLICATE",
            FacadeError::EmptyDataset(_) => "DATASET_EMPTY",
            FacadeError::InvalidPayload => "DATASET_INVALID_PAYLOAD",
            FacadeError::InvalidRecord { .. } => "DATASET_INVALID_RECORD",
            FacadeError::NotFound(_) => "DATASET_NOT_FOUND",
            FacadeError::Query(err) => err.code(),
        }
    }

    /// True for lookups of datasets that do not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, FacadeError::NotFound(_))
    }
}

/// Result type for facade operations
pub type FacadeResult<T> = Result<T, FacadeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            FacadeError::NotFound("rooms".into()).code(),
            "DATASET_NOT_FOUND"
        );
        assert!(FacadeError::NotFound("rooms".into()).is_not_found());
        assert!(!FacadeError::EmptyDataset("rooms".into()).is_not_found());
    }

    #[test]
    fn test_record_error_in_message() {
        let err = FacadeError::InvalidRecord {
            index: 3,
            source: RecordError::MissingField("href".into()),
        };
        let message = err.to_string();
        assert!(message.contains("Record 3"));
        assert!(message.contains("href"));
    }
}
