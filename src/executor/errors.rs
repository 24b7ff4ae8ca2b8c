//! Executor error types
//!
//! Error codes:
//! - QUERY_RESULT_TOO_LARGE (ERROR)
//!
//! A bound query over a snapshot cannot fail any other way: field typing was
//! settled during validation.

use std::fmt;

/// Severity levels for executor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Query failed; nothing else is affected
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// Final row count above the result bound
    QueryResultTooLarge,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::QueryResultTooLarge => "QUERY_RESULT_TOO_LARGE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error type with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorError {
    /// Error code
    code: ExecutorErrorCode,
    /// Human-readable message
    message: String,
    /// Row count that tripped the bound
    row_count: Option<usize>,
}

impl ExecutorError {
    /// Create a result-too-large error
    pub fn result_too_large(row_count: usize, limit: usize) -> Self {
        Self {
            code: ExecutorErrorCode::QueryResultTooLarge,
            message: format!(
                "Query produced {} rows; at most {} may be returned",
                row_count, limit
            ),
            row_count: Some(row_count),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending row count if applicable
    pub fn row_count(&self) -> Option<usize> {
        self.row_count
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for ExecutorError {}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            ExecutorErrorCode::QueryResultTooLarge.code(),
            "QUERY_RESULT_TOO_LARGE"
        );
    }

    #[test]
    fn test_error_display() {
        let err = ExecutorError::result_too_large(5001, 5000);
        let display = format!("{}", err);
        assert!(display.contains("ERROR"));
        assert!(display.contains("QUERY_RESULT_TOO_LARGE"));
        assert!(display.contains("5001"));
        assert_eq!(err.row_count(), Some(5001));
    }
}
