//! Planner error types
//!
//! Every planner error is a `MalformedQuery`: the query object is rejected
//! before any record is touched. Codes refine the reason:
//! - QUERY_MALFORMED (REJECT)
//! - QUERY_INVALID_KEY (REJECT)
//! - QUERY_TYPE_MISMATCH (REJECT)
//! - QUERY_INVALID_WILDCARD (REJECT)
//! - QUERY_DUPLICATE_APPLY_KEY (REJECT)
//! - QUERY_DATASET_BINDING (REJECT)

use std::fmt;

/// Severity levels for planner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Planner-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// Wrong shape: missing/extra keys, wrong payload type, empty lists
    QueryMalformed,
    /// Key is not `<id>_<field>` or names a field outside the catalog
    QueryInvalidKey,
    /// Field class does not fit the operator (e.g. IS on a numeric field)
    QueryTypeMismatch,
    /// IS pattern with an interior or doubled asterisk
    QueryInvalidWildcard,
    /// Apply-result name repeated or malformed
    QueryDuplicateApplyKey,
    /// Zero, several, or an unknown dataset id referenced
    QueryDatasetBinding,
}

impl PlannerErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::QueryMalformed => "QUERY_MALFORMED",
            PlannerErrorCode::QueryInvalidKey => "QUERY_INVALID_KEY",
            PlannerErrorCode::QueryTypeMismatch => "QUERY_TYPE_MISMATCH",
            PlannerErrorCode::QueryInvalidWildcard => "QUERY_INVALID_WILDCARD",
            PlannerErrorCode::QueryDuplicateApplyKey => "QUERY_DUPLICATE_APPLY_KEY",
            PlannerErrorCode::QueryDatasetBinding => "QUERY_DATASET_BINDING",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }

    /// Returns the query section the check belongs to
    pub fn section(&self) -> &'static str {
        match self {
            PlannerErrorCode::QueryMalformed => "QUERY",
            PlannerErrorCode::QueryInvalidKey => "KEY",
            PlannerErrorCode::QueryTypeMismatch => "KEY",
            PlannerErrorCode::QueryInvalidWildcard => "WHERE",
            PlannerErrorCode::QueryDuplicateApplyKey => "TRANSFORMATIONS",
            PlannerErrorCode::QueryDatasetBinding => "DATASET",
        }
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerError {
    /// Error code
    code: PlannerErrorCode,
    /// Human-readable message
    message: String,
    /// Offending key if applicable
    key: Option<String>,
}

impl PlannerError {
    /// Create a malformed query error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::QueryMalformed,
            message: reason.into(),
            key: None,
        }
    }

    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>) -> Self {
        let k = key.into();
        Self {
            code: PlannerErrorCode::QueryInvalidKey,
            message: format!("Invalid key '{}'", k),
            key: Some(k),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(key: impl Into<String>, expected: &str) -> Self {
        let k = key.into();
        Self {
            code: PlannerErrorCode::QueryTypeMismatch,
            message: format!("Key '{}' must be a {}", k, expected),
            key: Some(k),
        }
    }

    /// Create an invalid wildcard error
    pub fn invalid_wildcard(pattern: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::QueryInvalidWildcard,
            message: format!(
                "Pattern '{}' may only use '*' as a leading or trailing wildcard",
                pattern.into()
            ),
            key: None,
        }
    }

    /// Create a duplicate or malformed apply key error
    pub fn apply_key(name: impl Into<String>, reason: &str) -> Self {
        let n = name.into();
        Self {
            code: PlannerErrorCode::QueryDuplicateApplyKey,
            message: format!("Apply key '{}' {}", n, reason),
            key: Some(n),
        }
    }

    /// Create a dataset binding error
    pub fn dataset_binding(reason: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::QueryDatasetBinding,
            message: reason.into(),
            key: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PlannerErrorCode {
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

    /// Returns the offending key if applicable
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

impl fmt::Display for PlannerError {
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

impl std::error::Error for PlannerError {}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
