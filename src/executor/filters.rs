//! Predicate evaluation for query execution
//!
//! Pure function of (record, filter). Field typing was checked during
//! validation, so a value of the wrong class simply does not match.

use crate::catalog::{FieldValue, Record};
use crate::planner::{Filter, NumericOp, Pattern};

/// Evaluates filters against records
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a record matches an optional filter; no filter matches all
    pub fn matches(record: &Record, filter: Option<&Filter>) -> bool {
        match filter {
            Some(filter) => Self::evaluate(record, filter),
            None => true,
        }
    }

    /// Evaluates a filter tree against a record
    pub fn evaluate(record: &Record, filter: &Filter) -> bool {
        match filter {
            Filter::Not(inner) => !Self::evaluate(record, inner),
            Filter::And(filters) => filters.iter().all(|f| Self::evaluate(record, f)),
            Filter::Or(filters) => filters.iter().any(|f| Self::evaluate(record, f)),
            Filter::Numeric { op, key, value } => match record.get(key.field()) {
                Some(FieldValue::Number(actual)) => Self::compare(*op, *actual, *value),
                _ => false,
            },
            Filter::Text { key, pattern } => match record.get(key.field()) {
                Some(FieldValue::Text(actual)) => Self::pattern_matches(pattern, actual),
                _ => false,
            },
        }
    }

    /// Numeric comparison; EQ is exact
    fn compare(op: NumericOp, actual: f64, literal: f64) -> bool {
        match op {
            NumericOp::Gt => actual > literal,
            NumericOp::Lt => actual < literal,
            NumericOp::Eq => actual == literal,
        }
    }

    /// Matches a string against an IS pattern
    pub fn pattern_matches(pattern: &Pattern, value: &str) -> bool {
        match pattern {
            Pattern::Any => true,
            Pattern::Contains(needle) => value.contains(needle.as_str()),
            Pattern::StartsWith(prefix) => value.starts_with(prefix.as_str()),
            Pattern::EndsWith(suffix) => value.ends_with(suffix.as_str()),
            Pattern::Exact(expected) => value == expected,
        }
    }
}
