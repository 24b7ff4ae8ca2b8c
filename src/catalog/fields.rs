//! Field tables per dataset kind
//!
//! The tables are the single source of truth for field typing.

use std::fmt;

use super::kind::DatasetKind;

pub(super) const COURSE_NUMERIC_FIELDS: &[&str] = &["avg", "pass", "fail", "audit", "year"];
pub(super) const COURSE_STRING_FIELDS: &[&str] = &["dept", "id", "instructor", "title", "uuid"];
pub(super) const ROOM_NUMERIC_FIELDS: &[&str] = &["lat", "lon", "seats"];
pub(super) const ROOM_STRING_FIELDS: &[&str] = &[
    "fullname",
    "shortname",
    "number",
    "name",
    "address",
    "type",
    "furniture",
    "href",
];

/// Classification of a field name within a dataset kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// Numeric field (mkey)
    Numeric,
    /// String field (skey)
    String,
    /// Not a field of this kind
    Unknown,
}

impl FieldClass {
    /// Returns the grammar name of the classification
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldClass::Numeric => "mkey",
            FieldClass::String => "skey",
            FieldClass::Unknown => "unknown",
        }
    }

    /// Returns true for numeric and string fields
    pub fn is_known(&self) -> bool {
        !matches!(self, FieldClass::Unknown)
    }
}

impl fmt::Display for FieldClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies a field name for the given dataset kind.
///
/// Pure and total: every (kind, field) pair maps to exactly one class.
pub fn classify(kind: DatasetKind, field: &str) -> FieldClass {
    if kind.numeric_fields().contains(&field) {
        FieldClass::Numeric
    } else if kind.string_fields().contains(&field) {
        FieldClass::String
    } else {
        FieldClass::Unknown
    }
}
