//! Qualified field keys (`<datasetId>_<field>`)

use std::fmt;

/// Separator between dataset id and field name
pub const KEY_SEPARATOR: char = '_';

/// A field key bound to a dataset id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedKey {
    dataset: String,
    field: String,
}

impl QualifiedKey {
    /// Creates a key from its parts
    pub fn new(dataset: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            field: field.into(),
        }
    }

    /// Parses `<datasetId>_<field>`.
    ///
    /// Exactly one separator is allowed and neither side may be empty.
    /// Whether the field exists is a catalog question, not a syntax one.
    pub fn parse(raw: &str) -> Option<Self> {
        let (dataset, field) = raw.split_once(KEY_SEPARATOR)?;
        if dataset.is_empty() || field.is_empty() || field.contains(KEY_SEPARATOR) {
            return None;
        }
        Some(Self::new(dataset, field))
    }

    /// Dataset id part
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Field name part
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl fmt::Display for QualifiedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.dataset, KEY_SEPARATOR, self.field)
    }
}
