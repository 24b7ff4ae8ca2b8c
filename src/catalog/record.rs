//! Flat records and field values

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use super::fields::{classify, FieldClass};
use super::kind::DatasetKind;

/// A single field value: number or string
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Returns the numeric value, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    /// Returns the string value, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }

    /// Natural ordering: numeric for numbers, lexicographic for strings.
    ///
    /// Numbers sort before strings; the catalog never mixes them in one column.
    pub fn cmp_natural(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Number(_), FieldValue::Text(_)) => Ordering::Less,
            (FieldValue::Text(_), FieldValue::Number(_)) => Ordering::Greater,
        }
    }

    /// Converts to JSON, writing integral numbers without a fraction
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Number(n) => match integral(*n) {
                Some(i) => Value::from(i),
                None => serde_json::Number::from_f64(*n)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            },
            FieldValue::Text(s) => Value::String(s.clone()),
        }
    }
}

fn integral(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Some(n as i64)
    } else {
        None
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            FieldValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// Reasons a JSON object is not a complete record of a kind
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("Record is not a JSON object")]
    NotAnObject,

    #[error("Field '{field}' does not belong to {kind} records")]
    UnknownField { kind: DatasetKind, field: String },

    #[error("Field '{field}' must be a {expected}")]
    WrongType { field: String, expected: &'static str },

    #[error("Record is missing field '{0}'")]
    MissingField(String),
}

/// One course section or room: unqualified field name to value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field value
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns the value of an unqualified field
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Builds a record from a flat JSON object.
    ///
    /// The object must carry exactly the kind's field set: numbers for mkey
    /// fields, strings for skey fields. Partial records are rejected.
    pub fn from_json(kind: DatasetKind, value: &Value) -> Result<Self, RecordError> {
        let object = value.as_object().ok_or(RecordError::NotAnObject)?;

        let mut fields = BTreeMap::new();
        for (name, raw) in object {
            let parsed = match classify(kind, name) {
                FieldClass::Numeric => raw
                    .as_f64()
                    .map(FieldValue::Number)
                    .ok_or_else(|| RecordError::WrongType {
                        field: name.clone(),
                        expected: "number",
                    })?,
                FieldClass::String => raw
                    .as_str()
                    .map(FieldValue::from)
                    .ok_or_else(|| RecordError::WrongType {
                        field: name.clone(),
                        expected: "string",
                    })?,
                FieldClass::Unknown => {
                    return Err(RecordError::UnknownField {
                        kind,
                        field: name.clone(),
                    })
                }
            };
            fields.insert(name.clone(), parsed);
        }

        if let Some(missing) = kind.fields().find(|f| !fields.contains_key(*f)) {
            return Err(RecordError::MissingField(missing.to_string()));
        }

        Ok(Self { fields })
    }

    /// Checks that the record is a complete, correctly typed record of `kind`
    pub fn validate(&self, kind: DatasetKind) -> Result<(), RecordError> {
        for (name, value) in &self.fields {
            match (classify(kind, name), value) {
                (FieldClass::Numeric, FieldValue::Number(_)) => {}
                (FieldClass::String, FieldValue::Text(_)) => {}
                (FieldClass::Numeric, FieldValue::Text(_)) => {
                    return Err(RecordError::WrongType {
                        field: name.clone(),
                        expected: "number",
                    })
                }
                (FieldClass::String, FieldValue::Number(_)) => {
                    return Err(RecordError::WrongType {
                        field: name.clone(),
                        expected: "string",
                    })
                }
                (FieldClass::Unknown, _) => {
                    return Err(RecordError::UnknownField {
                        kind,
                        field: name.clone(),
                    })
                }
            }
        }

        match kind.fields().find(|f| !self.fields.contains_key(*f)) {
            Some(missing) => Err(RecordError::MissingField(missing.to_string())),
            None => Ok(()),
        }
    }
}
