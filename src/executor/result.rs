//! Result types for query execution

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::catalog::FieldValue;

/// One output row: column name to value, in COLUMNS order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultRow {
    fields: Vec<(String, FieldValue)>,
}

impl ResultRow {
    /// Creates an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column, replacing an existing one with the same name
    pub fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder-style push
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.push(name, value.into());
        self
    }

    /// Returns the value of a column
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Column names in output order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Converts to a JSON object
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        Value::Object(map)
    }
}

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Result of query execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    /// Rows in final order
    pub rows: Vec<ResultRow>,
    /// Number of records scanned
    pub scanned_count: usize,
    /// Number of records passing the filter
    pub matched_count: usize,
    /// Number of groups formed; zero without TRANSFORMATIONS
    pub group_count: usize,
}

impl ExecutionResult {
    /// Creates an empty result
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            scanned_count: 0,
            matched_count: 0,
            group_count: 0,
        }
    }

    /// Returns true if no rows were produced
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns an iterator over the rows
    pub fn iter(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter()
    }

    /// Consumes the result, returning the rows
    pub fn into_rows(self) -> Vec<ResultRow> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_keeps_column_order() {
        let row = ResultRow::new()
            .with("rooms_shortname", "DMP")
            .with("maxSeats", 120.0);

        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"rooms_shortname":"DMP","maxSeats":120}"#
        );
        assert_eq!(row.names().collect::<Vec<_>>(), vec!["rooms_shortname", "maxSeats"]);
    }

    #[test]
    fn test_push_replaces_existing_column() {
        let mut row = ResultRow::new().with("a", 1.0);
        row.push("a", FieldValue::Number(2.0));
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("a"), Some(&FieldValue::Number(2.0)));
    }

    #[test]
    fn test_execution_result_empty() {
        let result = ExecutionResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
    }
}
