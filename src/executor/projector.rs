//! Column projection
//!
//! Reduces records or grouped rows to the COLUMNS list, in COLUMNS order.

use crate::catalog::{QualifiedKey, Record};
use crate::planner::Column;

use super::result::ResultRow;

/// Projects rows onto the requested columns
pub struct ColumnProjector;

impl ColumnProjector {
    /// Projects a plain record, re-qualifying field names with the bound id
    pub fn project_record(record: &Record, columns: &[Column], dataset_id: &str) -> ResultRow {
        let mut row = ResultRow::new();
        for column in columns {
            if let Column::Key(key) = column {
                if let Some(value) = record.get(key.field()) {
                    let name = QualifiedKey::new(dataset_id, key.field()).to_string();
                    row.push(name, value.clone());
                }
            }
        }
        row
    }

    /// Keeps only the named columns of a grouped row, in COLUMNS order
    pub fn project_row(row: &ResultRow, columns: &[Column]) -> ResultRow {
        let mut projected = ResultRow::new();
        for column in columns {
            let name = column.name();
            if let Some(value) = row.get(&name) {
                projected.push(name, value.clone());
            }
        }
        projected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_record_in_column_order() {
        let record = Record::new()
            .with("dept", "cpsc")
            .with("avg", 91.5)
            .with("title", "intro");
        let columns = vec![
            Column::Key(QualifiedKey::new("courses", "avg")),
            Column::Key(QualifiedKey::new("courses", "dept")),
        ];

        let row = ColumnProjector::project_record(&record, &columns, "courses");
        assert_eq!(row.names().collect::<Vec<_>>(), vec!["courses_avg", "courses_dept"]);
        assert!(row.get("courses_title").is_none());
    }

    #[test]
    fn test_duplicate_columns_collapse() {
        let record = Record::new().with("dept", "cpsc");
        let key = Column::Key(QualifiedKey::new("courses", "dept"));
        let row = ColumnProjector::project_record(&record, &[key.clone(), key], "courses");
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_project_grouped_row() {
        let grouped = ResultRow::new()
            .with("rooms_shortname", "DMP")
            .with("maxSeats", 120.0)
            .with("minSeats", 40.0);
        let columns = vec![
            Column::Apply("maxSeats".into()),
            Column::Key(QualifiedKey::new("rooms", "shortname")),
        ];

        let row = ColumnProjector::project_row(&grouped, &columns);
        assert_eq!(row.names().collect::<Vec<_>>(), vec!["maxSeats", "rooms_shortname"]);
    }
}
