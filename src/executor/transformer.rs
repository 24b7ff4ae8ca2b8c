//! Grouping and aggregation
//!
//! Records are partitioned by the tuple of their GROUP values. Groups keep
//! first-occurrence order; the tuple-to-index map makes assignment linear.

use std::collections::HashMap;

use crate::catalog::{FieldValue, Record};
use crate::planner::Transformations;

use super::aggregate::{Aggregator, DistinctValue};
use super::result::ResultRow;

/// Groups filtered records and computes APPLY rules per group
pub struct GroupTransformer;

impl GroupTransformer {
    /// Returns one row per group: GROUP key values, then one column per
    /// apply rule, in group formation order.
    pub fn transform(records: &[&Record], transformations: &Transformations) -> Vec<ResultRow> {
        Self::partition(records, transformations)
            .iter()
            .map(|members| Self::group_row(members, transformations))
            .collect()
    }

    /// Splits records into groups in first-occurrence order
    fn partition<'r>(
        records: &[&'r Record],
        transformations: &Transformations,
    ) -> Vec<Vec<&'r Record>> {
        let mut index: HashMap<Vec<Option<DistinctValue>>, usize> = HashMap::new();
        let mut groups: Vec<Vec<&'r Record>> = Vec::new();

        for &record in records {
            let tuple: Vec<Option<DistinctValue>> = transformations
                .group
                .iter()
                .map(|key| record.get(key.field()).map(DistinctValue::from))
                .collect();

            match index.get(&tuple) {
                Some(&slot) => groups[slot].push(record),
                None => {
                    index.insert(tuple, groups.len());
                    groups.push(vec![record]);
                }
            }
        }
        groups
    }

    fn group_row(members: &[&Record], transformations: &Transformations) -> ResultRow {
        let mut row = ResultRow::new();
        let Some(first) = members.first() else {
            return row;
        };

        for key in &transformations.group {
            if let Some(value) = first.get(key.field()) {
                row.push(key.to_string(), value.clone());
            }
        }

        for rule in &transformations.apply {
            let values: Vec<&FieldValue> = members
                .iter()
                .filter_map(|record| record.get(rule.key.field()))
                .collect();
            row.push(rule.name.clone(), Aggregator::apply(rule.op, &values));
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QualifiedKey;
    use crate::planner::{AggregateOp, ApplyRule};

    fn section(title: &str, avg: f64) -> Record {
        Record::new().with("title", title).with("avg", avg)
    }

    fn by_title(apply: Vec<ApplyRule>) -> Transformations {
        Transformations {
            group: vec![QualifiedKey::new("courses", "title")],
            apply,
        }
    }

    #[test]
    fn test_group_avg_in_first_occurrence_order() {
        let records = vec![
            section("310", 90.0),
            section("310", 80.0),
            section("210", 74.0),
            section("310", 95.0),
            section("210", 78.0),
            section("310", 85.0),
            section("210", 72.0),
            section("210", 85.0),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let rows = GroupTransformer::transform(
            &refs,
            &by_title(vec![ApplyRule {
                name: "overallAvg".into(),
                op: AggregateOp::Avg,
                key: QualifiedKey::new("courses", "avg"),
            }]),
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            ResultRow::new()
                .with("courses_title", "310")
                .with("overallAvg", 87.5)
        );
        assert_eq!(
            rows[1],
            ResultRow::new()
                .with("courses_title", "210")
                .with("overallAvg", 77.25)
        );
    }

    #[test]
    fn test_groups_require_equality_on_all_keys() {
        let records = vec![
            Record::new().with("dept", "cpsc").with("year", 2015.0),
            Record::new().with("dept", "cpsc").with("year", 2016.0),
            Record::new().with("dept", "cpsc").with("year", 2015.0),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let transformations = Transformations {
            group: vec![
                QualifiedKey::new("courses", "dept"),
                QualifiedKey::new("courses", "year"),
            ],
            apply: vec![ApplyRule {
                name: "sections".into(),
                op: AggregateOp::Count,
                key: QualifiedKey::new("courses", "year"),
            }],
        };

        let rows = GroupTransformer::transform(&refs, &transformations);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("courses_year"), Some(&FieldValue::Number(2015.0)));
        assert_eq!(rows[0].get("sections"), Some(&FieldValue::Number(1.0)));
    }

    #[test]
    fn test_empty_apply_yields_group_keys_only() {
        let records = vec![section("a", 1.0), section("a", 2.0)];
        let refs: Vec<&Record> = records.iter().collect();
        let rows = GroupTransformer::transform(&refs, &by_title(Vec::new()));
        assert_eq!(rows, vec![ResultRow::new().with("courses_title", "a")]);
    }

    #[test]
    fn test_no_records_no_groups() {
        let rows = GroupTransformer::transform(&[], &by_title(Vec::new()));
        assert!(rows.is_empty());
    }
}
