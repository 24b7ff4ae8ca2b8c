//! Result sorting for query execution
//!
//! Sorts are stable. A composite DOWN order reverses only the primary key;
//! later keys still break ties ascending.

use std::cmp::Ordering;

use crate::planner::{OrderSpec, SortDirection};

use super::result::ResultRow;

/// Sorts result rows
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts rows according to the ORDER specification
    pub fn sort(rows: &mut [ResultRow], order: &OrderSpec) {
        match order {
            OrderSpec::Single(key) => rows.sort_by(|a, b| Self::compare_key(a, b, key)),
            OrderSpec::Composite { direction, keys } => {
                rows.sort_by(|a, b| Self::compare_chain(a, b, *direction, keys))
            }
        }
    }

    fn compare_chain(
        a: &ResultRow,
        b: &ResultRow,
        direction: SortDirection,
        keys: &[String],
    ) -> Ordering {
        let Some((primary, rest)) = keys.split_first() else {
            return Ordering::Equal;
        };

        let ordering = Self::compare_key(a, b, primary);
        let ordering = match direction {
            SortDirection::Up => ordering,
            SortDirection::Down => ordering.reverse(),
        };

        rest.iter()
            .fold(ordering, |acc, key| acc.then_with(|| Self::compare_key(a, b, key)))
    }

    /// Compares one column; rows lacking it sort first
    fn compare_key(a: &ResultRow, b: &ResultRow, key: &str) -> Ordering {
        match (a.get(key), b.get(key)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => a_val.cmp_natural(b_val),
        }
    }
}
