//! Dataset-id binding
//!
//! A query must reference exactly one dataset id across every qualified key,
//! and that id must be currently known.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{DatasetKind, QualifiedKey};

use super::errors::{PlannerError, PlannerResult};

/// Currently known dataset ids and their kinds, supplied per call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownDatasets {
    kinds: BTreeMap<String, DatasetKind>,
}

impl KnownDatasets {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dataset id
    pub fn insert(&mut self, id: impl Into<String>, kind: DatasetKind) {
        self.kinds.insert(id.into(), kind);
    }

    /// Builder-style insert
    pub fn with(mut self, id: impl Into<String>, kind: DatasetKind) -> Self {
        self.insert(id, kind);
        self
    }

    /// Kind of a known dataset
    pub fn kind_of(&self, id: &str) -> Option<DatasetKind> {
        self.kinds.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.kinds.contains_key(id)
    }

    /// Known ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, DatasetKind)> for KnownDatasets {
    fn from_iter<I: IntoIterator<Item = (S, DatasetKind)>>(iter: I) -> Self {
        Self {
            kinds: iter.into_iter().map(|(id, kind)| (id.into(), kind)).collect(),
        }
    }
}

/// Resolves the single dataset id referenced by a set of keys.
///
/// Returns the id and its kind; zero ids, several ids or an unknown id are
/// all binding failures.
pub(super) fn bind<'k>(
    keys: impl IntoIterator<Item = &'k QualifiedKey>,
    known: &KnownDatasets,
) -> PlannerResult<(String, DatasetKind)> {
    let ids: BTreeSet<&str> = keys.into_iter().map(QualifiedKey::dataset).collect();

    let mut iter = ids.iter();
    let id = match (iter.next(), iter.next()) {
        (Some(id), None) => *id,
        (None, _) => {
            return Err(PlannerError::dataset_binding(
                "Query references no dataset",
            ))
        }
        (Some(_), Some(_)) => {
            let listed: Vec<&str> = ids.iter().copied().collect();
            return Err(PlannerError::dataset_binding(format!(
                "Query references several datasets: {}",
                listed.join(", ")
            )));
        }
    };

    let kind = known.kind_of(id).ok_or_else(|| {
        PlannerError::dataset_binding(format!("Dataset '{}' is not loaded", id))
    })?;
    Ok((id.to_string(), kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> KnownDatasets {
        KnownDatasets::new()
            .with("courses", DatasetKind::CourseSection)
            .with("rooms", DatasetKind::Room)
    }

    #[test]
    fn test_bind_single_id() {
        let keys = [
            QualifiedKey::new("rooms", "seats"),
            QualifiedKey::new("rooms", "shortname"),
        ];
        let (id, kind) = bind(keys.iter(), &known()).unwrap();
        assert_eq!(id, "rooms");
        assert_eq!(kind, DatasetKind::Room);
    }

    #[test]
    fn test_bind_rejects_mixed_ids() {
        let keys = [
            QualifiedKey::new("rooms", "seats"),
            QualifiedKey::new("courses", "avg"),
        ];
        let err = bind(keys.iter(), &known()).unwrap_err();
        assert!(err.message().contains("courses, rooms"));
    }

    #[test]
    fn test_bind_rejects_unknown_and_empty() {
        let keys = [QualifiedKey::new("sections", "avg")];
        assert!(bind(keys.iter(), &known()).is_err());
        assert!(bind(std::iter::empty(), &known()).is_err());
    }

    #[test]
    fn test_known_datasets_from_iter() {
        let known: KnownDatasets = vec![("b", DatasetKind::Room), ("a", DatasetKind::Room)]
            .into_iter()
            .collect();
        assert_eq!(known.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(known.contains("a"));
        assert_eq!(known.len(), 2);
    }
}
