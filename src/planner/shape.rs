//! Shape checks shared by the section validators

use serde_json::{Map, Value};

use crate::catalog::QualifiedKey;

use super::errors::{PlannerError, PlannerResult};

/// Requires a JSON object
pub(super) fn object<'a>(value: &'a Value, what: &str) -> PlannerResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| PlannerError::malformed(format!("{} must be an object", what)))
}

/// Requires a JSON array
pub(super) fn array<'a>(value: &'a Value, what: &str) -> PlannerResult<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| PlannerError::malformed(format!("{} must be an array", what)))
}

/// Requires a JSON array with at least one element
pub(super) fn non_empty_array<'a>(value: &'a Value, what: &str) -> PlannerResult<&'a Vec<Value>> {
    let items = array(value, what)?;
    if items.is_empty() {
        return Err(PlannerError::malformed(format!("{} must not be empty", what)));
    }
    Ok(items)
}

/// Requires a JSON string
pub(super) fn string<'a>(value: &'a Value, what: &str) -> PlannerResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| PlannerError::malformed(format!("{} must be a string", what)))
}

/// Requires an object with exactly one entry and returns it
pub(super) fn single_entry<'a>(
    value: &'a Value,
    what: &str,
) -> PlannerResult<(&'a String, &'a Value)> {
    let map = object(value, what)?;
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Ok(entry),
        _ => Err(PlannerError::malformed(format!(
            "{} must have exactly one key, found {}",
            what,
            map.len()
        ))),
    }
}

/// Requires an object whose key set is exactly `required` plus any of `optional`
pub(super) fn exact_keys(
    map: &Map<String, Value>,
    required: &[&str],
    optional: &[&str],
    what: &str,
) -> PlannerResult<()> {
    for key in required {
        if !map.contains_key(*key) {
            return Err(PlannerError::malformed(format!("{} is missing {}", what, key)));
        }
    }
    for key in map.keys() {
        if !required.contains(&key.as_str()) && !optional.contains(&key.as_str()) {
            return Err(PlannerError::malformed(format!(
                "{} has unexpected key {}",
                what, key
            )));
        }
    }
    Ok(())
}

/// Parses a qualified key string
pub(super) fn qualified_key(raw: &str) -> PlannerResult<QualifiedKey> {
    QualifiedKey::parse(raw).ok_or_else(|| PlannerError::invalid_key(raw))
}
