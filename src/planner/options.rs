//! OPTIONS validation (COLUMNS and ORDER)

use serde_json::{Map, Value};

use crate::catalog::{classify, DatasetKind, KEY_SEPARATOR};

use super::ast::{Column, OrderSpec, Options, SortDirection, Transformations};
use super::errors::{PlannerError, PlannerResult};
use super::shape;

/// Accepted spellings of the composite ORDER direction key
const DIRECTION_KEYS: [&str; 2] = ["dir", "direction"];

/// Parses OPTIONS. TRANSFORMATIONS must already be parsed, since it decides
/// which column names are legal.
pub(super) fn parse(
    value: &Value,
    transformations: Option<&Transformations>,
) -> PlannerResult<Options> {
    let map = shape::object(value, "OPTIONS")?;
    shape::exact_keys(map, &["COLUMNS"], &["ORDER"], "OPTIONS")?;

    let raw_columns = shape::non_empty_array(&map["COLUMNS"], "COLUMNS")?;
    let columns = raw_columns
        .iter()
        .map(|raw| {
            let name = shape::string(raw, "COLUMNS entry")?;
            parse_column(name, transformations)
        })
        .collect::<PlannerResult<Vec<_>>>()?;

    let options = Options {
        columns,
        order: None,
    };
    let order = match map.get("ORDER") {
        Some(raw) => Some(parse_order(raw, &options.column_names())?),
        None => None,
    };

    Ok(Options { order, ..options })
}

fn parse_column(name: &str, transformations: Option<&Transformations>) -> PlannerResult<Column> {
    let Some(transformations) = transformations else {
        return shape::qualified_key(name).map(Column::Key);
    };

    if name.contains(KEY_SEPARATOR) {
        let key = shape::qualified_key(name)?;
        if !transformations.group.contains(&key) {
            return Err(PlannerError::malformed(format!(
                "column {} is neither a GROUP key nor an apply key",
                name
            )));
        }
        Ok(Column::Key(key))
    } else if transformations.rule(name).is_some() {
        Ok(Column::Apply(name.to_string()))
    } else {
        Err(PlannerError::malformed(format!(
            "column {} is not a declared apply key",
            name
        )))
    }
}

fn parse_order(value: &Value, columns: &[String]) -> PlannerResult<OrderSpec> {
    match value {
        Value::String(key) => {
            require_column(key, columns)?;
            Ok(OrderSpec::Single(key.clone()))
        }
        Value::Object(map) => parse_composite(map, columns),
        _ => Err(PlannerError::malformed(
            "ORDER must be a key or an object with keys and direction",
        )),
    }
}

fn parse_composite(map: &Map<String, Value>, columns: &[String]) -> PlannerResult<OrderSpec> {
    let direction_key = DIRECTION_KEYS
        .iter()
        .find(|k| map.contains_key(**k))
        .ok_or_else(|| PlannerError::malformed("ORDER is missing dir"))?;
    let direction_key: &str = direction_key;
    shape::exact_keys(map, &["keys", direction_key], &[], "ORDER")?;

    let token = shape::string(&map[direction_key], "ORDER direction")?;
    let direction = SortDirection::from_token(token)
        .ok_or_else(|| PlannerError::malformed(format!("invalid ORDER direction {}", token)))?;

    let keys = shape::non_empty_array(&map["keys"], "ORDER keys")?
        .iter()
        .map(|raw| {
            let key = shape::string(raw, "ORDER key")?;
            require_column(key, columns)?;
            Ok(key.to_string())
        })
        .collect::<PlannerResult<Vec<_>>>()?;

    Ok(OrderSpec::Composite { direction, keys })
}

fn require_column(key: &str, columns: &[String]) -> PlannerResult<()> {
    if columns.iter().any(|c| c == key) {
        Ok(())
    } else {
        Err(PlannerError::malformed(format!(
            "ORDER key {} is not in COLUMNS",
            key
        )))
    }
}

/// Checks every column key against the bound dataset kind
pub(super) fn check(options: &Options, kind: DatasetKind) -> PlannerResult<()> {
    for column in &options.columns {
        if let Column::Key(key) = column {
            if !classify(kind, key.field()).is_known() {
                return Err(PlannerError::invalid_key(key.to_string()));
            }
        }
    }
    Ok(())
}
