//! WHERE validation
//!
//! Parses the recursive filter body into `Filter` and, once the dataset kind
//! is known, checks every comparison key against the catalog.

use serde_json::Value;

use crate::catalog::{classify, DatasetKind, FieldClass};

use super::ast::{Filter, NumericOp, Pattern};
use super::errors::{PlannerError, PlannerResult};
use super::shape;

/// Parses the WHERE section. An empty object means "match everything".
pub(super) fn parse_where(value: &Value) -> PlannerResult<Option<Filter>> {
    let map = shape::object(value, "WHERE")?;
    if map.is_empty() {
        return Ok(None);
    }
    parse_filter(value).map(Some)
}

fn parse_filter(value: &Value) -> PlannerResult<Filter> {
    let (tag, payload) = shape::single_entry(value, "filter")?;

    match tag.as_str() {
        "AND" | "OR" => {
            let items = shape::non_empty_array(payload, tag)?;
            let filters = items
                .iter()
                .map(parse_filter)
                .collect::<PlannerResult<Vec<_>>>()?;
            if tag == "AND" {
                Ok(Filter::And(filters))
            } else {
                Ok(Filter::Or(filters))
            }
        }
        "NOT" => {
            shape::object(payload, "NOT")?;
            Ok(Filter::Not(Box::new(parse_filter(payload)?)))
        }
        "GT" | "LT" | "EQ" => {
            let op = NumericOp::from_token(tag)
                .ok_or_else(|| PlannerError::malformed(format!("unknown comparator {}", tag)))?;
            let (raw_key, literal) = shape::single_entry(payload, tag)?;
            let key = shape::qualified_key(raw_key)?;
            let value = match literal {
                Value::Number(n) => n.as_f64(),
                _ => None,
            }
            .ok_or_else(|| PlannerError::malformed(format!("{} value must be a number", tag)))?;
            Ok(Filter::Numeric { op, key, value })
        }
        "IS" => {
            let (raw_key, literal) = shape::single_entry(payload, "IS")?;
            let key = shape::qualified_key(raw_key)?;
            let raw = shape::string(literal, "IS value")?;
            let pattern = Pattern::parse(raw).ok_or_else(|| PlannerError::invalid_wildcard(raw))?;
            Ok(Filter::Text { key, pattern })
        }
        other => Err(PlannerError::malformed(format!("unknown filter {}", other))),
    }
}

/// Checks comparison keys against the bound dataset kind
pub(super) fn check(filter: &Filter, kind: DatasetKind) -> PlannerResult<()> {
    match filter {
        Filter::Not(inner) => check(inner, kind),
        Filter::And(filters) | Filter::Or(filters) => {
            filters.iter().try_for_each(|f| check(f, kind))
        }
        Filter::Numeric { key, .. } => match classify(kind, key.field()) {
            FieldClass::Numeric => Ok(()),
            FieldClass::String => Err(PlannerError::type_mismatch(key.to_string(), "numeric field")),
            FieldClass::Unknown => Err(PlannerError::invalid_key(key.to_string())),
        },
        Filter::Text { key, .. } => match classify(kind, key.field()) {
            FieldClass::String => Ok(()),
            FieldClass::Numeric => Err(PlannerError::type_mismatch(key.to_string(), "string field")),
            FieldClass::Unknown => Err(PlannerError::invalid_key(key.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::errors::PlannerErrorCode;
    use serde_json::json;

    fn code_of(value: Value) -> PlannerErrorCode {
        parse_where(&value).unwrap_err().code()
    }

    #[test]
    fn test_empty_where_matches_all() {
        assert_eq!(parse_where(&json!({})).unwrap(), None);
    }

    #[test]
    fn test_nested_filter() {
        let filter = parse_where(&json!({
            "AND": [
                {"GT": {"courses_avg": 90}},
                {"NOT": {"IS": {"courses_dept": "cp*"}}}
            ]
        }))
        .unwrap()
        .unwrap();

        match filter {
            Filter::And(children) => {
                assert_eq!(children.len(), 2);
                assert!(matches!(children[1], Filter::Not(_)));
            }
            other => panic!("unexpected filter {:?}", other),
        }
    }

    #[test]
    fn test_where_must_be_object() {
        assert_eq!(code_of(json!([])), PlannerErrorCode::QueryMalformed);
        assert_eq!(code_of(json!("x")), PlannerErrorCode::QueryMalformed);
    }

    #[test]
    fn test_logic_requires_non_empty_list() {
        assert_eq!(code_of(json!({"AND": []})), PlannerErrorCode::QueryMalformed);
        assert_eq!(code_of(json!({"OR": {}})), PlannerErrorCode::QueryMalformed);
    }

    #[test]
    fn test_not_requires_single_filter_object() {
        assert_eq!(
            code_of(json!({"NOT": [{"GT": {"courses_avg": 1}}]})),
            PlannerErrorCode::QueryMalformed
        );
        assert_eq!(code_of(json!({"NOT": {}})), PlannerErrorCode::QueryMalformed);
    }

    #[test]
    fn test_filter_with_two_tags_rejected() {
        assert_eq!(
            code_of(json!({
                "GT": {"courses_avg": 90},
                "LT": {"courses_avg": 95}
            })),
            PlannerErrorCode::QueryMalformed
        );
    }

    #[test]
    fn test_comparison_payload_types() {
        assert_eq!(
            code_of(json!({"GT": {"courses_avg": "90"}})),
            PlannerErrorCode::QueryMalformed
        );
        assert_eq!(
            code_of(json!({"IS": {"courses_dept": 5}})),
            PlannerErrorCode::QueryMalformed
        );
        assert_eq!(
            code_of(json!({"EQ": {"courses_avg": 90, "courses_pass": 1}})),
            PlannerErrorCode::QueryMalformed
        );
    }

    #[test]
    fn test_invalid_wildcards_rejected() {
        assert_eq!(
            code_of(json!({"IS": {"courses_instructor": "***"}})),
            PlannerErrorCode::QueryInvalidWildcard
        );
        assert_eq!(
            code_of(json!({"IS": {"courses_instructor": "el*sa"}})),
            PlannerErrorCode::QueryInvalidWildcard
        );
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert_eq!(
            code_of(json!({"GTE": {"courses_avg": 1}})),
            PlannerErrorCode::QueryMalformed
        );
    }

    #[test]
    fn test_check_types_against_kind() {
        let filter = parse_where(&json!({"IS": {"courses_avg": "9*"}})).unwrap().unwrap();
        assert_eq!(
            check(&filter, DatasetKind::CourseSection).unwrap_err().code(),
            PlannerErrorCode::QueryTypeMismatch
        );

        let filter = parse_where(&json!({"GT": {"courses_seats": 10}})).unwrap().unwrap();
        assert_eq!(
            check(&filter, DatasetKind::CourseSection).unwrap_err().code(),
            PlannerErrorCode::QueryInvalidKey
        );
        assert!(check(&filter, DatasetKind::Room).is_ok());
    }
}
