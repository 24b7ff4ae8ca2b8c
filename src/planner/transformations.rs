//! TRANSFORMATIONS validation (GROUP and APPLY)

use std::collections::HashSet;

use serde_json::Value;

use crate::catalog::{classify, DatasetKind, FieldClass, KEY_SEPARATOR};

use super::ast::{AggregateOp, ApplyRule, Transformations};
use super::errors::{PlannerError, PlannerResult};
use super::shape;

/// Parses TRANSFORMATIONS: exactly GROUP and APPLY.
pub(super) fn parse(value: &Value) -> PlannerResult<Transformations> {
    let map = shape::object(value, "TRANSFORMATIONS")?;
    shape::exact_keys(map, &["GROUP", "APPLY"], &[], "TRANSFORMATIONS")?;

    let group = shape::non_empty_array(&map["GROUP"], "GROUP")?
        .iter()
        .map(|raw| shape::qualified_key(shape::string(raw, "GROUP key")?))
        .collect::<PlannerResult<Vec<_>>>()?;

    let mut seen = HashSet::new();
    let mut apply = Vec::new();
    for raw in shape::array(&map["APPLY"], "APPLY")? {
        let rule = parse_rule(raw)?;
        if !seen.insert(rule.name.clone()) {
            return Err(PlannerError::apply_key(rule.name, "is declared twice"));
        }
        apply.push(rule);
    }

    Ok(Transformations { group, apply })
}

fn parse_rule(value: &Value) -> PlannerResult<ApplyRule> {
    let (name, body) = shape::single_entry(value, "APPLY rule")?;
    if name.is_empty() {
        return Err(PlannerError::apply_key(name.as_str(), "must not be empty"));
    }
    if name.contains(KEY_SEPARATOR) {
        return Err(PlannerError::apply_key(
            name.as_str(),
            "must not contain an underscore",
        ));
    }

    let (token, target) = shape::single_entry(body, "APPLY body")?;
    let op = AggregateOp::from_token(token)
        .ok_or_else(|| PlannerError::malformed(format!("unknown aggregate {}", token)))?;
    let key = shape::qualified_key(shape::string(target, "APPLY target")?)?;

    Ok(ApplyRule {
        name: name.clone(),
        op,
        key,
    })
}

/// Checks GROUP keys and apply targets against the bound dataset kind
pub(super) fn check(transformations: &Transformations, kind: DatasetKind) -> PlannerResult<()> {
    for key in &transformations.group {
        if !classify(kind, key.field()).is_known() {
            return Err(PlannerError::invalid_key(key.to_string()));
        }
    }

    for rule in &transformations.apply {
        match classify(kind, rule.key.field()) {
            FieldClass::Unknown => return Err(PlannerError::invalid_key(rule.key.to_string())),
            FieldClass::String if rule.op.requires_numeric() => {
                return Err(PlannerError::type_mismatch(
                    rule.key.to_string(),
                    &format!("numeric field for {}", rule.op.as_str()),
                ))
            }
            _ => {}
        }
    }
    Ok(())
}
