//! Aggregate functions over one group
//!
//! SUM and AVG round to two decimals with `round(x * 100) / 100`, i.e.
//! half away from zero. AVG accumulates in a 128-bit decimal so long sums
//! carry no binary drift.

use std::collections::HashSet;

use dec::{Context, Decimal128};

use crate::catalog::FieldValue;
use crate::planner::AggregateOp;

/// Rounds to two fractional digits, half away from zero
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Hashable image of a field value, used for distinct counting
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) enum DistinctValue {
    Number(u64),
    Text(String),
}

impl From<&FieldValue> for DistinctValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            // -0.0 and 0.0 are the same value
            FieldValue::Number(n) if *n == 0.0 => DistinctValue::Number(0f64.to_bits()),
            FieldValue::Number(n) => DistinctValue::Number(n.to_bits()),
            FieldValue::Text(s) => DistinctValue::Text(s.clone()),
        }
    }
}

/// Applies an aggregate to the values of one field across a non-empty group
pub struct Aggregator;

impl Aggregator {
    /// Computes `op` over `values`.
    ///
    /// Numeric operators ignore non-numeric values; validation guarantees
    /// there are none.
    pub fn apply(op: AggregateOp, values: &[&FieldValue]) -> FieldValue {
        match op {
            AggregateOp::Count => FieldValue::Number(Self::count_distinct(values) as f64),
            AggregateOp::Max => Self::fold(values, f64::max),
            AggregateOp::Min => Self::fold(values, f64::min),
            AggregateOp::Sum => {
                let sum: f64 = Self::numbers(values).sum();
                FieldValue::Number(round_to_cents(sum))
            }
            AggregateOp::Avg => {
                let numbers: Vec<f64> = Self::numbers(values).collect();
                if numbers.is_empty() {
                    return FieldValue::Number(0.0);
                }
                let total = Self::decimal_sum(&numbers);
                FieldValue::Number(round_to_cents(total / numbers.len() as f64))
            }
        }
    }

    fn numbers<'a>(values: &'a [&'a FieldValue]) -> impl Iterator<Item = f64> + 'a {
        values.iter().filter_map(|v| v.as_number())
    }

    fn fold(values: &[&FieldValue], pick: fn(f64, f64) -> f64) -> FieldValue {
        let folded = Self::numbers(values).reduce(pick).unwrap_or(0.0);
        FieldValue::Number(folded)
    }

    fn count_distinct(values: &[&FieldValue]) -> usize {
        values
            .iter()
            .map(|v| DistinctValue::from(*v))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Sums through a decimal accumulator.
    ///
    /// Each term enters through its shortest decimal representation, so
    /// `0.1` is added as exactly one tenth.
    fn decimal_sum(numbers: &[f64]) -> f64 {
        let mut cx = Context::<Decimal128>::default();
        let mut total = Decimal128::from(0i32);
        for n in numbers {
            match cx.parse(n.to_string()) {
                Ok(term) => total = cx.add(total, term),
                Err(_) => return numbers.iter().sum(),
            }
        }
        total.to_string().parse::<f64>().unwrap_or_else(|_| numbers.iter().sum())
    }
}
