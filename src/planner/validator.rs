//! Query validator
//!
//! Accepts or rejects a raw query object as a whole. Validation is
//! all-or-nothing and finishes before any record is read.

use serde_json::Value;

use super::ast::{BoundQuery, Query};
use super::binding::{bind, KnownDatasets};
use super::errors::PlannerResult;
use super::{filter, options, shape, transformations};

/// Validates query objects against the currently known datasets
#[derive(Debug, Clone, Copy)]
pub struct QueryValidator<'a> {
    known: &'a KnownDatasets,
}

impl<'a> QueryValidator<'a> {
    /// Creates a validator over a snapshot of known datasets
    pub fn new(known: &'a KnownDatasets) -> Self {
        Self { known }
    }

    /// Validates a query object and binds it to its single dataset.
    ///
    /// Deterministic and total: every input yields either a bound query or
    /// a `PlannerError`.
    pub fn validate_and_bind(&self, raw: &Value) -> PlannerResult<BoundQuery> {
        // 1. Top-level shape: WHERE + OPTIONS, optionally TRANSFORMATIONS
        let map = shape::object(raw, "Query")?;
        shape::exact_keys(map, &["WHERE", "OPTIONS"], &["TRANSFORMATIONS"], "Query")?;

        // 2. Structural parse; OPTIONS depends on TRANSFORMATIONS
        let transformations = map
            .get("TRANSFORMATIONS")
            .map(transformations::parse)
            .transpose()?;
        let filter = filter::parse_where(&map["WHERE"])?;
        let options = options::parse(&map["OPTIONS"], transformations.as_ref())?;

        let query = Query {
            filter,
            options,
            transformations,
        };

        // 3. Bind to exactly one known dataset
        let (dataset_id, kind) = bind(query.referenced_keys(), self.known)?;

        // 4. Type-check every key against the bound kind
        if let Some(filter) = &query.filter {
            filter::check(filter, kind)?;
        }
        options::check(&query.options, kind)?;
        if let Some(transformations) = &query.transformations {
            transformations::check(transformations, kind)?;
        }

        Ok(BoundQuery::new(dataset_id, kind, query))
    }
}

/// Convenience wrapper for one-off validation
pub fn validate_and_bind(raw: &Value, known: &KnownDatasets) -> PlannerResult<BoundQuery> {
    QueryValidator::new(known).validate_and_bind(raw)
}
