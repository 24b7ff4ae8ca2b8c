//! Query planner subsystem
//!
//! Turns a raw JSON query object into a `BoundQuery`: a typed AST bound to
//! exactly one known dataset, with every key checked against the catalog.
//!
//! # Phases
//!
//! 1. Shape: exactly WHERE + OPTIONS, optionally TRANSFORMATIONS
//! 2. Parse: each section into its AST node
//! 3. Bind: a single known dataset id across all qualified keys
//! 4. Type-check: field classes against operators for the bound kind
//!
//! No record is read and nothing is logged here.

mod ast;
mod binding;
mod errors;
mod filter;
mod options;
mod shape;
mod transformations;
mod validator;

pub use ast::{
    AggregateOp, ApplyRule, BoundQuery, Column, Filter, NumericOp, Options, OrderSpec, Pattern,
    Query, SortDirection, Transformations,
};
pub use binding::KnownDatasets;
pub use errors::{PlannerError, PlannerErrorCode, PlannerResult, Severity};
pub use validator::{validate_and_bind, QueryValidator};
