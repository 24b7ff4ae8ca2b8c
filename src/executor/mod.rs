//! Query executor subsystem
//!
//! Consumes bound queries and produces deterministic result rows.
//!
//! # Execution Flow (strict order)
//!
//! 1. Filter the snapshot by WHERE
//! 2. Group and aggregate (TRANSFORMATIONS) or project plain records
//! 3. Project to COLUMNS
//! 4. Sort by ORDER
//! 5. Reject results over `MAX_RESULT_ROWS`
//!
//! # Invariants
//!
//! - Deterministic: same bound query + same snapshot = same rows
//! - Read-only: records are never mutated
//! - No truncation: an oversized result is an error, never a prefix

mod aggregate;
mod errors;
mod executor;
mod filters;
mod projector;
mod result;
mod session;
mod sorter;
mod transformer;

pub use aggregate::{round_to_cents, Aggregator};
pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use executor::{QueryExecutor, MAX_RESULT_ROWS};
pub use filters::PredicateFilter;
pub use projector::ColumnProjector;
pub use result::{ExecutionResult, ResultRow};
pub use session::{DatasetSource, QueryError, QuerySession};
pub use sorter::ResultSorter;
pub use transformer::GroupTransformer;
