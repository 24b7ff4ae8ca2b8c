//! Data-management facade
//!
//! The in-memory dataset registry that the query engine reads from, and the
//! single entry point used by the REST layer and the CLI.
//!
//! # Responsibilities
//!
//! - Dataset lifecycle: add, remove, list
//! - Ingestion checks: id syntax, duplicates, complete records
//! - `perform_query`: validate, bind and execute against a snapshot
//! - Domain event logging and counters for all of the above

mod dataset;
mod errors;
mod registry;

pub use dataset::{parse_records, validate_dataset_id, Dataset, DatasetInfo};
pub use errors::{FacadeError, FacadeResult};
pub use registry::DatasetRegistry;
