//! campusql - A strict, deterministic query engine over course section and
//! room datasets
//!
//! Queries are JSON objects (`WHERE`, `OPTIONS`, optional `TRANSFORMATIONS`)
//! validated against a fixed field catalog, bound to exactly one loaded
//! dataset and executed over an immutable in-memory snapshot.

pub mod catalog;
pub mod cli;
pub mod executor;
pub mod facade;
pub mod http_server;
pub mod observability;
pub mod planner;
