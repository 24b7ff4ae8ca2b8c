//! # HTTP Server Module
//!
//! Thin REST layer over the dataset registry. Every handler parses its
//! input, calls one facade operation and wraps the outcome as JSON.
//!
//! # Endpoints
//!
//! - `PUT /dataset/:id/:kind` - Add a dataset from a JSON array of records
//! - `DELETE /dataset/:id` - Remove a dataset
//! - `POST /query` - Run a query object
//! - `GET /datasets` - List loaded datasets
//! - `/health`, `/metrics` - Observability

pub mod config;
pub mod dataset_routes;
pub mod errors;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::RestError;
pub use server::{AppState, HttpServer};
