//! CLI module for campusql
//!
//! Provides command-line interface for:
//! - serve: Preload datasets and serve the REST API
//! - query: One-shot query execution over preloaded datasets

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{answer, boot, query, run, run_command, serve};
pub use config::{Config, DatasetSpec};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_response, ok_response, read_request, read_request_from, write_json};
