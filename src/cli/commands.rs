//! CLI command implementations
//!
//! Both commands share one boot sequence: load config, build an empty
//! registry, preload the configured datasets. `serve` then hands the
//! registry to the HTTP server; `query` answers one query from stdin.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::facade::DatasetRegistry;
use crate::http_server::HttpServer;
use crate::observability::{log_event_with_fields, Event};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{error_response, ok_response, read_request, write_json};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(&config),
        Command::Query { config } => query(&config),
    }
}

/// Load config and preload its datasets into a fresh registry
pub fn boot(config_path: &Path) -> CliResult<(Config, Arc<DatasetRegistry>)> {
    let config = Config::load(config_path)?;

    let path = config_path.display().to_string();
    let datasets = config.datasets.len().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("datasets", datasets.as_str()), ("path", path.as_str())],
    );

    let registry = Arc::new(DatasetRegistry::new());
    config.preload(&registry)?;

    Ok((config, registry))
}

/// Preload datasets and serve the REST API until the process is stopped
///
/// 1. Boot (config + preload)
/// 2. Install the request tracing subscriber
/// 3. Start the Axum server on the configured address
pub fn serve(config_path: &Path) -> CliResult<()> {
    let (config, registry) = boot(config_path)?;
    install_tracing_subscriber(&config.log_filter);

    let server = HttpServer::with_config(config.http_config(), registry);
    let addr = server.socket_addr();
    log_event_with_fields(Event::Serving, &[("addr", addr.as_str())]);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Execute a single query from stdin and exit
///
/// Query failures are answered on stdout as error responses; only boot and
/// I/O failures make the command itself fail.
pub fn query(config_path: &Path) -> CliResult<()> {
    let (_config, registry) = boot(config_path)?;
    let request = read_request()?;
    write_json(&answer(&registry, &request)?)
}

/// Runs one query and wraps the outcome in the CLI response envelope
pub fn answer(registry: &DatasetRegistry, request: &Value) -> CliResult<Value> {
    match registry.perform_query(request) {
        Ok(rows) => Ok(ok_response(serde_json::to_value(rows)?)),
        Err(err) => Ok(error_response(err.code(), &err.to_string())),
    }
}

fn install_tracing_subscriber(default_filter: &str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
