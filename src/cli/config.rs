//! Configuration file handling
//!
//! `campusql.json` carries the server settings plus the datasets to
//! preload. Relative dataset paths resolve against the config file's
//! directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::DatasetKind;
use crate::facade::DatasetRegistry;
use crate::http_server::config::{default_cors_origins, default_host, default_port};
use crate::http_server::HttpServerConfig;

use super::errors::{CliError, CliResult};

/// One dataset to load at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Dataset id (no underscores)
    pub id: String,

    /// `courses` or `rooms`
    pub kind: DatasetKind,

    /// JSON file holding an array of flat records
    pub path: PathBuf,
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host to bind to (default "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default 4321)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty means any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// `tracing` filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Datasets loaded before serving or querying
    #[serde(default)]
    pub datasets: Vec<DatasetSpec>,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.port == 0 {
            return Err(CliError::config_error("port must be greater than 0"));
        }

        let mut seen = HashSet::new();
        for spec in &self.datasets {
            if !seen.insert(spec.id.as_str()) {
                return Err(CliError::config_error(format!(
                    "dataset '{}' is configured more than once",
                    spec.id
                )));
            }
        }

        Ok(())
    }

    /// HTTP settings taken from this config
    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }

    /// Resolves a dataset path against the config file's directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Loads every configured dataset into the registry, in file order
    pub fn preload(&self, registry: &DatasetRegistry) -> CliResult<()> {
        for spec in &self.datasets {
            let path = self.resolve(&spec.path);
            let content = fs::read_to_string(&path).map_err(|e| {
                CliError::dataset_load_failed(format!(
                    "Failed to read dataset '{}' from {}: {}",
                    spec.id,
                    path.display(),
                    e
                ))
            })?;

            let payload: Value = serde_json::from_str(&content).map_err(|e| {
                CliError::dataset_load_failed(format!(
                    "Dataset '{}' is not valid JSON: {}",
                    spec.id, e
                ))
            })?;

            registry
                .add_dataset_json(&spec.id, spec.kind, &payload)
                .map_err(|e| {
                    CliError::dataset_load_failed(format!(
                        "Dataset '{}' rejected ({}): {}",
                        spec.id,
                        e.code(),
                        e
                    ))
                })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, config: Value) -> PathBuf {
        let path = dir.path().join("campusql.json");
        fs::write(&path, config.to_string()).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, json!({}));

        let config = Config::load(&path).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 4321);
        assert_eq!(config.log_filter, "info");
        assert!(config.datasets.is_empty());
        assert_eq!(config.http_config(), HttpServerConfig::default());
    }

    #[test]
    fn test_config_rejects_port_zero() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, json!({"port": 0}));

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_config_rejects_duplicate_dataset_ids() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            json!({"datasets": [
                {"id": "rooms", "kind": "rooms", "path": "a.json"},
                {"id": "rooms", "kind": "rooms", "path": "b.json"}
            ]}),
        );

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_config_rejects_unknown_kind() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            json!({"datasets": [{"id": "b", "kind": "buildings", "path": "b.json"}]}),
        );

        let err = Config::load(&path).unwrap_err();
        assert!(err.message().contains("Invalid config JSON"));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, json!({}));
        let config = Config::load(&path).unwrap();

        assert_eq!(config.resolve(Path::new("rooms.json")), dir.path().join("rooms.json"));
    }

    #[test]
    fn test_preload_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            json!({"datasets": [{"id": "rooms", "kind": "rooms", "path": "missing.json"}]}),
        );
        let config = Config::load(&path).unwrap();

        let err = config.preload(&DatasetRegistry::new()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::DatasetLoadFailed);
    }
}
