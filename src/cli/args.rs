//! CLI argument definitions using clap
//!
//! Commands:
//! - campusql serve --config <path>
//! - campusql query --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// campusql - query engine over course-section and room datasets
#[derive(Parser, Debug)]
#[command(name = "campusql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Preload datasets and serve the REST API
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./campusql.json")]
        config: PathBuf,
    },

    /// Preload datasets, run one query from stdin and exit
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./campusql.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_with_config() {
        let cli = Cli::try_parse_from(["campusql", "query", "--config", "/etc/campusql.json"]).unwrap();
        match cli.command {
            Command::Query { config } => assert_eq!(config, PathBuf::from("/etc/campusql.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_serve_defaults_config_path() {
        let cli = Cli::try_parse_from(["campusql", "serve"]).unwrap();
        match cli.command {
            Command::Serve { config } => assert_eq!(config, PathBuf::from("./campusql.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
