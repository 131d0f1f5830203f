//! Command-line interface for the connector diagnostic binary
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading
//! - Connection URI and default database selection

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

/// Extract database name from MongoDB connection URI
///
/// # Arguments
/// * `uri` - MongoDB connection URI
///
/// # Returns
/// * `Option<String>` - Database name if found in URI
pub fn extract_database_from_uri(uri: &str) -> Option<String> {
    // Format: mongodb://[username:password@]host[:port][/database][?options]
    if let Some(after_scheme) = uri.split("://").nth(1)
        && let Some(path_part) = after_scheme.split('/').nth(1)
    {
        let db_name = path_part.split('?').next().unwrap_or("");
        if !db_name.is_empty() {
            return Some(db_name.to_string());
        }
    }
    None
}

/// MongoDB collection commands for a command dispatcher
#[derive(Parser, Debug)]
#[command(
    name = "mongo-connector",
    version,
    about = "MongoDB collection commands for a command dispatcher",
    long_about = "Inspects the connector module a command dispatcher would register:
prints the command manifest (names, methods, endpoints, syntax, type
vocabulary) and optionally pings the MongoDB deployment first."
)]
pub struct CliArgs {
    /// MongoDB connection URI
    ///
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    #[arg(value_name = "URI")]
    pub uri: Option<String>,

    /// Database commands default to when a request omits dbname
    #[arg(long, value_name = "NAME")]
    pub database: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Ping the deployment before printing the manifest
    #[arg(long)]
    pub ping: bool,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,
}

/// Parsed arguments plus loaded configuration.
pub struct CliInterface {
    args: CliArgs,
    config: Config,
}

impl CliInterface {
    /// Parse arguments and load configuration
    ///
    /// # Returns
    /// * `Result<Self>` - Interface or configuration error
    pub fn new() -> Result<Self> {
        let args = CliArgs::parse();
        let config = Config::load(args.config_file.as_deref())?;
        Ok(Self { args, config })
    }

    /// Build an interface from pre-parsed arguments
    pub fn with_args(args: CliArgs, config: Config) -> Self {
        Self { args, config }
    }

    /// Get parsed arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Get loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Connection URI: argument first, configuration fallback
    pub fn connection_uri(&self) -> String {
        self.args
            .uri
            .clone()
            .unwrap_or_else(|| self.config.connection.default_uri.clone())
    }

    /// Default database: argument, then URI path, then configuration
    pub fn database(&self) -> String {
        if let Some(database) = &self.args.database {
            return database.clone();
        }
        if let Some(database) = extract_database_from_uri(&self.connection_uri()) {
            return database;
        }
        self.config.connection.default_database.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_database_from_uri() {
        assert_eq!(
            extract_database_from_uri("mongodb://localhost:27017/inventory"),
            Some("inventory".to_string())
        );
        assert_eq!(
            extract_database_from_uri("mongodb://user:pass@db:27017/app?retryWrites=true"),
            Some("app".to_string())
        );
        assert_eq!(extract_database_from_uri("mongodb://localhost:27017"), None);
        assert_eq!(
            extract_database_from_uri("mongodb://localhost:27017/"),
            None
        );
    }

    #[test]
    fn test_database_precedence() {
        let args = CliArgs {
            uri: Some("mongodb://localhost:27017/from_uri".to_string()),
            database: Some("from_flag".to_string()),
            config_file: None,
            ping: false,
            verbose: false,
            very_verbose: false,
        };
        let cli = CliInterface::with_args(args, Config::default());
        assert_eq!(cli.database(), "from_flag");

        let args = CliArgs {
            uri: Some("mongodb://localhost:27017/from_uri".to_string()),
            database: None,
            config_file: None,
            ping: false,
            verbose: false,
            very_verbose: false,
        };
        let cli = CliInterface::with_args(args, Config::default());
        assert_eq!(cli.database(), "from_uri");

        let args = CliArgs {
            uri: None,
            database: None,
            config_file: None,
            ping: false,
            verbose: false,
            very_verbose: false,
        };
        let cli = CliInterface::with_args(args, Config::default());
        assert_eq!(cli.database(), "test");
    }

    #[test]
    fn test_connection_uri_falls_back_to_config() {
        let args = CliArgs {
            uri: None,
            database: None,
            config_file: None,
            ping: false,
            verbose: false,
            very_verbose: false,
        };
        let cli = CliInterface::with_args(args, Config::default());
        assert_eq!(cli.connection_uri(), "mongodb://localhost:27017");
    }
}
