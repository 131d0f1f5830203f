//! MongoDB Connector Library
//!
//! This library exposes a small set of named commands over MongoDB
//! collections (list, create, insert one, find one by equality, find many)
//! to an external command dispatcher. It translates the dispatcher's
//! structured requests into driver calls and adapts driver results back
//! into the uniform handler shape the dispatcher expects.
//!
//! # Modules
//!
//! - `cli`: Command-line interface for the diagnostic binary
//! - `commands`: Command registry and the collection operations
//! - `config`: Configuration management
//! - `connection`: MongoDB connection management
//! - `dispatch`: Dispatcher-facing types (requests, descriptors, handlers)
//! - `error`: Error types and handling
//!
//! # Example
//!
//! ```no_run
//! use mongo_connector::commands::{self, ConnectorContext};
//! use mongo_connector::config::Config;
//! use mongo_connector::connection::ConnectionManager;
//!
//! #[tokio::main]
//! async fn main() -> mongo_connector::error::Result<()> {
//!     let config = Config::default();
//!     let manager = ConnectionManager::new(
//!         config.connection.default_uri.clone(),
//!         config.connection.clone(),
//!     );
//!
//!     let context = ConnectorContext::new(manager, config.connection.default_database);
//!     context.connect().await?;
//!
//!     let registration = commands::register(&context);
//!     println!("{} commands registered", registration.commands.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod error;

// Re-export commonly used types
pub use commands::ConnectorContext;
pub use config::Config;
pub use connection::ConnectionManager;
pub use dispatch::{CommandDescriptor, CommandHandler, ModuleRegistration, Request};
pub use error::{ConnectorError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
