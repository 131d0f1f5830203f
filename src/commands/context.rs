//! Connector context shared by command handlers
//!
//! Handlers are stateless; the context only carries the connection manager
//! and the default database name. A database handle is resolved fresh for
//! every invocation and never retained.

use std::sync::Arc;

use mongodb::Database;
use tokio::sync::RwLock;

use crate::connection::{ConnectionManager, HealthStatus};
use crate::error::Result;

/// Shared state command handlers resolve database handles through.
#[derive(Clone)]
pub struct ConnectorContext {
    /// Connection manager
    connection: Arc<RwLock<ConnectionManager>>,

    /// Database used when a request carries no `dbname`
    default_database: String,
}

impl ConnectorContext {
    /// Create a new connector context
    ///
    /// # Arguments
    /// * `connection` - Connection manager
    /// * `default_database` - Database used when a request omits `dbname`
    ///
    /// # Returns
    /// * `Self` - New context
    pub fn new(connection: ConnectionManager, default_database: impl Into<String>) -> Self {
        Self {
            connection: Arc::new(RwLock::new(connection)),
            default_database: default_database.into(),
        }
    }

    /// Get the default database name
    pub fn default_database(&self) -> &str {
        &self.default_database
    }

    /// Resolve a database handle for an optional request-supplied name
    ///
    /// # Arguments
    /// * `name` - Database name from the request, if any
    ///
    /// # Returns
    /// * `Result<Database>` - Database handle or resolution error
    pub async fn database(&self, name: Option<&str>) -> Result<Database> {
        let connection = self.connection.read().await;
        connection.get_database(name.unwrap_or(&self.default_database))
    }

    /// Establish the underlying connection
    pub async fn connect(&self) -> Result<()> {
        self.connection.write().await.connect().await
    }

    /// Run a health check against the deployment
    pub async fn health_check(&self) -> Result<HealthStatus> {
        self.connection.read().await.health_check().await
    }
}
