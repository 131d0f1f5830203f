//! Connection management for MongoDB
//!
//! This module provides connection management functionality including:
//! - Connection establishment and termination
//! - Connection pool configuration
//! - Health checks
//! - Database handle resolution
//!
//! The command layer resolves a database handle fresh for every invocation
//! and never holds one across calls; ownership of the underlying connections
//! stays with the driver's pool.

use mongodb::bson::doc;
use mongodb::{Client, Database, options::ClientOptions};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::ConnectionConfig;
use crate::error::{ConnectionError, Result};

/// MongoDB connection manager
///
/// Owns the driver client and tracks connection state. The driver handles
/// pooling internally; this type only configures it and verifies liveness.
pub struct ConnectionManager {
    /// MongoDB client instance
    client: Option<Client>,

    /// Connection configuration
    config: ConnectionConfig,

    /// Current connection state
    state: Arc<RwLock<ConnectionState>>,

    /// Connection URI
    uri: String,
}

/// Connection state information
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected
    Disconnected,

    /// Currently connecting
    Connecting,

    /// Connected and ready
    Connected,

    /// Connection failed
    Failed(String),

    /// Reconnecting after failure
    Reconnecting,
}

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: u32,

    /// Minimum number of idle connections
    pub min_idle: u32,

    /// Connection timeout duration
    pub connection_timeout: Duration,

    /// Idle connection timeout duration
    pub idle_timeout: Duration,
}

/// Health check result
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the connection is healthy
    pub is_healthy: bool,

    /// Response time in milliseconds
    pub response_time_ms: u64,

    /// Server version
    pub server_version: Option<String>,

    /// Additional diagnostic information
    pub diagnostics: Option<String>,
}

impl ConnectionManager {
    /// Create a new connection manager
    ///
    /// # Arguments
    /// * `uri` - MongoDB connection URI
    /// * `config` - Connection configuration
    ///
    /// # Returns
    /// * `Self` - New connection manager instance
    pub fn new(uri: String, config: ConnectionConfig) -> Self {
        Self {
            client: None,
            config,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            uri,
        }
    }

    /// Get the connection URI
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Establish connection to MongoDB
    ///
    /// # Returns
    /// * `Result<()>` - Success or connection error
    pub async fn connect(&mut self) -> Result<()> {
        self.set_state(ConnectionState::Connecting).await;

        let options = match Self::parse_uri(&self.uri).await {
            Ok(options) => options,
            Err(err) => {
                self.set_state(ConnectionState::Failed(err.to_string())).await;
                return Err(err);
            }
        };
        let options = self.configure_pool(options);

        match self.connect_with_retry(options).await {
            Ok(client) => {
                info!("Connected to {}", self.uri);
                self.client = Some(client);
                self.set_state(ConnectionState::Connected).await;
                Ok(())
            }
            Err(err) => {
                self.set_state(ConnectionState::Failed(err.to_string())).await;
                Err(err)
            }
        }
    }

    /// Disconnect from MongoDB
    ///
    /// Closes all connections and cleans up resources
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            client.shutdown().await;
        }
        self.set_state(ConnectionState::Disconnected).await;
        Ok(())
    }

    /// Reconnect to MongoDB
    ///
    /// # Returns
    /// * `Result<()>` - Success or connection error
    pub async fn reconnect(&mut self) -> Result<()> {
        self.set_state(ConnectionState::Reconnecting).await;
        self.client = None;
        self.connect().await
    }

    /// Perform health check on the connection
    ///
    /// # Returns
    /// * `Result<HealthStatus>` - Health check results or error
    pub async fn health_check(&self) -> Result<HealthStatus> {
        let client = self.get_client()?;

        let start = Instant::now();
        let ping = Self::ping(client).await;
        let response_time_ms = start.elapsed().as_millis() as u64;

        match ping {
            Ok(()) => Ok(HealthStatus {
                is_healthy: true,
                response_time_ms,
                server_version: self.server_version().await.ok(),
                diagnostics: None,
            }),
            Err(err) => Ok(HealthStatus {
                is_healthy: false,
                response_time_ms,
                server_version: None,
                diagnostics: Some(err.to_string()),
            }),
        }
    }

    /// Get the MongoDB server version via `buildInfo`
    ///
    /// # Returns
    /// * `Result<String>` - Server version string or error
    pub async fn server_version(&self) -> Result<String> {
        let client = self.get_client()?;
        let reply = client
            .database("admin")
            .run_command(doc! { "buildInfo": 1 })
            .await?;
        let version = reply
            .get_str("version")
            .map_err(|err| ConnectionError::PingFailed(err.to_string()))?;
        Ok(version.to_string())
    }

    /// Get a database handle
    ///
    /// # Arguments
    /// * `name` - Database name
    ///
    /// # Returns
    /// * `Result<Database>` - Database handle or error
    pub fn get_database(&self, name: &str) -> Result<Database> {
        Ok(self.get_client()?.database(name))
    }

    /// Get the MongoDB client
    ///
    /// # Returns
    /// * `Result<&Client>` - Reference to client or error
    pub fn get_client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| ConnectionError::NotConnected.into())
    }

    /// Get current connection state
    ///
    /// # Returns
    /// * `ConnectionState` - Current state
    pub async fn get_state(&self) -> ConnectionState {
        self.state.read().await.clone()
    }

    /// Check if currently connected
    ///
    /// # Returns
    /// * `bool` - True if connected
    pub async fn is_connected(&self) -> bool {
        matches!(*self.state.read().await, ConnectionState::Connected)
    }

    /// Parse connection URI and create client options
    async fn parse_uri(uri: &str) -> Result<ClientOptions> {
        ClientOptions::parse(uri)
            .await
            .map_err(|err| ConnectionError::InvalidUri(err.to_string()).into())
    }

    /// Configure client options with pool settings
    fn configure_pool(&self, mut options: ClientOptions) -> ClientOptions {
        let pool = PoolConfig::from(&self.config);
        options.max_pool_size = Some(pool.max_size);
        options.min_pool_size = Some(pool.min_idle);
        options.connect_timeout = Some(pool.connection_timeout);
        options.server_selection_timeout = Some(pool.connection_timeout);
        options.max_idle_time = Some(pool.idle_timeout);
        options
    }

    /// Update connection state
    async fn set_state(&self, new_state: ConnectionState) {
        *self.state.write().await = new_state;
    }

    /// Attempt connection with retries
    ///
    /// # Arguments
    /// * `options` - Client options
    ///
    /// # Returns
    /// * `Result<Client>` - Connected client or error
    async fn connect_with_retry(&self, options: ClientOptions) -> Result<Client> {
        let attempts = self.config.retry_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            debug!("Connection attempt {attempt}/{attempts}");

            let client = Client::with_options(options.clone())
                .map_err(|err| ConnectionError::ConnectionFailed(err.to_string()))?;

            match Self::ping(&client).await {
                Ok(()) => return Ok(client),
                Err(err) => {
                    warn!("Connection attempt {attempt} failed: {err}");
                    last_error = Some(err);
                    if attempt < attempts {
                        tokio::time::sleep(Duration::from_millis(200 * u64::from(attempt))).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ConnectionError::Timeout.into()))
    }

    /// Verify the deployment is reachable by sending a ping
    async fn ping(client: &Client) -> Result<()> {
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|err| ConnectionError::PingFailed(err.to_string()).into())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            min_idle: 2,
            connection_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
        }
    }
}

impl From<&ConnectionConfig> for PoolConfig {
    fn from(config: &ConnectionConfig) -> Self {
        Self {
            max_size: config.max_pool_size,
            min_idle: config.min_pool_size,
            connection_timeout: Duration::from_secs(config.timeout),
            idle_timeout: Duration::from_secs(config.idle_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state() {
        let state = ConnectionState::Disconnected;
        assert_eq!(state, ConnectionState::Disconnected);
        assert_ne!(state, ConnectionState::Connected);
    }

    #[test]
    fn test_pool_config_default() {
        let config = PoolConfig::default();
        assert_eq!(config.max_size, 10);
        assert_eq!(config.min_idle, 2);
    }

    #[test]
    fn test_pool_config_from_connection_config() {
        let conn_config = ConnectionConfig::default();
        let pool_config = PoolConfig::from(&conn_config);
        assert_eq!(pool_config.max_size, conn_config.max_pool_size);
        assert_eq!(
            pool_config.idle_timeout,
            Duration::from_secs(conn_config.idle_timeout)
        );
    }

    #[test]
    fn test_unconnected_manager_resolves_nothing() {
        let manager = ConnectionManager::new(
            "mongodb://localhost:27017".to_string(),
            ConnectionConfig::default(),
        );
        assert!(manager.get_client().is_err());
        assert!(manager.get_database("test").is_err());
    }

    #[test]
    fn test_parse_uri_rejects_garbage() {
        tokio_test::block_on(async {
            let result = ConnectionManager::parse_uri("not-a-mongodb-uri").await;
            assert!(result.is_err());
        });
    }
}
