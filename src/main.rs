//! Connector diagnostic binary
//!
//! Prints the registration manifest the dispatcher would receive from this
//! module: command names, methods, endpoint templates, syntax alternatives,
//! and the declared type vocabulary. With `--ping`, verifies the MongoDB
//! deployment is reachable first.
//!
//! # Usage
//!
//! ```bash
//! mongo-connector mongodb://localhost:27017/app --ping
//! ```

use tracing::Level;

use mongo_connector::cli::CliInterface;
use mongo_connector::commands::{self, ConnectorContext};
use mongo_connector::connection::ConnectionManager;
use mongo_connector::error::{ConnectorError, Result};

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// # Returns
/// * `Result<()>` - Success or error
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;
    initialize_logging(&cli);

    let manager = ConnectionManager::new(cli.connection_uri(), cli.config().connection.clone());
    let context = ConnectorContext::new(manager, cli.database());

    if cli.args().ping {
        ping_deployment(&context).await?;
    }

    let registration = commands::register(&context);
    let manifest = serde_json::to_string_pretty(&registration.manifest())
        .map_err(|err| ConnectorError::Generic(format!("manifest serialization failed: {err}")))?;
    println!("{manifest}");

    Ok(())
}

/// Connect and verify the deployment responds
async fn ping_deployment(context: &ConnectorContext) -> Result<()> {
    context.connect().await?;
    let health = context.health_check().await?;

    if health.is_healthy {
        eprintln!(
            "Connected to MongoDB {} ({}ms)",
            health.server_version.as_deref().unwrap_or("unknown"),
            health.response_time_ms
        );
        Ok(())
    } else {
        Err(ConnectorError::Generic(format!(
            "deployment unhealthy: {}",
            health.diagnostics.as_deref().unwrap_or("no diagnostics")
        )))
    }
}

/// Initialize logging system based on verbosity level
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
