//! # Message Broker Management API
//!
//! Standalone management node: serves the REST API over an in-memory broker
//! kernel hosting AMQP and MQTT.
//!
//! ## Environment
//!
//! - `MB_API_HOST` / `MB_API_PORT`: listener (default `0.0.0.0:9443`)
//! - `MB_API_PREFIX`: route prefix (default `/mb/api`)
//! - `MB_API_LOG`: default log filter; `RUST_LOG` wins when set

use anyhow::{Context, Result};
use mb_management_api::domain::config::LoggingConfig;
use mb_management_api::{InMemoryBrokerKernel, ManagementConfig, ManagementServer, SERVICE_NAME, VERSION};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging before loading config, which may warn
    let logging = LoggingConfig::from_env();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("invalid log filter")?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ManagementConfig::from_env();

    info!(service = SERVICE_NAME, version = VERSION, "starting");

    let kernel = Arc::new(InMemoryBrokerKernel::with_protocols(["amqp", "mqtt"]));
    let mut server = ManagementServer::new(config, kernel).context("invalid configuration")?;
    let addr = server.start().await?;

    info!(addr = %addr, "Management API is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    server.shutdown().await?;
    Ok(())
}
