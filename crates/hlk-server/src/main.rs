//! HLK-SW16 relay service
//!
//! Main entry point: loads the configuration from the environment, wires the
//! relay board client and optional notifier into the API and serves it until
//! interrupted.

use anyhow::{Context, Result};
use hlk_api::AppState;
use hlk_config::ServiceConfig;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting HLK-SW16 relay service");

    let config = ServiceConfig::from_env().context("failed to load configuration")?;
    info!(
        device = %config.device_addr(),
        attempts = config.status_attempts,
        "Relay board configured"
    );

    let bind_addr = config.bind_addr.clone();
    let state = AppState::from_config(config).context("failed to set up notifier")?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    hlk_api::serve(state, listener, shutdown_signal()).await?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
