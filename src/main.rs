//! Remote environment server.
//!
//! Hosts one batched reinforcement-learning environment per process and
//! exposes it over a TLS-secured JSON RPC endpoint.
//!
//! ```text
//!   flags / TOML ──▶ config ──▶ env factory ──▶ servicer ──▶ listener ──▶ serve
//!                                                                           │
//!                                                  SIGINT/SIGTERM ──▶ graceful stop
//! ```
//!
//! The environment is constructed before the port is bound, so a bad
//! environment name or certificate never leaves a half-started replica behind.

use std::net::SocketAddr;

use clap::Parser;

use env_service::config::Cli;
use env_service::lifecycle::{signals, startup, Shutdown};
use env_service::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;
    logging::init_logging(&config.observability.log_level)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.listener.port,
        env = ?config.env.name,
        replica = config.runtime.replica,
        "env-service starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let prepared = startup::prepare(config).await?;
    let listener = startup::bind(&prepared).await?;

    let shutdown = Shutdown::new();
    let server = startup::serve(prepared, listener, shutdown.subscribe());
    startup::supervise(server, signals::wait_for_shutdown_signal(), &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
