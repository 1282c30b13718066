//! Metrics collection and exposition.
//!
//! # Metrics
//! - `env_service_rpc_total` (counter): RPCs by method and status
//! - `env_service_rpc_duration_seconds` (histogram): time spent per RPC, queueing included
//! - `env_service_ready` (gauge): 1 once the replica serves requests

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record one finished RPC.
pub fn record_rpc(rpc: &'static str, status: u16, start: Instant) {
    counter!("env_service_rpc_total", "rpc" => rpc, "status" => status.to_string()).increment(1);
    histogram!("env_service_rpc_duration_seconds", "rpc" => rpc).record(start.elapsed().as_secs_f64());
}

/// Flag the replica as ready (or not) to serve.
pub fn set_ready(replica: u32, ready: bool) {
    gauge!("env_service_ready", "replica" => replica.to_string()).set(if ready { 1.0 } else { 0.0 });
}
