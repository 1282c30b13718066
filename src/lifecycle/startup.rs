//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Construct the environment and its service adapter
//! - Load TLS material
//! - Bind the listener and hand it to the server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - `prepare` never touches the network, so a bad environment name or
//!   broken certificate fails before any port is opened
//! - Listeners start last (traffic only when ready)

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::validation::{validate_config, ValidationError};
use crate::config::ServiceConfig;
use crate::env::{make_env, EnvError};
use crate::http::EnvServer;
use crate::lifecycle::Shutdown;
use crate::net::listener::{self, ListenerError};
use crate::net::tls::{load_tls_config, TlsError};
use crate::service::EnvServicer;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0:?}")]
    Config(Vec<ValidationError>),

    #[error("failed to construct environment: {0}")]
    Env(#[from] EnvError),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Everything needed to serve, built before any port is bound.
pub struct Prepared {
    pub config: ServiceConfig,
    pub servicer: EnvServicer,
    pub output_dir: PathBuf,
    pub tls: Option<RustlsConfig>,
}

/// Validate, construct the environment, and load TLS material.
pub async fn prepare(config: ServiceConfig) -> Result<Prepared, StartupError> {
    validate_config(&config).map_err(StartupError::Config)?;

    let output_dir = config.output_dir();
    let problem = make_env(&config.env)?;

    let tls = match &config.listener.tls {
        Some(tls) => Some(load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?),
        None => {
            tracing::warn!("TLS disabled; serving plaintext");
            None
        }
    };

    tracing::info!(
        replica = config.runtime.replica,
        env = problem.name(),
        batch_size = problem.batch_size(),
        output_dir = %output_dir.display(),
        use_tpu = config.runtime.use_tpu,
        xm = config.runtime.xm,
        "Replica[{}] is ready to serve requests",
        config.runtime.replica
    );

    let servicer = EnvServicer::new(problem, config.runtime.replica, output_dir.clone());
    Ok(Prepared {
        config,
        servicer,
        output_dir,
        tls,
    })
}

/// Bind the configured port.
pub async fn bind(prepared: &Prepared) -> Result<TcpListener, StartupError> {
    Ok(listener::bind(&prepared.config.bind_address()).await?)
}

/// Serve a prepared replica on `listener` until `shutdown` fires.
pub async fn serve(
    prepared: Prepared,
    listener: TcpListener,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let mut server = EnvServer::new(&prepared.config, prepared.servicer);
    if let Some(tls) = prepared.tls {
        server = server.with_tls(tls);
    }
    server.run(listener, shutdown).await
}

/// Drive `server` until `signal` completes, then trigger `shutdown` and wait
/// for the server to drain. A server that stops before the signal is an error.
pub async fn supervise<S, F>(server: S, signal: F, shutdown: &Shutdown) -> io::Result<()>
where
    S: Future<Output = io::Result<()>> + Send + 'static,
    F: Future<Output = ()>,
{
    let mut server = tokio::spawn(server);

    tokio::select! {
        _ = signal => {
            shutdown.trigger();
            server.await.map_err(io::Error::other)?
        }
        result = &mut server => {
            result.map_err(io::Error::other)??;
            tracing::error!("Server exited without a shutdown signal");
            Err(io::Error::other("server exited unexpectedly"))
        }
    }
}
