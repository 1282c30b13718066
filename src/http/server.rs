//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the env service handlers
//! - Wire up middleware (request id, tracing, timeout, body limit)
//! - Serve over TLS (rustls) or, when explicitly allowed, plaintext
//! - Run until the shutdown signal fires, then drain in-flight requests

use std::time::Duration;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::observability::metrics;
use crate::service::{setup_service_router, EnvServicer};

/// Time given to in-flight TLS connections after shutdown is requested.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP server hosting one env service.
pub struct EnvServer {
    router: Router,
    servicer: EnvServicer,
    tls: Option<RustlsConfig>,
}

impl EnvServer {
    /// Create a new server with the given configuration. Serves plaintext
    /// until TLS material is attached with [`EnvServer::with_tls`].
    pub fn new(config: &ServiceConfig, servicer: EnvServicer) -> Self {
        let router = Self::build_router(config, servicer.clone());
        Self {
            router,
            servicer,
            tls: None,
        }
    }

    pub fn with_tls(mut self, tls: RustlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// RPCs that may touch the environment at once. Always one.
    pub fn max_concurrency(&self) -> usize {
        self.servicer.max_concurrency()
    }

    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// Build the Axum router with all middleware layers, outermost first.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, servicer: EnvServicer) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        setup_service_router(servicer).layer(middleware)
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let replica = self.servicer.replica();
        tracing::info!(
            port = addr.port(),
            address = %addr,
            tls = self.is_tls(),
            max_concurrency = self.max_concurrency(),
            "Starting server"
        );
        metrics::set_ready(replica, true);

        match self.tls {
            Some(tls) => {
                let handle = axum_server::Handle::new();
                let drain = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    tracing::info!("Shutdown signal received");
                    drain.graceful_shutdown(Some(DRAIN_TIMEOUT));
                });

                axum_server::tls_rustls::from_tcp_rustls(listener.into_std()?, tls)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
            None => {
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown.recv().await;
                        tracing::info!("Shutdown signal received");
                    })
                    .await?;
            }
        }

        metrics::set_ready(replica, false);
        tracing::info!("Server stopped");
        Ok(())
    }
}
