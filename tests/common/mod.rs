//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use env_service::config::{ServiceConfig, TlsConfig};
use env_service::lifecycle::{startup, Shutdown};
use tokio::task::JoinHandle;

/// A replica running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub tls: bool,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        if self.tls {
            format!("https://localhost:{}{}", self.addr.port(), path)
        } else {
            format!("http://{}{}", self.addr, path)
        }
    }

    pub async fn stop(self) -> Result<(), std::io::Error> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked")
    }
}

/// Plaintext config for `env_name`; tests adjust it further as needed.
pub fn config(env_name: &str) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.insecure = true;
    config.env.name = Some(env_name.to_string());
    config
}

/// Config that serves `env_name` over TLS with a fresh self-signed
/// certificate for `localhost`, written into `dir`.
pub fn tls_config(env_name: &str, dir: &Path) -> ServiceConfig {
    let rcgen::CertifiedKey { cert, signing_key } =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_path = dir.join("cert.pem");
    let key_path = dir.join("key.pem");
    std::fs::write(&cert_path, cert.pem()).unwrap();
    std::fs::write(&key_path, signing_key.serialize_pem()).unwrap();

    let mut config = ServiceConfig::default();
    config.env.name = Some(env_name.to_string());
    config.listener.tls = Some(TlsConfig {
        cert_path: cert_path.to_string_lossy().into_owned(),
        key_path: key_path.to_string_lossy().into_owned(),
    });
    config
}

/// Prepare and start a replica. Binds 127.0.0.1:0 instead of the configured port.
pub async fn start_server(config: ServiceConfig) -> TestServer {
    let prepared = startup::prepare(config).await.expect("prepare failed");
    let tls = prepared.tls.is_some();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(startup::serve(prepared, listener, shutdown.subscribe()));

    TestServer {
        addr,
        tls,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Client for a TLS replica: trusts the self-signed certificate and
/// resolves `localhost` to the replica's address.
pub fn tls_client(server: &TestServer) -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .danger_accept_invalid_certs(true)
        .resolve("localhost", server.addr)
        .build()
        .unwrap()
}
