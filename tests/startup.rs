//! Startup ordering and configuration plumbing.

use std::path::PathBuf;

use env_service::config::Cli;
use env_service::env::EnvError;
use env_service::lifecycle::startup::{self, StartupError};
use env_service::EnvServer;

use clap::Parser;

mod common;

#[tokio::test]
async fn unknown_env_never_binds() {
    let mut config = common::config("Atlantis-v9");
    config.listener.port = 0;
    let err = startup::prepare(config).await.err().expect("prepare should fail");
    assert!(matches!(err, StartupError::Env(EnvError::UnknownEnv(name)) if name == "Atlantis-v9"));
}

#[tokio::test]
async fn resize_of_vector_env_fails_at_construction() {
    let mut config = common::config("CartPole-v0");
    config.env.resize = true;
    let err = startup::prepare(config).await.err().expect("prepare should fail");
    assert!(matches!(err, StartupError::Env(EnvError::ResizeUnsupported(_))));
}

#[tokio::test]
async fn output_dir_is_namespaced_by_replica() {
    let cli = Cli::try_parse_from([
        "env-service",
        "--insecure",
        "--env-problem-name",
        "CartPole-v1",
        "--output-dir",
        "/tmp/experiments",
        "--replica",
        "12",
    ])
    .unwrap();
    let prepared = startup::prepare(cli.into_config().unwrap()).await.unwrap();
    assert_eq!(prepared.output_dir, PathBuf::from("/tmp/experiments/12"));
}

#[tokio::test]
async fn explicit_port_is_bound_verbatim() {
    // Reserve a free port, release it, then ask the replica to bind exactly that one.
    let port = {
        let probe = std::net::TcpListener::bind("[::]:0")
            .or_else(|_| std::net::TcpListener::bind("0.0.0.0:0"))
            .unwrap();
        probe.local_addr().unwrap().port()
    };

    let mut config = common::config("CartPole-v0");
    config.listener.port = port;
    assert_eq!(config.bind_address(), format!("[::]:{}", port));

    let prepared = startup::prepare(config).await.unwrap();
    match startup::bind(&prepared).await {
        Ok(listener) => assert_eq!(listener.local_addr().unwrap().port(), port),
        // Hosts without IPv6 cannot bind [::]; the address itself is still checked above.
        Err(StartupError::Listener(_)) => {}
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[tokio::test]
async fn concurrency_is_always_one() {
    for batch_size in [1, 8] {
        let mut config = common::config("Pendulum-v0");
        config.env.batch_size = batch_size;
        config.runtime.use_tpu = true;
        let prepared = startup::prepare(config.clone()).await.unwrap();
        let server = EnvServer::new(&config, prepared.servicer);
        assert_eq!(server.max_concurrency(), 1);
        assert!(!server.is_tls());
    }
}
