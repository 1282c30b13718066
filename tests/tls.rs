//! The env service over its secure port.

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn serves_rpcs_over_tls() {
    let dir = tempfile::tempdir().unwrap();
    let server = common::start_server(common::tls_config("CartPole-v0", dir.path())).await;
    assert!(server.tls);

    {
        let client = common::tls_client(&server);
        let res = client.get(server.url("/healthz")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let health: Value = res.json().await.unwrap();
        assert_eq!(health["status"], "serving");

        let res = client
            .post(server.url("/env.EnvService/Reset"))
            .json(&json!({ "seed": 3 }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let reset: Value = res.json().await.unwrap();
        assert_eq!(reset["observations"].as_array().unwrap().len(), 1);
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn plaintext_is_refused_on_secure_port() {
    let dir = tempfile::tempdir().unwrap();
    let server = common::start_server(common::tls_config("CartPole-v0", dir.path())).await;

    let plain = format!("http://{}/healthz", server.addr);
    assert!(common::client().get(plain).send().await.is_err());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn tls_server_drains_on_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let server = common::start_server(common::tls_config("Catch-v0", dir.path())).await;

    let client = common::tls_client(&server);
    let res = client.get(server.url("/healthz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    drop(client);

    // `stop` fails if the server has not finished within its deadline.
    server.stop().await.unwrap();
}
