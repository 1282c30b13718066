//! Env service: exposes one batched environment over JSON RPC.
//!
//! # Methods
//! ```text
//! POST /env.EnvService/GetEnvInfo   {}                      → EnvInfo
//! POST /env.EnvService/Reset        {indices?, seed?}       → {observations}
//! POST /env.EnvService/Step         {actions}               → {observations, rewards, dones, truncated}
//! POST /env.EnvService/Close        {}                      → {closed}
//! GET  /healthz                                             → {status, env, replica}
//! ```

pub mod error;
pub mod handlers;
pub mod messages;
pub mod servicer;

use axum::{
    routing::{get, post},
    Router,
};

pub use error::ServiceError;
pub use servicer::{EnvServicer, MAX_CONCURRENCY};

use self::handlers::*;

pub fn setup_service_router(servicer: EnvServicer) -> Router {
    Router::new()
        .route("/env.EnvService/GetEnvInfo", post(get_env_info))
        .route("/env.EnvService/Reset", post(reset))
        .route("/env.EnvService/Step", post(step))
        .route("/env.EnvService/Close", post(close))
        .route("/healthz", get(healthz))
        .with_state(servicer)
}
