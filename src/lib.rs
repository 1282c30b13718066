//! Remote reinforcement-learning environment service library.

pub mod config;
pub mod env;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod service;

pub use config::schema::ServiceConfig;
pub use env::{make_env, EnvProblem};
pub use http::EnvServer;
pub use lifecycle::Shutdown;
pub use service::EnvServicer;
