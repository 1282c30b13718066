//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceConfig.bind_address()
//!     → listener.rs (parse & bind)
//!     → tls.rs (PEM checks, rustls config)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - TLS is the default; plaintext requires an explicit opt-in
//! - Certificate problems surface before the port is opened

pub mod listener;
pub mod tls;
