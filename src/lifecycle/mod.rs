//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Construct environment → Load TLS → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: environment first, listener last
//! - The server runs until cancelled; there is no idle sleep loop

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
