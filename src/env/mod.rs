//! Environment subsystem.
//!
//! # Data Flow
//! ```text
//! EnvConfig (name, batch size, wrapper options)
//!     → registry.rs (look up constructor, apply wrappers)
//!     → wrappers.rs (TimeLimit → ResizeFrames → ClipRewards)
//!     → problem.rs (batch of envs, per-slot RNG and episode state)
//!     → served by the service layer
//! ```
//!
//! # Design Decisions
//! - Environments are synchronous; the service layer serializes access
//! - A finished slot must be reset explicitly, there is no auto-reset
//! - Invalid batches are rejected before any slot advances

pub mod cartpole;
pub mod catch;
pub mod pendulum;
pub mod problem;
pub mod registry;
pub mod types;
pub mod wrappers;

pub use problem::{EnvInfo, EnvProblem, SlotState, StepBatch};
pub use registry::{make_env, registered_names};
pub use types::{Action, Env, EnvError, EnvResult, Space, Tensor, Transition};
