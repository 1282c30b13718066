//! Request and response messages of the env service.

use serde::{Deserialize, Serialize};

use crate::env::{Action, Tensor};

pub use crate::env::EnvInfo as EnvInfoResponse;
pub use crate::env::StepBatch as StepResponse;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetRequest {
    /// Slots to reset; all of them when absent.
    #[serde(default)]
    pub indices: Option<Vec<usize>>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetResponse {
    pub observations: Vec<Tensor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRequest {
    /// One action per batch slot.
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseResponse {
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub env: String,
    pub replica: u32,
}
