//! Core environment types and error definitions.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dense row-major tensor used for observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl Tensor {
    /// A rank-1 tensor holding `data`.
    pub fn vector(data: Vec<f32>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// A zero-filled tensor of the given shape.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            data: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Observation or action space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Space {
    /// Integers in `0..n`.
    Discrete { n: usize },
    /// Real-valued tensor of `shape`. `low` and `high` hold either a single
    /// bound shared by every element or one bound per element.
    Box {
        low: Vec<f32>,
        high: Vec<f32>,
        shape: Vec<usize>,
    },
}

impl Space {
    /// A box whose elements all share the same bounds.
    pub fn uniform(low: f32, high: f32, shape: Vec<usize>) -> Self {
        Space::Box {
            low: vec![low],
            high: vec![high],
            shape,
        }
    }

    /// Shape of image observations (`[height, width, channels]`), if this is one.
    pub fn image_shape(&self) -> Option<(usize, usize, usize)> {
        match self {
            Space::Box { shape, .. } if shape.len() == 3 => Some((shape[0], shape[1], shape[2])),
            _ => None,
        }
    }

    /// Check that `action` is a member of this space.
    pub fn check(&self, action: &Action) -> Result<(), String> {
        match (self, action) {
            (Space::Discrete { n }, Action::Discrete(a)) => {
                if *a >= 0 && (*a as usize) < *n {
                    Ok(())
                } else {
                    Err(format!("action {a} outside 0..{n}"))
                }
            }
            (Space::Box { shape, .. }, Action::Continuous(values)) => {
                let expected: usize = shape.iter().product();
                if values.len() != expected {
                    Err(format!("expected {expected} values, got {}", values.len()))
                } else if values.iter().any(|v| !v.is_finite()) {
                    Err("action values must be finite".to_string())
                } else {
                    Ok(())
                }
            }
            (Space::Discrete { .. }, Action::Continuous(_)) => {
                Err("expected a discrete action".to_string())
            }
            (Space::Box { .. }, Action::Discrete(_)) => {
                Err("expected a continuous action".to_string())
            }
        }
    }
}

/// A single action for one environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Action {
    Discrete(i64),
    Continuous(Vec<f32>),
}

/// Outcome of stepping one environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub observation: Tensor,
    pub reward: f32,
    /// The episode has ended, either naturally or through a time limit.
    pub done: bool,
    /// The episode was cut short by a time limit.
    pub truncated: bool,
}

/// A stateful simulation with step/reset interaction.
pub trait Env: Send {
    fn observation_space(&self) -> Space;

    fn action_space(&self) -> Space;

    /// Inclusive bounds on a single step's reward.
    fn reward_range(&self) -> (f32, f32);

    /// Start a new episode and return its first observation.
    fn reset(&mut self, rng: &mut StdRng) -> Tensor;

    /// Advance by one step. The action has already been checked against
    /// `action_space`.
    fn step(&mut self, action: &Action, rng: &mut StdRng) -> Result<Transition, EnvError>;
}

/// Errors raised while building or driving environments.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    #[error("no environment name given")]
    MissingName,

    #[error("unknown environment {0:?}")]
    UnknownEnv(String),

    #[error("batch size must be at least 1")]
    ZeroBatchSize,

    #[error("environment {0:?} does not produce image frames and cannot be resized")]
    ResizeUnsupported(String),

    #[error("expected {expected} actions, got {actual}")]
    ActionCount { expected: usize, actual: usize },

    #[error("invalid action for env {index}: {reason}")]
    InvalidAction { index: usize, reason: String },

    #[error("env index {index} out of range for batch size {batch_size}")]
    IndexOutOfRange { index: usize, batch_size: usize },

    #[error("env index {0} listed more than once")]
    DuplicateIndex(usize),

    #[error("env {0} has not been reset")]
    NotReset(usize),

    #[error("episode of env {0} is done; reset it before stepping")]
    EpisodeDone(usize),
}

/// Result type for environment operations.
pub type EnvResult<T> = Result<T, EnvError>;
