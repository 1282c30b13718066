//! Batched environment problem.
//!
//! An `EnvProblem` drives `batch_size` independent copies of one environment.
//! Each slot owns its RNG and tracks whether it needs a reset.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::env::types::{Action, Env, EnvError, EnvResult, Space, Tensor};

/// Lifecycle of one batch slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Never reset since construction.
    Fresh,
    /// Episode in progress.
    Running,
    /// Episode finished; must be reset before stepping.
    Done,
}

struct Slot {
    env: Box<dyn Env>,
    rng: StdRng,
    state: SlotState,
    steps: u64,
    episodes: u64,
    episode_return: f32,
}

/// Static description of the served environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvInfo {
    pub name: String,
    pub batch_size: usize,
    pub observation_space: Space,
    pub action_space: Space,
    pub reward_range: (f32, f32),
    pub max_timestep: Option<u64>,
}

/// Results of stepping every slot once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepBatch {
    pub observations: Vec<Tensor>,
    pub rewards: Vec<f32>,
    pub dones: Vec<bool>,
    pub truncated: Vec<bool>,
}

pub struct EnvProblem {
    name: String,
    max_timestep: Option<u64>,
    slots: Vec<Slot>,
}

impl EnvProblem {
    /// Build a problem from already-wrapped environments, one per slot.
    pub fn new(name: impl Into<String>, envs: Vec<Box<dyn Env>>, max_timestep: Option<u64>) -> EnvResult<Self> {
        if envs.is_empty() {
            return Err(EnvError::ZeroBatchSize);
        }
        let slots = envs
            .into_iter()
            .map(|env| Slot {
                env,
                rng: StdRng::from_entropy(),
                state: SlotState::Fresh,
                steps: 0,
                episodes: 0,
                episode_return: 0.0,
            })
            .collect();
        Ok(Self {
            name: name.into(),
            max_timestep,
            slots,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn batch_size(&self) -> usize {
        self.slots.len()
    }

    pub fn slot_state(&self, index: usize) -> Option<SlotState> {
        self.slots.get(index).map(|s| s.state)
    }

    /// Completed and in-progress episodes of a slot.
    pub fn episodes(&self, index: usize) -> Option<u64> {
        self.slots.get(index).map(|s| s.episodes)
    }

    pub fn info(&self) -> EnvInfo {
        let env = &self.slots[0].env;
        EnvInfo {
            name: self.name.clone(),
            batch_size: self.batch_size(),
            observation_space: env.observation_space(),
            action_space: env.action_space(),
            reward_range: env.reward_range(),
            max_timestep: self.max_timestep,
        }
    }

    /// Reset the given slots, or all of them when `indices` is `None`.
    ///
    /// With a seed, slot `i` is reseeded with `seed + i` so that every slot
    /// gets a distinct but reproducible stream.
    pub fn reset(&mut self, indices: Option<&[usize]>, seed: Option<u64>) -> EnvResult<Vec<Tensor>> {
        let batch_size = self.batch_size();
        let indices: Vec<usize> = match indices {
            Some(indices) => indices.to_vec(),
            None => (0..batch_size).collect(),
        };
        if let Some(&index) = indices.iter().find(|&&i| i >= batch_size) {
            return Err(EnvError::IndexOutOfRange { index, batch_size });
        }
        let mut seen = vec![false; batch_size];
        for &index in &indices {
            if std::mem::replace(&mut seen[index], true) {
                return Err(EnvError::DuplicateIndex(index));
            }
        }

        let observations = indices
            .into_iter()
            .map(|index| {
                let slot = &mut self.slots[index];
                if let Some(seed) = seed {
                    slot.rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
                }
                slot.state = SlotState::Running;
                slot.steps = 0;
                slot.episodes += 1;
                slot.episode_return = 0.0;
                slot.env.reset(&mut slot.rng)
            })
            .collect();
        Ok(observations)
    }

    /// Step every slot with its action. Nothing is stepped if any slot or
    /// action is invalid.
    pub fn step(&mut self, actions: &[Action]) -> EnvResult<StepBatch> {
        if actions.len() != self.batch_size() {
            return Err(EnvError::ActionCount {
                expected: self.batch_size(),
                actual: actions.len(),
            });
        }
        for (index, (slot, action)) in self.slots.iter().zip(actions).enumerate() {
            match slot.state {
                SlotState::Fresh => return Err(EnvError::NotReset(index)),
                SlotState::Done => return Err(EnvError::EpisodeDone(index)),
                SlotState::Running => {}
            }
            slot.env
                .action_space()
                .check(action)
                .map_err(|reason| EnvError::InvalidAction { index, reason })?;
        }

        let mut batch = StepBatch {
            observations: Vec::with_capacity(actions.len()),
            rewards: Vec::with_capacity(actions.len()),
            dones: Vec::with_capacity(actions.len()),
            truncated: Vec::with_capacity(actions.len()),
        };
        for (index, (slot, action)) in self.slots.iter_mut().zip(actions).enumerate() {
            let transition = slot.env.step(action, &mut slot.rng)?;
            slot.steps += 1;
            slot.episode_return += transition.reward;
            if transition.done {
                slot.state = SlotState::Done;
                tracing::debug!(
                    env = %self.name,
                    index,
                    steps = slot.steps,
                    episode_return = slot.episode_return,
                    truncated = transition.truncated,
                    "Episode finished"
                );
            }
            batch.observations.push(transition.observation);
            batch.rewards.push(transition.reward);
            batch.dones.push(transition.done);
            batch.truncated.push(transition.truncated);
        }
        Ok(batch)
    }
}
