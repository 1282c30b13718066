//! Inverted pendulum swing-up with continuous torque.

use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::Rng;

use crate::env::types::{Action, Env, EnvError, Space, Tensor, Transition};

const MAX_SPEED: f32 = 8.0;
const MAX_TORQUE: f32 = 2.0;
const DT: f32 = 0.05;
const G: f32 = 10.0;
const MASS: f32 = 1.0;
const LENGTH: f32 = 1.0;

/// Worst per-step cost: angle pi, full speed and full torque.
const MIN_REWARD: f32 = -(PI * PI + 0.1 * MAX_SPEED * MAX_SPEED + 0.001 * MAX_TORQUE * MAX_TORQUE);

#[derive(Debug, Default)]
pub struct Pendulum {
    theta: f32,
    theta_dot: f32,
}

impl Pendulum {
    pub fn new() -> Self {
        Self::default()
    }

    fn observation(&self) -> Tensor {
        Tensor::vector(vec![self.theta.cos(), self.theta.sin(), self.theta_dot])
    }
}

/// Wrap an angle into `[-pi, pi)`.
fn angle_normalize(x: f32) -> f32 {
    (x + PI).rem_euclid(2.0 * PI) - PI
}

impl Env for Pendulum {
    fn observation_space(&self) -> Space {
        Space::Box {
            low: vec![-1.0, -1.0, -MAX_SPEED],
            high: vec![1.0, 1.0, MAX_SPEED],
            shape: vec![3],
        }
    }

    fn action_space(&self) -> Space {
        Space::uniform(-MAX_TORQUE, MAX_TORQUE, vec![1])
    }

    fn reward_range(&self) -> (f32, f32) {
        (MIN_REWARD, 0.0)
    }

    fn reset(&mut self, rng: &mut StdRng) -> Tensor {
        self.theta = rng.gen_range(-PI..PI);
        self.theta_dot = rng.gen_range(-1.0..1.0);
        self.observation()
    }

    fn step(&mut self, action: &Action, _rng: &mut StdRng) -> Result<Transition, EnvError> {
        let u = match action {
            Action::Continuous(values) => values.first().copied().unwrap_or_default(),
            Action::Discrete(value) => *value as f32,
        }
        .clamp(-MAX_TORQUE, MAX_TORQUE);

        let (th, thdot) = (self.theta, self.theta_dot);
        let cost = angle_normalize(th).powi(2) + 0.1 * thdot * thdot + 0.001 * u * u;

        let new_thdot = thdot
            + (-3.0 * G / (2.0 * LENGTH) * (th + PI).sin() + 3.0 / (MASS * LENGTH * LENGTH) * u) * DT;
        self.theta = th + new_thdot * DT;
        self.theta_dot = new_thdot.clamp(-MAX_SPEED, MAX_SPEED);

        Ok(Transition {
            observation: self.observation(),
            reward: -cost,
            done: false,
            truncated: false,
        })
    }
}
