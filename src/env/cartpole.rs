//! Cart-pole balancing.
//!
//! A pole is attached by an unactuated joint to a cart moving along a
//! frictionless track. Action 0 pushes the cart left, action 1 pushes it right.
//! Every step earns a reward of 1; the episode fails once the pole tilts past
//! 12 degrees or the cart leaves the track.

use rand::rngs::StdRng;
use rand::Rng;

use crate::env::types::{Action, Env, EnvError, Space, Tensor, Transition};

const GRAVITY: f32 = 9.8;
const MASS_CART: f32 = 1.0;
const MASS_POLE: f32 = 0.1;
const TOTAL_MASS: f32 = MASS_CART + MASS_POLE;
/// Half the pole's length.
const LENGTH: f32 = 0.5;
const POLE_MASS_LENGTH: f32 = MASS_POLE * LENGTH;
const FORCE_MAG: f32 = 10.0;
/// Seconds between state updates.
const TAU: f32 = 0.02;
const THETA_THRESHOLD: f32 = 12.0 * 2.0 * std::f32::consts::PI / 360.0;
const X_THRESHOLD: f32 = 2.4;

#[derive(Debug, Default)]
pub struct CartPole {
    /// `[x, x_dot, theta, theta_dot]`
    state: [f32; 4],
}

impl CartPole {
    pub fn new() -> Self {
        Self::default()
    }

    fn observation(&self) -> Tensor {
        Tensor::vector(self.state.to_vec())
    }
}

impl Env for CartPole {
    fn observation_space(&self) -> Space {
        let high = vec![X_THRESHOLD * 2.0, f32::MAX, THETA_THRESHOLD * 2.0, f32::MAX];
        Space::Box {
            low: high.iter().map(|h| -h).collect(),
            high,
            shape: vec![4],
        }
    }

    fn action_space(&self) -> Space {
        Space::Discrete { n: 2 }
    }

    fn reward_range(&self) -> (f32, f32) {
        (0.0, 1.0)
    }

    fn reset(&mut self, rng: &mut StdRng) -> Tensor {
        for value in self.state.iter_mut() {
            *value = rng.gen_range(-0.05..0.05);
        }
        self.observation()
    }

    fn step(&mut self, action: &Action, _rng: &mut StdRng) -> Result<Transition, EnvError> {
        let force = match action {
            Action::Discrete(1) => FORCE_MAG,
            _ => -FORCE_MAG,
        };

        let [x, x_dot, theta, theta_dot] = self.state;
        let (sin_theta, cos_theta) = theta.sin_cos();

        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (LENGTH * (4.0 / 3.0 - MASS_POLE * cos_theta * cos_theta / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        // Explicit Euler integration.
        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];

        let [x, _, theta, _] = self.state;
        let done = !(-X_THRESHOLD..=X_THRESHOLD).contains(&x)
            || !(-THETA_THRESHOLD..=THETA_THRESHOLD).contains(&theta);

        Ok(Transition {
            observation: self.observation(),
            reward: 1.0,
            done,
            truncated: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn reset_is_near_upright() {
        let mut env = CartPole::new();
        let mut rng = StdRng::seed_from_u64(7);
        let obs = env.reset(&mut rng);
        assert_eq!(obs.shape, vec![4]);
        assert!(obs.data.iter().all(|v| v.abs() < 0.05));
    }

    #[test]
    fn constant_push_eventually_fails() {
        let mut env = CartPole::new();
        let mut rng = StdRng::seed_from_u64(0);
        env.reset(&mut rng);

        let mut steps = 0;
        loop {
            let t = env.step(&Action::Discrete(1), &mut rng).unwrap();
            steps += 1;
            assert_eq!(t.reward, 1.0);
            assert!(!t.truncated);
            if t.done {
                break;
            }
            assert!(steps < 200, "pole should fall under constant force");
        }
    }

    #[test]
    fn same_seed_same_trajectory() {
        let run = |seed| {
            let mut env = CartPole::new();
            let mut rng = StdRng::seed_from_u64(seed);
            env.reset(&mut rng);
            (0..10)
                .map(|i| env.step(&Action::Discrete(i % 2), &mut rng).unwrap().observation)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
