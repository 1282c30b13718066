//! Environment factory.
//!
//! Maps registered names to constructors and applies the configured wrappers:
//! time limit, then frame resize, then reward clipping.

use crate::config::EnvConfig;
use crate::env::cartpole::CartPole;
use crate::env::catch::Catch;
use crate::env::pendulum::Pendulum;
use crate::env::problem::EnvProblem;
use crate::env::types::{Env, EnvError, EnvResult};
use crate::env::wrappers::{ClipRewards, ResizeFrames, TimeLimit};

/// A registered environment.
struct EnvSpec {
    name: &'static str,
    /// Step limit applied when none is configured.
    max_episode_steps: Option<u64>,
    make: fn() -> Box<dyn Env>,
}

const REGISTRY: &[EnvSpec] = &[
    EnvSpec {
        name: "CartPole-v0",
        max_episode_steps: Some(200),
        make: cartpole,
    },
    EnvSpec {
        name: "CartPole-v1",
        max_episode_steps: Some(500),
        make: cartpole,
    },
    EnvSpec {
        name: "Pendulum-v0",
        max_episode_steps: Some(200),
        make: pendulum,
    },
    EnvSpec {
        name: "Catch-v0",
        max_episode_steps: None,
        make: catch,
    },
];

fn cartpole() -> Box<dyn Env> {
    Box::new(CartPole::new())
}

fn pendulum() -> Box<dyn Env> {
    Box::new(Pendulum::new())
}

fn catch() -> Box<dyn Env> {
    Box::new(Catch::new())
}

/// Names accepted by [`make_env`].
pub fn registered_names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|spec| spec.name)
}

/// Build a batched environment from its configuration.
pub fn make_env(config: &EnvConfig) -> EnvResult<EnvProblem> {
    let name = config.name.as_deref().ok_or(EnvError::MissingName)?;
    let spec = REGISTRY
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| EnvError::UnknownEnv(name.to_string()))?;
    if config.batch_size == 0 {
        return Err(EnvError::ZeroBatchSize);
    }

    let max_timestep = config.max_timestep.or(spec.max_episode_steps);
    let envs = (0..config.batch_size)
        .map(|_| wrap(spec, config, max_timestep))
        .collect::<EnvResult<Vec<_>>>()?;

    tracing::debug!(
        env = name,
        batch_size = config.batch_size,
        max_timestep = ?max_timestep,
        resize = config.resize,
        clip_rewards = config.clip_rewards,
        "Environment constructed"
    );

    EnvProblem::new(name, envs, max_timestep)
}

fn wrap(spec: &EnvSpec, config: &EnvConfig, max_timestep: Option<u64>) -> EnvResult<Box<dyn Env>> {
    let mut env = (spec.make)();
    if let Some(limit) = max_timestep {
        env = Box::new(TimeLimit::new(env, limit));
    }
    if config.resize {
        env = Box::new(ResizeFrames::new(
            env,
            spec.name,
            config.resized_height as usize,
            config.resized_width as usize,
        )?);
    }
    if config.clip_rewards {
        env = Box::new(ClipRewards::new(env));
    }
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::types::{Action, Space};

    fn config(name: &str) -> EnvConfig {
        EnvConfig {
            name: Some(name.to_string()),
            ..EnvConfig::default()
        }
    }

    #[test]
    fn missing_and_unknown_names() {
        assert_eq!(make_env(&EnvConfig::default()).err(), Some(EnvError::MissingName));
        assert_eq!(
            make_env(&config("Breakout-v4")).err(),
            Some(EnvError::UnknownEnv("Breakout-v4".into()))
        );
    }

    #[test]
    fn every_registered_name_builds() {
        for name in registered_names() {
            let problem = make_env(&config(name)).unwrap();
            assert_eq!(problem.name(), name);
            assert_eq!(problem.batch_size(), 1);
        }
    }

    #[test]
    fn registry_limit_used_unless_overridden() {
        assert_eq!(make_env(&config("CartPole-v1")).unwrap().info().max_timestep, Some(500));
        assert_eq!(make_env(&config("Catch-v0")).unwrap().info().max_timestep, None);

        let mut cfg = config("CartPole-v1");
        cfg.max_timestep = Some(25);
        assert_eq!(make_env(&cfg).unwrap().info().max_timestep, Some(25));
    }

    #[test]
    fn explicit_limit_truncates_episodes() {
        let mut cfg = config("Pendulum-v0");
        cfg.max_timestep = Some(2);
        cfg.batch_size = 2;
        let mut problem = make_env(&cfg).unwrap();
        problem.reset(None, Some(0)).unwrap();

        let actions = vec![Action::Continuous(vec![0.0]); 2];
        assert_eq!(problem.step(&actions).unwrap().dones, vec![false, false]);
        assert_eq!(problem.step(&actions).unwrap().truncated, vec![true, true]);
    }

    #[test]
    fn clipped_pendulum_rewards_are_integers() {
        let mut problem = make_env(&config("Pendulum-v0")).unwrap();
        assert_eq!(problem.info().reward_range, (-1.0, 1.0));
        problem.reset(None, Some(5)).unwrap();
        for _ in 0..20 {
            let batch = problem.step(&[Action::Continuous(vec![1.0])]).unwrap();
            assert!(batch.rewards.iter().all(|r| *r == 0.0 || *r == -1.0));
        }
    }

    #[test]
    fn unclipped_rewards_pass_through() {
        let mut cfg = config("Pendulum-v0");
        cfg.clip_rewards = false;
        let problem = make_env(&cfg).unwrap();
        assert!(problem.info().reward_range.0 < -16.0);
    }

    #[test]
    fn resize_applies_to_frames_only() {
        let mut cfg = config("Catch-v0");
        cfg.resize = true;
        let problem = make_env(&cfg).unwrap();
        assert_eq!(problem.info().observation_space.image_shape(), Some((105, 80, 3)));

        let mut cfg = config("CartPole-v0");
        cfg.resize = true;
        assert_eq!(
            make_env(&cfg).err(),
            Some(EnvError::ResizeUnsupported("CartPole-v0".into()))
        );
    }

    #[test]
    fn zero_batch_rejected() {
        let mut cfg = config("CartPole-v0");
        cfg.batch_size = 0;
        assert_eq!(make_env(&cfg).err(), Some(EnvError::ZeroBatchSize));
    }

    #[test]
    fn catch_action_space() {
        let problem = make_env(&config("Catch-v0")).unwrap();
        assert_eq!(problem.info().action_space, Space::Discrete { n: 3 });
    }
}
