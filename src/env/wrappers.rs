//! Environment wrappers.
//!
//! Each wrapper owns a boxed inner environment and changes one aspect of it:
//! episode length, reward scale, or observation size.

use rand::rngs::StdRng;

use crate::env::types::{Action, Env, EnvError, Space, Tensor, Transition};

/// Ends episodes after a fixed number of steps.
pub struct TimeLimit {
    inner: Box<dyn Env>,
    max_steps: u64,
    elapsed: u64,
}

impl TimeLimit {
    pub fn new(inner: Box<dyn Env>, max_steps: u64) -> Self {
        Self {
            inner,
            max_steps,
            elapsed: 0,
        }
    }
}

impl Env for TimeLimit {
    fn observation_space(&self) -> Space {
        self.inner.observation_space()
    }

    fn action_space(&self) -> Space {
        self.inner.action_space()
    }

    fn reward_range(&self) -> (f32, f32) {
        self.inner.reward_range()
    }

    fn reset(&mut self, rng: &mut StdRng) -> Tensor {
        self.elapsed = 0;
        self.inner.reset(rng)
    }

    fn step(&mut self, action: &Action, rng: &mut StdRng) -> Result<Transition, EnvError> {
        let mut transition = self.inner.step(action, rng)?;
        self.elapsed += 1;
        if self.elapsed >= self.max_steps && !transition.done {
            transition.done = true;
            transition.truncated = true;
        }
        Ok(transition)
    }
}

/// Clips rewards into `[-1, 1]` and rounds them to the nearest integer.
pub struct ClipRewards {
    inner: Box<dyn Env>,
}

impl ClipRewards {
    pub fn new(inner: Box<dyn Env>) -> Self {
        Self { inner }
    }
}

/// Ties round to even, so 0.5 becomes 0 and -1.5 clips to -1 first.
pub fn clip_reward(reward: f32) -> f32 {
    reward.clamp(-1.0, 1.0).round_ties_even()
}

impl Env for ClipRewards {
    fn observation_space(&self) -> Space {
        self.inner.observation_space()
    }

    fn action_space(&self) -> Space {
        self.inner.action_space()
    }

    fn reward_range(&self) -> (f32, f32) {
        (-1.0, 1.0)
    }

    fn reset(&mut self, rng: &mut StdRng) -> Tensor {
        self.inner.reset(rng)
    }

    fn step(&mut self, action: &Action, rng: &mut StdRng) -> Result<Transition, EnvError> {
        let mut transition = self.inner.step(action, rng)?;
        transition.reward = clip_reward(transition.reward);
        Ok(transition)
    }
}

/// Nearest-neighbour resize of `HxWxC` image observations.
pub struct ResizeFrames {
    inner: Box<dyn Env>,
    height: usize,
    width: usize,
}

impl ResizeFrames {
    /// Fails when the inner environment does not produce rank-3 frames.
    pub fn new(inner: Box<dyn Env>, name: &str, height: usize, width: usize) -> Result<Self, EnvError> {
        if inner.observation_space().image_shape().is_none() {
            return Err(EnvError::ResizeUnsupported(name.to_string()));
        }
        Ok(Self { inner, height, width })
    }

    fn resize(&self, frame: Tensor) -> Tensor {
        resize_nearest(&frame, self.height, self.width)
    }
}

/// Resize an `HxWxC` tensor to `height x width x C`.
pub fn resize_nearest(frame: &Tensor, height: usize, width: usize) -> Tensor {
    let (src_h, src_w, channels) = (frame.shape[0], frame.shape[1], frame.shape[2]);
    let mut out = Tensor::zeros(vec![height, width, channels]);

    for y in 0..height {
        let sy = y * src_h / height;
        for x in 0..width {
            let sx = x * src_w / width;
            let src = (sy * src_w + sx) * channels;
            let dst = (y * width + x) * channels;
            out.data[dst..dst + channels].copy_from_slice(&frame.data[src..src + channels]);
        }
    }
    out
}

impl Env for ResizeFrames {
    fn observation_space(&self) -> Space {
        match self.inner.observation_space() {
            Space::Box { low, high, shape } => {
                let channels = shape[2];
                // Per-element bounds no longer line up after resizing; keep the first.
                Space::Box {
                    low: low.into_iter().take(1).collect(),
                    high: high.into_iter().take(1).collect(),
                    shape: vec![self.height, self.width, channels],
                }
            }
            other => other,
        }
    }

    fn action_space(&self) -> Space {
        self.inner.action_space()
    }

    fn reward_range(&self) -> (f32, f32) {
        self.inner.reward_range()
    }

    fn reset(&mut self, rng: &mut StdRng) -> Tensor {
        let frame = self.inner.reset(rng);
        self.resize(frame)
    }

    fn step(&mut self, action: &Action, rng: &mut StdRng) -> Result<Transition, EnvError> {
        let mut transition = self.inner.step(action, rng)?;
        transition.observation = self.resize(transition.observation);
        Ok(transition)
    }
}
