//! Pixel-based catch game.
//!
//! The screen is a 10x8 grid of 21x20 pixel cells, giving 210x160 RGB frames.
//! A ball drops one row per step from a random column; the paddle on the
//! bottom row moves left (0), stays (1) or moves right (2). Reaching the paddle
//! row ends the episode with +1 for a catch and -1 for a miss.

use rand::rngs::StdRng;
use rand::Rng;

use crate::env::types::{Action, Env, EnvError, Space, Tensor, Transition};

const ROWS: usize = 10;
const COLS: usize = 8;
const CELL_HEIGHT: usize = 21;
const CELL_WIDTH: usize = 20;
pub const FRAME_HEIGHT: usize = ROWS * CELL_HEIGHT;
pub const FRAME_WIDTH: usize = COLS * CELL_WIDTH;
const CHANNELS: usize = 3;

const BALL_COLOR: [f32; 3] = [255.0, 255.0, 255.0];
const PADDLE_COLOR: [f32; 3] = [92.0, 186.0, 92.0];

#[derive(Debug)]
pub struct Catch {
    ball_row: usize,
    ball_col: usize,
    paddle_col: usize,
}

impl Catch {
    pub fn new() -> Self {
        Self {
            ball_row: 0,
            ball_col: 0,
            paddle_col: COLS / 2,
        }
    }

    fn render(&self) -> Tensor {
        let mut frame = Tensor::zeros(vec![FRAME_HEIGHT, FRAME_WIDTH, CHANNELS]);
        paint_cell(&mut frame.data, self.ball_row, self.ball_col, BALL_COLOR);
        paint_cell(&mut frame.data, ROWS - 1, self.paddle_col, PADDLE_COLOR);
        frame
    }
}

impl Default for Catch {
    fn default() -> Self {
        Self::new()
    }
}

fn paint_cell(data: &mut [f32], row: usize, col: usize, color: [f32; 3]) {
    for y in row * CELL_HEIGHT..(row + 1) * CELL_HEIGHT {
        for x in col * CELL_WIDTH..(col + 1) * CELL_WIDTH {
            let offset = (y * FRAME_WIDTH + x) * CHANNELS;
            data[offset..offset + CHANNELS].copy_from_slice(&color);
        }
    }
}

impl Env for Catch {
    fn observation_space(&self) -> Space {
        Space::uniform(0.0, 255.0, vec![FRAME_HEIGHT, FRAME_WIDTH, CHANNELS])
    }

    fn action_space(&self) -> Space {
        Space::Discrete { n: 3 }
    }

    fn reward_range(&self) -> (f32, f32) {
        (-1.0, 1.0)
    }

    fn reset(&mut self, rng: &mut StdRng) -> Tensor {
        self.ball_row = 0;
        self.ball_col = rng.gen_range(0..COLS);
        self.paddle_col = COLS / 2;
        self.render()
    }

    fn step(&mut self, action: &Action, _rng: &mut StdRng) -> Result<Transition, EnvError> {
        match action {
            Action::Discrete(0) => self.paddle_col = self.paddle_col.saturating_sub(1),
            Action::Discrete(2) => self.paddle_col = (self.paddle_col + 1).min(COLS - 1),
            _ => {}
        }
        self.ball_row += 1;

        let done = self.ball_row == ROWS - 1;
        let reward = match (done, self.ball_col == self.paddle_col) {
            (false, _) => 0.0,
            (true, true) => 1.0,
            (true, false) => -1.0,
        };

        Ok(Transition {
            observation: self.render(),
            reward,
            done,
            truncated: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn pixel(frame: &Tensor, y: usize, x: usize) -> &[f32] {
        let offset = (y * FRAME_WIDTH + x) * CHANNELS;
        &frame.data[offset..offset + CHANNELS]
    }

    #[test]
    fn frame_shape_and_paddle() {
        let mut env = Catch::new();
        let mut rng = StdRng::seed_from_u64(1);
        let frame = env.reset(&mut rng);
        assert_eq!(frame.shape, vec![210, 160, 3]);
        assert_eq!(frame.len(), 210 * 160 * 3);
        assert_eq!(pixel(&frame, FRAME_HEIGHT - 1, (COLS / 2) * CELL_WIDTH), &PADDLE_COLOR);
        assert_eq!(pixel(&frame, 0, env.ball_col * CELL_WIDTH), &BALL_COLOR);
    }

    #[test]
    fn tracking_the_ball_catches_it() {
        let mut env = Catch::new();
        let mut rng = StdRng::seed_from_u64(11);
        env.reset(&mut rng);

        let mut total = 0.0;
        for step in 0..ROWS - 1 {
            let action = match env.ball_col.cmp(&env.paddle_col) {
                std::cmp::Ordering::Less => 0,
                std::cmp::Ordering::Equal => 1,
                std::cmp::Ordering::Greater => 2,
            };
            let t = env.step(&Action::Discrete(action), &mut rng).unwrap();
            total += t.reward;
            assert_eq!(t.done, step == ROWS - 2);
        }
        assert_eq!(total, 1.0);
    }

    #[test]
    fn running_away_misses() {
        let mut env = Catch::new();
        let mut rng = StdRng::seed_from_u64(5);
        env.reset(&mut rng);
        env.ball_col = COLS - 1;

        let mut last = None;
        for _ in 0..ROWS - 1 {
            last = Some(env.step(&Action::Discrete(0), &mut rng).unwrap());
        }
        let last = last.unwrap();
        assert!(last.done);
        assert_eq!(last.reward, -1.0);
    }
}
