//! Session state and core simulation types
//!
//! Everything scoped to a single run lives in `SessionState`. A restart
//! builds a fresh one, so no field can survive a reset by accident.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Jump state of the ball, derived from its ground contact and charge flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpState {
    /// Resting on the floor, ready to charge
    Grounded,
    /// Jump button held, accumulating charge
    Charging,
    /// In the air (or still falling from the spawn point)
    Airborne,
}

/// The player's snowball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Center position
    pub pos: Vec2,
    /// Velocity in pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Accumulated jump charge (ms)
    pub charge_ms: f32,
    /// Jump button is held
    pub charging: bool,
    /// Resting on the floor; set only by the ground clamp
    #[serde(default)]
    pub grounded: bool,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: Vec2::new(BALL_START_X, BALL_START_Y),
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            charge_ms: 0.0,
            charging: false,
            grounded: false,
        }
    }
}

impl Ball {
    pub fn jump_state(&self) -> JumpState {
        if self.charging {
            JumpState::Charging
        } else if self.grounded {
            JumpState::Grounded
        } else {
            JumpState::Airborne
        }
    }

    /// Start charging a jump. Only accepted while resting on the floor.
    ///
    /// Returns whether the press was accepted.
    pub fn press_jump(&mut self) -> bool {
        if self.jump_state() != JumpState::Grounded {
            return false;
        }
        self.charging = true;
        self.charge_ms = 0.0;
        true
    }

    /// Release a charging jump, launching the ball.
    ///
    /// Returns the charge fraction used, or `None` if nothing was charging.
    pub fn release_jump(&mut self, tuning: &Tuning) -> Option<f32> {
        if !self.charging {
            return None;
        }
        let fraction = self.charge_fraction(tuning);
        self.vel.y = tuning.base_jump_force
            + (tuning.max_jump_force - tuning.base_jump_force) * fraction;
        self.vel.x += tuning.horizontal_boost * fraction;
        self.charging = false;
        self.grounded = false;
        Some(fraction)
    }

    /// Charge as a fraction of the full charge window, in [0, 1]
    pub fn charge_fraction(&self, tuning: &Tuning) -> f32 {
        if tuning.max_charge_ms <= 0.0 {
            return 1.0;
        }
        (self.charge_ms / tuning.max_charge_ms).clamp(0.0, 1.0)
    }

    /// Bounding square (min, max) used for collisions
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let r = Vec2::splat(self.radius);
        (self.pos - r, self.pos + r)
    }
}

/// A ground obstacle scrolling toward the ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    /// Square obstacle entering at the right edge, resting on the floor
    pub fn at_right_edge(size: f32, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.width(), tuning.floor() - size),
            size: Vec2::splat(size),
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Spawner phase for the current run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnPhase {
    /// Waiting for the one-shot opening obstacle
    Opening,
    /// Regular spawns, gap measured from the last one
    Steady { last_spawn: f32 },
}

/// Events emitted by a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// An obstacle entered the playfield
    Spawned { size: f32 },
    /// The ball left the floor
    Jumped { fraction: f32 },
    /// The ball hit an obstacle; the run is over
    Crashed,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Seed the spawn RNG was built from
    pub seed: u64,
    pub ball: Ball,
    /// Active obstacles (order irrelevant)
    pub obstacles: Vec<Obstacle>,
    /// Scroll speed (pixels per tick)
    pub speed: f32,
    /// Seconds since the run started
    pub elapsed: f32,
    /// Continuous score; floored for display and the leaderboard
    pub score: f32,
    pub spawn_phase: SpawnPhase,
    /// Simulation tick counter
    pub ticks: u64,
    /// Set when the ball hits an obstacle; the state is frozen from then on
    pub crashed: bool,
    pub(crate) rng: Pcg32,
}

impl SessionState {
    /// Fresh state for a new run
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            ball: Ball::default(),
            obstacles: Vec::new(),
            speed: tuning.base_speed,
            elapsed: 0.0,
            score: 0.0,
            spawn_phase: SpawnPhase::Opening,
            ticks: 0,
            crashed: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Integer score reported to the player and the leaderboard
    pub fn final_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_values() {
        let tuning = Tuning::default();
        let state = SessionState::new(7, &tuning);
        assert_eq!(state.ball.pos, Vec2::new(100.0, 350.0));
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert_eq!(state.ball.charge_ms, 0.0);
        assert!(!state.ball.charging);
        // Spawns mid-air
        assert_eq!(state.ball.jump_state(), JumpState::Airborne);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.speed, 4.0);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.spawn_phase, SpawnPhase::Opening);
    }

    fn landed_ball() -> Ball {
        Ball {
            pos: Vec2::new(BALL_START_X, 380.0),
            grounded: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_full_charge_jump() {
        let tuning = Tuning::default();
        let mut ball = landed_ball();
        assert!(ball.press_jump());
        ball.charge_ms = 500.0;
        assert_eq!(ball.release_jump(&tuning), Some(1.0));
        assert_eq!(ball.vel.y, -20.0);
        assert_eq!(ball.jump_state(), JumpState::Airborne);
    }

    #[test]
    fn test_tap_jump() {
        let tuning = Tuning::default();
        let mut ball = landed_ball();
        ball.press_jump();
        assert_eq!(ball.release_jump(&tuning), Some(0.0));
        assert_eq!(ball.vel.y, -12.0);
        assert!(!ball.grounded);
    }

    #[test]
    fn test_press_ignored_while_airborne_or_charging() {
        let tuning = Tuning::default();
        let mut ball = landed_ball();
        ball.grounded = false;
        ball.vel.y = 3.0;
        assert!(!ball.press_jump());
        assert_eq!(ball.release_jump(&tuning), None);

        // Zero vertical velocity alone is not ground contact
        ball.vel.y = 0.0;
        assert!(!ball.press_jump());

        ball.grounded = true;
        assert!(ball.press_jump());
        ball.charge_ms = 200.0;
        assert!(!ball.press_jump());
        assert_eq!(ball.charge_ms, 200.0);
    }

    #[test]
    fn test_horizontal_boost() {
        let tuning = Tuning {
            horizontal_boost: 6.0,
            ..Default::default()
        };
        let mut ball = landed_ball();
        ball.press_jump();
        ball.charge_ms = 250.0;
        ball.release_jump(&tuning);
        assert_eq!(ball.vel.x, 3.0);
        assert_eq!(ball.vel.y, -16.0);
    }

    #[test]
    fn test_final_score_floors() {
        let mut state = SessionState::new(1, &Tuning::default());
        state.score = 123.97;
        assert_eq!(state.final_score(), 123);
    }
}
