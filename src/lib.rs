//! Snowball Run - an endless side-scroller with a charge-to-jump snowball
//!
//! Core modules:
//! - `sim`: Simulation (entity state, physics, spawning, collisions)
//! - `session`: Start/running/ended state machine and leaderboard reporting
//! - `driver`: Frame clock and tick sources feeding the session
//! - `renderer`: Scene building and the WebGPU SDF pipeline
//! - `highscores`: Top-10 leaderboard and its storage
//! - `tuning`: Data-driven game balance

pub mod driver;
pub mod highscores;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::{Leaderboard, LeaderboardStore, MemoryStore};
pub use session::{FrameOutcome, Session, SessionPhase};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal animation frame (60 Hz display refresh)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Any frame delta above this is treated as a single nominal frame
    pub const MAX_FRAME_DELTA: f32 = 1.0;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT_TALL: f32 = 600.0;
    /// Height of the drawn ground band (visual only)
    pub const GROUND_BAND: f32 = 50.0;

    /// Ball spawn point and size
    pub const BALL_START_X: f32 = 100.0;
    pub const BALL_START_Y: f32 = 350.0;
    pub const BALL_RADIUS: f32 = 20.0;

    /// Gravity, added to vertical velocity every tick
    pub const GRAVITY: f32 = 0.5;
    /// Jump velocity with no charge
    pub const BASE_JUMP_FORCE: f32 = -12.0;
    /// Jump velocity with a full charge
    pub const MAX_JUMP_FORCE: f32 = -20.0;
    /// Charge window in milliseconds
    pub const MAX_CHARGE_MS: f32 = 500.0;
    /// Horizontal velocity decay per tick
    pub const HORIZONTAL_DAMPING: f32 = 0.95;

    /// Scroll speed at session start (pixels per tick)
    pub const BASE_SPEED: f32 = 4.0;
    /// Scroll speed gained per elapsed second
    pub const SPEED_RAMP: f32 = 0.02;
    /// Score gained per tick per unit of speed
    pub const SCORE_RATE: f32 = 0.1;

    /// Opening window for the first obstacle (score range, inclusive)
    pub const OPENING_SCORE_MIN: f32 = 50.0;
    pub const OPENING_SCORE_MAX: f32 = 80.0;
    /// Per-tick chance of the opening obstacle while inside the window
    pub const OPENING_SPAWN_CHANCE: f32 = 0.1;
    /// Minimum seconds between steady-state spawns
    pub const SPAWN_GAP: f32 = 2.0;
    /// Obstacle sizes
    pub const OBSTACLE_MIN_SIZE: f32 = 20.0;
    pub const OPENING_MAX_SIZE: f32 = 40.0;
    /// Size ceiling growth per elapsed second, and its cap
    pub const SIZE_GROWTH: f32 = 5.0;
    pub const OBSTACLE_MAX_SIZE: f32 = 80.0;

    /// Leaderboard capacity
    pub const MAX_HIGH_SCORES: usize = 10;
}
