//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here, so a variant can
//! be expressed as a JSON override instead of a code change.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Playfield size variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Playfield {
    /// 800x400
    #[default]
    Wide,
    /// 800x600
    Tall,
}

impl Playfield {
    pub fn size(&self) -> (f32, f32) {
        match self {
            Playfield::Wide => (PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
            Playfield::Tall => (PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT_TALL),
        }
    }
}

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield: Playfield,

    // === Physics (per tick) ===
    pub gravity: f32,
    pub base_jump_force: f32,
    pub max_jump_force: f32,
    pub max_charge_ms: f32,
    pub horizontal_damping: f32,
    /// Horizontal velocity imparted by a full charge (0 disables it)
    pub horizontal_boost: f32,

    // === Speed & score ===
    pub base_speed: f32,
    pub speed_ramp: f32,
    pub score_rate: f32,

    // === Spawning ===
    pub opening_score_min: f32,
    pub opening_score_max: f32,
    pub opening_spawn_chance: f32,
    pub spawn_gap: f32,
    pub obstacle_min_size: f32,
    pub opening_max_size: f32,
    pub size_growth: f32,
    pub obstacle_max_size: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield: Playfield::Wide,

            gravity: GRAVITY,
            base_jump_force: BASE_JUMP_FORCE,
            max_jump_force: MAX_JUMP_FORCE,
            max_charge_ms: MAX_CHARGE_MS,
            horizontal_damping: HORIZONTAL_DAMPING,
            horizontal_boost: 0.0,

            base_speed: BASE_SPEED,
            speed_ramp: SPEED_RAMP,
            score_rate: SCORE_RATE,

            opening_score_min: OPENING_SCORE_MIN,
            opening_score_max: OPENING_SCORE_MAX,
            opening_spawn_chance: OPENING_SPAWN_CHANCE,
            spawn_gap: SPAWN_GAP,
            obstacle_min_size: OBSTACLE_MIN_SIZE,
            opening_max_size: OPENING_MAX_SIZE,
            size_growth: SIZE_GROWTH,
            obstacle_max_size: OBSTACLE_MAX_SIZE,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults.
    ///
    /// Inconsistent ranges are repaired rather than rejected, see `normalized`.
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Self>(json) {
            Ok(tuning) => Some(tuning.normalized()),
            Err(e) => {
                log::warn!("Ignoring malformed tuning override: {}", e);
                None
            }
        }
    }

    /// Repair values the simulation cannot run with.
    ///
    /// Size bounds never sit below `obstacle_min_size`, the opening window is
    /// never inverted, and gaps and charge windows stay non-negative.
    pub fn normalized(mut self) -> Self {
        if self.obstacle_min_size <= 0.0 {
            log::warn!("Tuning: obstacle_min_size {} reset to default", self.obstacle_min_size);
            self.obstacle_min_size = OBSTACLE_MIN_SIZE;
        }
        if self.opening_max_size < self.obstacle_min_size {
            log::warn!(
                "Tuning: opening_max_size {} raised to obstacle_min_size {}",
                self.opening_max_size,
                self.obstacle_min_size
            );
            self.opening_max_size = self.obstacle_min_size;
        }
        if self.obstacle_max_size < self.opening_max_size {
            log::warn!(
                "Tuning: obstacle_max_size {} raised to opening_max_size {}",
                self.obstacle_max_size,
                self.opening_max_size
            );
            self.obstacle_max_size = self.opening_max_size;
        }
        if self.opening_score_max < self.opening_score_min {
            log::warn!(
                "Tuning: opening window [{}, {}] is inverted, collapsing it",
                self.opening_score_min,
                self.opening_score_max
            );
            self.opening_score_max = self.opening_score_min;
        }
        if self.spawn_gap <= 0.0 {
            log::warn!("Tuning: spawn_gap {} reset to default", self.spawn_gap);
            self.spawn_gap = SPAWN_GAP;
        }
        if self.max_charge_ms < 0.0 {
            self.max_charge_ms = 0.0;
        }
        self
    }

    pub fn width(&self) -> f32 {
        self.playfield.size().0
    }

    /// Floor height; the playfield bottom edge
    pub fn floor(&self) -> f32 {
        self.playfield.size().1
    }

    /// Scroll speed after `elapsed` seconds
    pub fn speed_at(&self, elapsed: f32) -> f32 {
        self.base_speed + elapsed * self.speed_ramp
    }

    /// Largest steady-state obstacle after `elapsed` seconds
    pub fn size_ceiling(&self, elapsed: f32) -> f32 {
        (self.opening_max_size + elapsed * self.size_growth).min(self.obstacle_max_size)
    }
}
