//! Draw command list built from session state
//!
//! The scene is plain data: the GPU pipeline consumes it, and nothing in the
//! simulation reads it back.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{FRAME_DT, GROUND_BAND};
use crate::sim::SessionState;
use crate::tuning::Tuning;

/// RGBA color, 0-1 channels
pub type Color = [f32; 4];

/// Convert 0xRRGGBB to a color
pub const fn hex(rgb: u32) -> Color {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        1.0,
    ]
}

pub const SKY: Color = hex(0xffffff);
pub const GROUND: Color = hex(0xb0bec5);
pub const SNOWBALL: Color = hex(0xe0f7fa);
pub const OBSTACLE: Color = hex(0x616161);

/// A single draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    FillRect { pos: Vec2, size: Vec2, color: Color },
    /// `shadow` is the blur radius of a drop shadow (0 = none)
    FillCircle { center: Vec2, radius: f32, color: Color, shadow: f32 },
    Particles(Vec<Flake>),
}

/// Ordered draw calls for one frame
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub size: Vec2,
    pub commands: Vec<DrawCmd>,
}

impl Scene {
    /// Build the frame for the given run (or an empty playfield before the first run)
    pub fn build(state: Option<&SessionState>, tuning: &Tuning, snowfall: &Snowfall) -> Self {
        let size = Vec2::new(tuning.width(), tuning.floor());
        let mut commands = vec![
            DrawCmd::Clear(SKY),
            DrawCmd::FillRect {
                pos: Vec2::new(0.0, size.y - GROUND_BAND),
                size: Vec2::new(size.x, GROUND_BAND),
                color: GROUND,
            },
        ];

        if !snowfall.flakes.is_empty() {
            commands.push(DrawCmd::Particles(snowfall.flakes.clone()));
        }

        if let Some(state) = state {
            commands.push(DrawCmd::FillCircle {
                center: state.ball.pos,
                radius: state.ball.radius,
                color: SNOWBALL,
                shadow: 10.0,
            });
            for obstacle in &state.obstacles {
                commands.push(DrawCmd::FillRect {
                    pos: obstacle.pos,
                    size: obstacle.size,
                    color: OBSTACLE,
                });
            }
        }

        Self { size, commands }
    }
}

/// A falling snowflake (visual only)
#[derive(Debug, Clone, PartialEq)]
pub struct Flake {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
    fall: f32,
}

/// Ambient snowfall drifting with the scroll speed
#[derive(Debug, Clone)]
pub struct Snowfall {
    pub flakes: Vec<Flake>,
    bounds: Vec2,
    rng: Pcg32,
}

impl Snowfall {
    pub fn new(count: usize, tuning: &Tuning, seed: u64) -> Self {
        let bounds = Vec2::new(tuning.width(), tuning.floor());
        let mut rng = Pcg32::seed_from_u64(seed);
        let flakes = (0..count)
            .map(|_| {
                let pos = Vec2::new(rng.random_range(0.0..bounds.x), rng.random_range(0.0..bounds.y));
                Self::flake_at(&mut rng, pos)
            })
            .collect();
        Self { flakes, bounds, rng }
    }

    fn flake_at(rng: &mut Pcg32, pos: Vec2) -> Flake {
        Flake {
            pos,
            radius: rng.random_range(1.0..3.0),
            alpha: rng.random_range(0.4..0.9),
            fall: rng.random_range(0.5..1.5),
        }
    }

    /// Advance flakes; `speed` is the current scroll speed (pixels per tick)
    pub fn update(&mut self, dt: f32, speed: f32) {
        let ticks = dt / FRAME_DT;
        for i in 0..self.flakes.len() {
            let flake = &mut self.flakes[i];
            flake.pos.x -= speed * 0.3 * ticks;
            flake.pos.y += flake.fall * ticks;
            if flake.pos.y > self.bounds.y || flake.pos.x < 0.0 {
                let pos = Vec2::new(
                    self.rng.random_range(0.0..self.bounds.x + 100.0),
                    -5.0,
                );
                self.flakes[i] = Self::flake_at(&mut self.rng, pos);
            }
        }
    }
}
