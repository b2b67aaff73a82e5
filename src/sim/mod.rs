//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - State is owned by `SessionState` and passed by `&mut`
//! - Seeded RNG only
//! - Obstacles are culled by rebuilding, never mid-iteration

pub mod collision;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, ball_hits_obstacle, first_collision};
pub use physics::{integrate_ball, scroll_obstacles};
pub use spawner::spawn_obstacles;
pub use state::{Ball, GameEvent, JumpState, Obstacle, SessionState, SpawnPhase};
pub use tick::{TickInput, tick};
