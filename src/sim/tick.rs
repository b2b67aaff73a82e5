//! Variable timestep simulation tick
//!
//! One call per display refresh. The order inside a tick is fixed: speed,
//! jump input, ball integration, obstacle scroll, spawning, collision, score.

use super::collision::first_collision;
use super::physics::{integrate_ball, scroll_obstacles};
use super::spawner::spawn_obstacles;
use super::state::{GameEvent, SessionState};
use crate::tuning::Tuning;

/// Input edges collected since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump button went down
    pub jump_pressed: bool,
    /// Jump button went up
    pub jump_released: bool,
}

/// Advance the session state by one frame of `dt` seconds.
///
/// Does nothing once the ball has crashed.
pub fn tick(state: &mut SessionState, input: &TickInput, tuning: &Tuning, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.crashed {
        return events;
    }

    state.elapsed += dt;
    state.speed = tuning.speed_at(state.elapsed);
    state.ticks += 1;

    // A press and release in the same frame still produce a (tap) jump
    if input.jump_pressed {
        state.ball.press_jump();
    }
    if input.jump_released {
        if let Some(fraction) = state.ball.release_jump(tuning) {
            events.push(GameEvent::Jumped { fraction });
        }
    }

    integrate_ball(&mut state.ball, tuning, dt);
    scroll_obstacles(&mut state.obstacles, state.speed);

    if let Some(size) = spawn_obstacles(state, tuning) {
        events.push(GameEvent::Spawned { size });
    }

    if first_collision(&state.ball, &state.obstacles).is_some() {
        state.crashed = true;
        events.push(GameEvent::Crashed);
        return events;
    }

    state.score += state.speed * tuning.score_rate;
    events
}
