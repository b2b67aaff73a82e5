//! Per-tick integration for the ball and the scrolling obstacles
//!
//! Gravity, damping and scrolling are applied once per tick regardless of
//! the frame delta; the game feel is tuned around a 60 Hz display. Only the
//! jump charge timer is measured in real time.

use super::state::{Ball, Obstacle};
use crate::tuning::Tuning;

/// Advance the ball by one tick
pub fn integrate_ball(ball: &mut Ball, tuning: &Tuning, dt: f32) {
    ball.vel.y += tuning.gravity;
    ball.pos.y += ball.vel.y;

    ball.pos.x += ball.vel.x;
    ball.vel.x *= tuning.horizontal_damping;

    // Ground clamp
    let floor = tuning.floor();
    if ball.pos.y + ball.radius > floor {
        ball.pos.y = floor - ball.radius;
        ball.vel.x = 0.0;
        ball.vel.y = 0.0;
        ball.grounded = true;
    }

    if ball.charging {
        ball.charge_ms = (ball.charge_ms + dt * 1000.0).min(tuning.max_charge_ms);
    }
}

/// Scroll obstacles left by `speed` and drop the ones fully off-screen
pub fn scroll_obstacles(obstacles: &mut Vec<Obstacle>, speed: f32) {
    for obstacle in obstacles.iter_mut() {
        obstacle.pos.x -= speed;
    }
    obstacles.retain(|o| o.right() >= 0.0);
}
