//! Collision detection between the snowball and obstacles
//!
//! The ball is tested as its bounding square, not as a circle. That makes
//! corner hits slightly generous to the obstacle and is intentional: it is
//! how the game has always played.

use glam::Vec2;

use super::state::{Ball, Obstacle};

/// Axis-aligned box, min/max corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}

impl From<&Ball> for Aabb {
    fn from(ball: &Ball) -> Self {
        let (min, max) = ball.bounds();
        Aabb::new(min, max)
    }
}

impl From<&Obstacle> for Aabb {
    fn from(obstacle: &Obstacle) -> Self {
        Aabb::new(obstacle.pos, obstacle.pos + obstacle.size)
    }
}

/// Check whether the ball overlaps a single obstacle
pub fn ball_hits_obstacle(ball: &Ball, obstacle: &Obstacle) -> bool {
    Aabb::from(ball).overlaps(&Aabb::from(obstacle))
}

/// Index of the first obstacle the ball overlaps, if any
pub fn first_collision(ball: &Ball, obstacles: &[Obstacle]) -> Option<usize> {
    let ball_box = Aabb::from(ball);
    obstacles
        .iter()
        .position(|o| ball_box.overlaps(&Aabb::from(o)))
}
