//! The game's force law
//!
//! Each non-reflector source pulls the ball toward its center with magnitude
//! `G * mass / d^2`. Close to a center the squared distance is floored at
//! `MIN_DISTANCE_SQUARED`, so the pull saturates at `G * mass / MIN_DISTANCE_SQUARED`.
//! Exactly on a center there is no direction and the pull is zero. Neither
//! case produces NaN.

use super::state::Source;
use super::vector::{Point2d, Vector2d};
use crate::consts::MIN_DISTANCE_SQUARED;

/// Acceleration on a ball at `ball` from a point mass at `source`
pub fn pull(ball: Point2d, source: Point2d, mass: f64, gravity_strength: f64) -> Vector2d {
    let toward = ball.to(source);
    let distance_squared = toward.length_squared().max(MIN_DISTANCE_SQUARED);
    let magnitude = gravity_strength * mass / distance_squared;
    toward.normalize_or_zero() * magnitude
}

/// Sum of pulls from every non-reflector source
pub fn net_pull(
    ball: Point2d,
    sources: impl Iterator<Item = Source>,
    gravity_strength: f64,
) -> Vector2d {
    sources
        .filter(|s| !s.reflector)
        .fold(Vector2d::ZERO, |sum, s| {
            sum + pull(ball, s.circle.center, s.mass, gravity_strength)
        })
}
