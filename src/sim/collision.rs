//! Collision response for reflectors and blockages
//!
//! Both obstacles use discrete depenetration: after the velocity is changed the
//! ball is stepped forward by whole ticks until it no longer overlaps. Shallow
//! reflections can overshoot; that is the game's feel, not a bug to fix.

use super::state::{Ball, Blockage};
use super::vector::{Point2d, Vector2d};
use crate::consts::{BLOCKAGE_EDGE_TOLERANCE, MAX_DEPENETRATION_STEPS};

/// Velocity axis inverted by a blockage hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// `velocity` with this component negated
    pub fn flip(self, velocity: Vector2d) -> Vector2d {
        match self {
            Axis::X => Vector2d::new(-velocity.x, velocity.y),
            Axis::Y => Vector2d::new(velocity.x, -velocity.y),
        }
    }
}

/// Reflect `velocity` off a circular reflector
///
/// The component along the line of centers is reversed:
/// v' = v - 2 * proj(v, ball -> body)
pub fn reflect_off_circle(velocity: Vector2d, ball: Point2d, body: Point2d) -> Vector2d {
    let along = velocity.projection_onto(ball.to(body));
    velocity - along * 2.0
}

/// Pick the axis to invert when the ball at `point` enters `blockage`
///
/// A ball clearly between the top/bottom edges hit a vertical side, so x
/// flips; this also covers a ball found deep inside. Clearly between the
/// left/right edges only means a horizontal face, so y flips. Near a corner
/// the longer side wins.
pub fn blockage_reflection_axis(blockage: &Blockage, point: Point2d) -> Axis {
    let tol = BLOCKAGE_EDGE_TOLERANCE;
    let between_sides = point.x > blockage.left() + tol && point.x < blockage.right() - tol;
    let between_faces = point.y > blockage.top() + tol && point.y < blockage.bottom() - tol;

    match (between_sides, between_faces) {
        (_, true) => Axis::X,
        (true, false) => Axis::Y,
        _ if blockage.width() > blockage.height() => Axis::Y,
        _ => Axis::X,
    }
}

/// Step the ball along its velocity while `inside` holds
///
/// Returns the number of steps taken. A motionless ball is left in place.
pub fn step_out(ball: &mut Ball, mut inside: impl FnMut(&Ball) -> bool) -> u32 {
    if ball.velocity.length_squared() == 0.0 {
        return 0;
    }
    let mut steps = 0;
    while steps < MAX_DEPENETRATION_STEPS && inside(ball) {
        ball.advance();
        steps += 1;
    }
    steps
}
