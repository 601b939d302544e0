//! Gravity Golf - a ball launched through fields of planets
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world model, per-tick update, collisions)
//! - `oracle`: Isolated simulate-to-termination probes for a single launch
//! - `solver`: Parallel enumeration of every winning launch point
//! - `placement`: Monte-Carlo goal placement for generated levels
//! - `generator`: Random level generation with bounded retry
//! - `description`: Level description values exchanged with loaders/writers
//! - `settings`: Data-driven search configuration

pub mod description;
pub mod error;
pub mod generator;
pub mod oracle;
pub mod placement;
pub mod settings;
pub mod sim;
pub mod solver;

pub use error::Error;
pub use settings::Settings;

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Viewport dimensions (screen units)
    pub const VIEWPORT_WIDTH: f64 = 1000.0;
    pub const VIEWPORT_HEIGHT: f64 = 700.0;
    /// Strip at the bottom of the viewport reserved for the HUD
    pub const BOTTOM_MARGIN: f64 = 20.0;
    /// The camera keeps this point centered when following the ball
    pub const VIEWPORT_CENTER_X: f64 = 500.0;
    pub const VIEWPORT_CENTER_Y: f64 = 350.0;

    /// Launch magnitude is divided by this to get the initial velocity
    pub const LAUNCH_SCALE: f64 = 200.0;
    /// Longest allowed drag from the ball when aiming
    pub const MAX_INITIAL_MAGNITUDE: f64 = 300.0;

    /// Radius of every warp node
    pub const WARP_RADIUS: f64 = 15.0;
    /// Radius of goals created by placement
    pub const GOAL_RADIUS: f64 = 15.0;
    /// Scales the circular-orbit angular speed of moons
    pub const MOON_ORBIT_FACTOR: f64 = 0.0075;
    /// Distance from a blockage edge inside which the hit side is ambiguous
    pub const BLOCKAGE_EDGE_TOLERANCE: f64 = 3.0;

    /// Floor for squared source distance (saturates the force near a center)
    pub const MIN_DISTANCE_SQUARED: f64 = 1e-6;
    /// Upper bound on forward steps while pushing the ball out of an obstacle
    pub const MAX_DEPENETRATION_STEPS: u32 = 10_000;
}

/// Angle of `(dx, dy)` in screen coordinates, counter-clockwise from +x.
///
/// Screen y grows downward, so the y difference is negated before `atan2`.
#[inline]
pub fn screen_angle(dx: f64, dy: f64) -> f64 {
    (-dy).atan2(dx)
}

/// Unit vector for a screen-convention angle (inverse of [`screen_angle`])
#[inline]
pub fn screen_direction(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), -angle.sin())
}

/// Point the camera keeps centered
#[inline]
pub fn viewport_center() -> DVec2 {
    DVec2::new(consts::VIEWPORT_CENTER_X, consts::VIEWPORT_CENTER_Y)
}
