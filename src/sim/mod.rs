//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed unit timestep only, explicit Euler
//! - No clocks, no RNG
//! - Stable iteration order (entity index order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod gravity;
pub mod state;
pub mod tick;
pub mod vector;

pub use collision::{Axis, blockage_reflection_axis, reflect_off_circle};
pub use gravity::{net_pull, pull};
pub use state::{
    Ball, Blockage, Circle, FlightPhase, FlightState, Geometry, Goal, GravityBody, Level, Moon,
    Source, WarpPoint,
};
pub use tick::tick;
pub use vector::{IntPoint, Point2d, Vector2d};
