//! World entities and level state
//!
//! A level is split in two: immutable geometry shared behind an `Arc`, and the
//! per-tick flight state (ball, moon phases, edge-trigger flags) owned by value.
//! Cloning a `Level` therefore deep-copies everything `tick` mutates while the
//! geometry stays shared, which is what lets probes run side by side.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::vector::{Point2d, Vector2d};
use crate::consts::*;
use crate::viewport_center;

/// A circle, the shape shared by the ball, bodies, moons, warps and goals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2d,
    pub radius: f64,
}

impl Circle {
    pub const fn new(center: Point2d, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Strict overlap: touching circles do not intersect
    #[inline]
    pub fn intersects(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) < reach * reach
    }
}

/// The movable ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub center: Point2d,
    pub velocity: Vector2d,
    pub radius: f64,
    pub launched: bool,
    /// Where `Level::reset` puts the ball back
    pub starting_position: Point2d,
}

impl Ball {
    pub fn new(center: Point2d, radius: f64) -> Self {
        Self {
            center,
            velocity: Vector2d::ZERO,
            radius,
            launched: false,
            starting_position: center,
        }
    }

    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    /// Advance the position by one tick of the current velocity
    #[inline]
    pub fn advance(&mut self) {
        self.center += self.velocity;
    }
}

/// A moon circling its parent body at a fixed distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moon {
    /// Center-to-center distance from the parent
    pub distance: f64,
    pub radius: f64,
    pub mass: f64,
    /// Phase at construction (radians, screen convention)
    pub starting_angle: f64,
    /// Phase change per tick; applied clockwise
    pub angular_speed: f64,
}

impl Moon {
    /// Derive the orbital speed from the circular-orbit balance around `parent_mass`
    pub fn new(
        starting_angle: f64,
        distance: f64,
        radius: f64,
        parent_mass: f64,
        gravity_strength: f64,
    ) -> Self {
        let angular_speed = if distance > 0.0 {
            MOON_ORBIT_FACTOR * (gravity_strength * parent_mass / distance).abs().sqrt()
        } else {
            0.0
        };
        Self {
            distance,
            radius,
            mass: radius,
            starting_angle,
            angular_speed,
        }
    }

    /// Center when orbiting `parent` at phase `angle`
    #[inline]
    pub fn center_at(&self, parent: Point2d, angle: f64) -> Point2d {
        parent.translate(Vector2d::from_polar(self.distance, angle))
    }
}

/// A fixed mass source; reflectors bounce the ball instead of attracting it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravityBody {
    pub center: Point2d,
    pub radius: f64,
    pub mass: f64,
    pub reflector: bool,
    pub moons: Vec<Moon>,
}

impl GravityBody {
    /// A plain body whose mass equals its radius
    pub fn new(center: Point2d, radius: f64) -> Self {
        Self {
            center,
            radius,
            mass: radius,
            reflector: false,
            moons: Vec::new(),
        }
    }

    pub fn with_mass(self, mass: f64) -> Self {
        Self { mass, ..self }
    }

    pub fn with_reflector(self, reflector: bool) -> Self {
        Self { reflector, ..self }
    }

    /// Attach a moon; `angle_degrees` is the starting phase
    pub fn with_moon(
        mut self,
        angle_degrees: f64,
        distance: f64,
        radius: f64,
        gravity_strength: f64,
    ) -> Self {
        let moon = Moon::new(
            angle_degrees.to_radians(),
            distance,
            radius,
            self.mass,
            gravity_strength,
        );
        self.moons.push(moon);
        self
    }

    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }
}

/// Axis-aligned rectangle that bounces the ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blockage {
    pub center: Point2d,
    pub half_width: f64,
    pub half_height: f64,
}

impl Blockage {
    pub const fn new(center: Point2d, half_width: f64, half_height: f64) -> Self {
        Self {
            center,
            half_width,
            half_height,
        }
    }

    pub fn left(&self) -> f64 {
        self.center.x - self.half_width
    }

    pub fn right(&self) -> f64 {
        self.center.x + self.half_width
    }

    pub fn top(&self) -> f64 {
        self.center.y - self.half_height
    }

    pub fn bottom(&self) -> f64 {
        self.center.y + self.half_height
    }

    pub fn width(&self) -> f64 {
        2.0 * self.half_width
    }

    pub fn height(&self) -> f64 {
        2.0 * self.half_height
    }

    /// Whether the rounded `point` lies inside, edges included
    pub fn contains(&self, point: Point2d) -> bool {
        let p = point.rounded();
        let (x, y) = (p.x as f64, p.y as f64);
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }
}

/// A teleport node; nodes form a cycle in index order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarpPoint {
    pub center: Point2d,
}

impl WarpPoint {
    pub const fn new(center: Point2d) -> Self {
        Self { center }
    }

    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, WARP_RADIUS)
    }
}

/// The circular target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub center: Point2d,
    pub radius: f64,
}

impl Goal {
    pub const fn new(center: Point2d, radius: f64) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }
}

/// Everything about a level that `tick` never changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub bodies: Vec<GravityBody>,
    pub blockages: Vec<Blockage>,
    pub warps: Vec<WarpPoint>,
    pub goals: Vec<Goal>,
    pub gravity_strength: f64,
    /// Camera responsiveness; 0 pins the camera
    pub follow_factor: f64,
}

impl Geometry {
    /// Every moon with its parent, in body order then moon order
    pub fn moons(&self) -> impl Iterator<Item = (&GravityBody, &Moon)> + '_ {
        self.bodies
            .iter()
            .flat_map(|body| body.moons.iter().map(move |moon| (body, moon)))
    }

    pub fn moon_count(&self) -> usize {
        self.bodies.iter().map(|b| b.moons.len()).sum()
    }

    /// Camera offset that follows a ball at `ball_center`
    pub fn camera_shift_for(&self, ball_center: Point2d) -> Vector2d {
        if self.follow_factor == 0.0 {
            Vector2d::ZERO
        } else {
            (Point2d::from(viewport_center()) - ball_center) / self.follow_factor
        }
    }
}

/// Everything `tick` mutates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightState {
    pub ball: Ball,
    /// Current phase of each moon, aligned with `Geometry::moons`
    pub moon_angles: Vec<f64>,
    pub camera_shift: Vector2d,
    /// Edge trigger: the ball overlapped a warp node last tick
    pub ball_in_warp: bool,
    /// Edge trigger: the ball is inside a blockage this contact streak
    pub hitting_blockage: bool,
}

/// Where a flight stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    /// Ball resting at its start, waiting for a launch
    NotLaunched,
    /// Ball in flight
    Flying,
    /// Ball reached a goal
    Won,
    /// Ball left the playfield or hit a non-reflector body
    Reset,
}

/// A source of gravity (body or moon) at its current position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source {
    pub circle: Circle,
    pub mass: f64,
    pub reflector: bool,
}

/// A playable level: shared geometry plus owned flight state
#[derive(Debug, Clone)]
pub struct Level {
    pub(crate) geometry: Arc<Geometry>,
    pub(crate) state: FlightState,
    pub(crate) time_ticks: u64,
}

impl Level {
    pub fn new(ball: Ball, geometry: Geometry) -> Self {
        let moon_angles = geometry.moons().map(|(_, m)| m.starting_angle).collect();
        let camera_shift = geometry.camera_shift_for(ball.center);
        Self {
            geometry: Arc::new(geometry),
            state: FlightState {
                ball,
                moon_angles,
                camera_shift,
                ball_in_warp: false,
                hitting_blockage: false,
            },
            time_ticks: 0,
        }
    }

    /// Independent copy for probing: flight state is deep-copied, geometry shared
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn state(&self) -> &FlightState {
        &self.state
    }

    pub fn ball(&self) -> &Ball {
        &self.state.ball
    }

    pub fn camera_shift(&self) -> Vector2d {
        self.state.camera_shift
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Same level with `goal` added (geometry is copied only if shared)
    pub fn with_goal(mut self, goal: Goal) -> Self {
        Arc::make_mut(&mut self.geometry).goals.push(goal);
        self
    }

    /// Start a flight with the given initial velocity
    pub fn launch(&mut self, velocity: Vector2d) {
        self.state.ball.velocity = velocity;
        self.state.ball.launched = true;
    }

    /// Put the ball back at its start, unlaunched
    pub fn reset(&mut self) {
        let ball = &mut self.state.ball;
        ball.center = ball.starting_position;
        ball.velocity = Vector2d::ZERO;
        ball.launched = false;
        self.state.ball_in_warp = false;
        self.state.hitting_blockage = false;
        self.state.camera_shift = self.geometry.camera_shift_for(ball.center);
    }

    /// Bodies and moons at their current positions
    pub fn sources(&self) -> impl Iterator<Item = Source> + '_ {
        sources(&self.geometry, &self.state)
    }

    /// Whether `point` falls outside the viewport (bottom margin excluded)
    pub fn is_point_out_of_bounds(&self, point: Point2d) -> bool {
        point_out_of_bounds(point, self.state.camera_shift)
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.is_point_out_of_bounds(self.state.ball.center)
    }

    /// Whether `point` is strictly inside the visible viewport
    pub fn on_screen(&self, point: Point2d) -> bool {
        let p = point + self.state.camera_shift;
        p.x > 0.0 && p.x < VIEWPORT_WIDTH && p.y > 0.0 && p.y < VIEWPORT_HEIGHT
    }

    pub fn intersects_non_reflector_body(&self) -> bool {
        intersects_non_reflector(&self.geometry, &self.state)
    }

    pub fn in_goal(&self) -> bool {
        let ball = self.state.ball.circle();
        self.geometry
            .goals
            .iter()
            .any(|g| g.circle().intersects(&ball))
    }

    pub fn time_to_reset(&self) -> bool {
        self.is_out_of_bounds() || self.intersects_non_reflector_body()
    }

    pub fn phase(&self) -> FlightPhase {
        if !self.state.ball.launched {
            FlightPhase::NotLaunched
        } else if self.in_goal() {
            FlightPhase::Won
        } else if self.time_to_reset() {
            FlightPhase::Reset
        } else {
            FlightPhase::Flying
        }
    }
}

pub(crate) fn sources<'a>(
    geometry: &'a Geometry,
    state: &'a FlightState,
) -> impl Iterator<Item = Source> + 'a {
    let bodies = geometry.bodies.iter().map(|b| Source {
        circle: b.circle(),
        mass: b.mass,
        reflector: b.reflector,
    });
    let moons = geometry
        .moons()
        .zip(&state.moon_angles)
        .map(|((parent, moon), &angle)| Source {
            circle: Circle::new(moon.center_at(parent.center, angle), moon.radius),
            mass: moon.mass,
            reflector: false,
        });
    bodies.chain(moons)
}

pub(crate) fn intersects_non_reflector(geometry: &Geometry, state: &FlightState) -> bool {
    let ball = state.ball.circle();
    sources(geometry, state).any(|s| !s.reflector && s.circle.intersects(&ball))
}

pub(crate) fn point_out_of_bounds(point: Point2d, camera_shift: Vector2d) -> bool {
    let p = point + camera_shift;
    p.x < 0.0 || p.x > VIEWPORT_WIDTH || p.y < 0.0 || p.y > VIEWPORT_HEIGHT - BOTTOM_MARGIN
}
