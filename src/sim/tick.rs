//! Fixed timestep simulation tick
//!
//! Advances a level by exactly one unit step. Termination is not decided here;
//! callers inspect `Level::phase` (or the individual predicates) afterwards.

use super::collision::{blockage_reflection_axis, reflect_off_circle, step_out};
use super::gravity::net_pull;
use super::state::{
    FlightState, Geometry, Level, intersects_non_reflector, point_out_of_bounds, sources,
};
use super::vector::Vector2d;

/// Advance the level by one fixed timestep
pub fn tick(level: &mut Level) {
    let Level {
        geometry,
        state,
        time_ticks,
    } = level;
    let geometry: &Geometry = geometry;
    *time_ticks += 1;

    // Gravity from positions at the start of the tick
    let pull = if state.ball.launched {
        net_pull(state.ball.center, sources(geometry, state), geometry.gravity_strength)
    } else {
        Vector2d::ZERO
    };

    // Moons orbit clockwise whether or not the ball is moving
    for (angle, (_, moon)) in state.moon_angles.iter_mut().zip(geometry.moons()) {
        *angle -= moon.angular_speed;
    }

    bounce_off_reflectors(geometry, state);
    update_warps(geometry, state);
    let in_blockage = update_blockages(geometry, state);

    if !in_blockage && state.ball.launched {
        state.hitting_blockage = false;
        state.ball.velocity += pull;
        state.ball.advance();
    }

    state.camera_shift = geometry.camera_shift_for(state.ball.center);
}

fn bounce_off_reflectors(geometry: &Geometry, state: &mut FlightState) {
    for body in geometry.bodies.iter().filter(|b| b.reflector) {
        let obstacle = body.circle();
        if state.ball.circle().intersects(&obstacle) {
            let ball = &mut state.ball;
            ball.velocity = reflect_off_circle(ball.velocity, ball.center, body.center);
            step_out(ball, |b| b.circle().intersects(&obstacle));
        }
    }
}

/// Teleport on the tick the ball first overlaps a warp node
fn update_warps(geometry: &Geometry, state: &mut FlightState) {
    let warps = &geometry.warps;
    let ball = state.ball.circle();
    let Some(entered) = warps.iter().position(|w| w.circle().intersects(&ball)) else {
        state.ball_in_warp = false;
        return;
    };

    if !state.ball_in_warp {
        state.ball_in_warp = true;
        if warps.len() > 1 {
            let next = warps[(entered + 1) % warps.len()];
            state.ball.center = next.center;
        }
    }
}

/// Bounce off the first blockage containing the ball; true if the ball is inside one
fn update_blockages(geometry: &Geometry, state: &mut FlightState) -> bool {
    let Some(blockage) = geometry
        .blockages
        .iter()
        .find(|b| b.contains(state.ball.center))
    else {
        return false;
    };

    if !state.hitting_blockage {
        state.hitting_blockage = true;
        let axis = blockage_reflection_axis(blockage, state.ball.center);
        state.ball.velocity = axis.flip(state.ball.velocity);

        let resetting = point_out_of_bounds(state.ball.center, state.camera_shift)
            || intersects_non_reflector(geometry, state);
        if !resetting {
            step_out(&mut state.ball, |b| {
                geometry.blockages.iter().any(|bl| bl.contains(b.center))
            });
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Ball, Blockage, FlightPhase, GravityBody, WarpPoint};
    use crate::sim::vector::Point2d;
    use std::f64::consts::TAU;

    fn geometry() -> Geometry {
        Geometry {
            bodies: Vec::new(),
            blockages: Vec::new(),
            warps: Vec::new(),
            goals: Vec::new(),
            gravity_strength: 1.0,
            follow_factor: 0.0,
        }
    }

    fn launched(mut level: Level, velocity: Vector2d) -> Level {
        level.launch(velocity);
        level
    }

    #[test]
    fn test_unlaunched_ball_stays_put() {
        let mut g = geometry();
        g.bodies.push(GravityBody::new(Point2d::new(300.0, 100.0), 50.0));
        let mut level = Level::new(Ball::new(Point2d::new(100.0, 100.0), 3.0), g);
        for _ in 0..50 {
            tick(&mut level);
        }
        assert_eq!(level.ball().center, Point2d::new(100.0, 100.0));
        assert_eq!(level.ball().velocity, Vector2d::ZERO);
        assert_eq!(level.time_ticks(), 50);
    }

    #[test]
    fn test_free_flight_is_explicit_euler() {
        let mut g = geometry();
        g.bodies.push(GravityBody::new(Point2d::new(300.0, 100.0), 50.0));
        let mut level = launched(
            Level::new(Ball::new(Point2d::new(100.0, 100.0), 3.0), g),
            Vector2d::new(0.0, -1.0),
        );
        tick(&mut level);
        // Pull at distance 200: 50 / 200^2 toward +x, added before moving
        let ax = 50.0 / 40_000.0;
        assert!((level.ball().velocity.x - ax).abs() < 1e-12);
        assert!((level.ball().center.x - (100.0 + ax)).abs() < 1e-12);
        assert!((level.ball().center.y - 99.0).abs() < 1e-12);
    }

    #[test]
    fn test_moon_orbit_closes() {
        let mut g = geometry();
        g.bodies
            .push(GravityBody::new(Point2d::new(500.0, 350.0), 60.0).with_moon(30.0, 150.0, 10.0, 1.0));
        let mut level = Level::new(Ball::new(Point2d::new(50.0, 50.0), 3.0), g);
        let moon = level.geometry().bodies[0].moons[0].clone();
        let start = level.state().moon_angles[0];

        let period = (TAU / moon.angular_speed).round() as usize;
        for _ in 0..period {
            tick(&mut level);
        }
        let travelled = start - level.state().moon_angles[0];
        assert!(travelled > 0.0, "moons orbit clockwise");
        let error = (travelled - TAU).abs();
        assert!(error <= moon.angular_speed, "off by {error}");
    }

    #[test]
    fn test_single_warp_never_teleports() {
        let mut g = geometry();
        g.warps.push(WarpPoint::new(Point2d::new(110.0, 100.0)));
        let mut level = launched(
            Level::new(Ball::new(Point2d::new(100.0, 100.0), 3.0), g),
            Vector2d::new(0.5, 0.0),
        );
        let mut previous = level.ball().center;
        for _ in 0..60 {
            tick(&mut level);
            let moved = previous.distance(level.ball().center);
            assert!(moved < 1.0, "unexpected jump of {moved}");
            previous = level.ball().center;
        }
    }

    #[test]
    fn test_warp_teleports_once_per_entry() {
        let mut g = geometry();
        g.warps.push(WarpPoint::new(Point2d::new(200.0, 100.0)));
        g.warps.push(WarpPoint::new(Point2d::new(600.0, 300.0)));
        let mut level = launched(
            Level::new(Ball::new(Point2d::new(170.0, 100.0), 3.0), g),
            Vector2d::new(0.5, 0.0),
        );

        let mut teleports = 0;
        let mut previous = level.ball().center;
        for _ in 0..80 {
            tick(&mut level);
            if previous.distance(level.ball().center) > 50.0 {
                teleports += 1;
            }
            previous = level.ball().center;
        }
        assert_eq!(teleports, 1);
        // Drifting out of the second node re-arms the trigger
        assert!(level.ball().center.x > 618.0);
        assert!(!level.state().ball_in_warp);
    }

    #[test]
    fn test_blockage_bounces_once_per_contact() {
        let mut g = geometry();
        g.blockages
            .push(Blockage::new(Point2d::new(300.0, 300.0), 100.0, 10.0));
        let mut level = launched(
            Level::new(Ball::new(Point2d::new(300.0, 280.0), 3.0), g),
            Vector2d::new(0.0, 1.0),
        );
        let mut flipped = false;
        for _ in 0..30 {
            tick(&mut level);
            if level.ball().velocity.y < 0.0 {
                flipped = true;
            }
        }
        assert!(flipped);
        assert!(level.ball().velocity.y < 0.0);
        assert!(level.ball().center.y < 290.0);
        assert_eq!(level.phase(), FlightPhase::Flying);
    }

    /// Fly diagonally (+1, +1) into the top-left corner of a blockage centered
    /// at (300, 300) and return the velocity once clear of it
    fn corner_bounce(half_width: f64, half_height: f64) -> Vector2d {
        let mut g = geometry();
        g.blockages
            .push(Blockage::new(Point2d::new(300.0, 300.0), half_width, half_height));
        let start = Point2d::new(290.0 - half_width, 290.0 - half_height);
        let mut level = launched(
            Level::new(Ball::new(start, 3.0), g),
            Vector2d::new(1.0, 1.0),
        );
        for _ in 0..20 {
            tick(&mut level);
        }
        assert!(!level.state().hitting_blockage);
        level.ball().velocity
    }

    #[test]
    fn test_wide_blockage_corner_bounce_flips_y() {
        assert_eq!(corner_bounce(100.0, 10.0), Vector2d::new(1.0, -1.0));
    }

    #[test]
    fn test_tall_blockage_corner_bounce_flips_x() {
        assert_eq!(corner_bounce(10.0, 100.0), Vector2d::new(-1.0, 1.0));
    }

    #[test]
    fn test_reflector_bounce_keeps_speed() {
        let mut g = geometry();
        g.bodies.push(
            GravityBody::new(Point2d::new(300.0, 300.0), 40.0).with_reflector(true),
        );
        let mut level = launched(
            Level::new(Ball::new(Point2d::new(200.0, 300.0), 3.0), g),
            Vector2d::new(2.0, 0.0),
        );
        for _ in 0..60 {
            tick(&mut level);
        }
        let v = level.ball().velocity;
        assert!((v.length() - 2.0).abs() < 1e-9);
        assert!(v.x < 0.0);
        assert!(!level.intersects_non_reflector_body());
    }

    #[test]
    fn test_determinism() {
        let mut g = geometry();
        g.follow_factor = 5.0;
        g.bodies.push(
            GravityBody::new(Point2d::new(400.0, 200.0), 40.0).with_moon(0.0, 90.0, 8.0, 1.0),
        );
        g.bodies
            .push(GravityBody::new(Point2d::new(250.0, 420.0), 30.0).with_reflector(true));
        let base = Level::new(Ball::new(Point2d::new(100.0, 300.0), 3.0), g);

        let run = |mut level: Level| {
            level.launch(Vector2d::new(1.1, -0.4));
            while level.phase() == FlightPhase::Flying && level.time_ticks() < 5000 {
                tick(&mut level);
            }
            (level.phase(), level.time_ticks(), level.ball().center)
        };
        assert_eq!(run(base.snapshot()), run(base.snapshot()));
    }
}
