//! Monte-Carlo goal placement
//!
//! Fires random launches from the ball and harvests positions the ball passes
//! through that are far from the start, well inside the opening view and
//! clear of every body. One harvested position, chosen uniformly, becomes
//! the goal.

use std::f64::consts::TAU;

use rand::Rng;

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::oracle::{self, Budget};
use crate::settings::PlacementSettings;
use crate::sim::{Geometry, Goal, Level, Point2d, Vector2d};

/// Minimum distance from the launch position for a goal: half the viewport diagonal
pub fn far_enough_distance() -> f64 {
    0.5 * VIEWPORT_WIDTH.hypot(VIEWPORT_HEIGHT)
}

/// Uniform point in the disc of radius `radius` around `center`
pub fn sample_in_disc(center: Point2d, radius: f64, rng: &mut impl Rng) -> Point2d {
    let r = radius * rng.random::<f64>().sqrt();
    let angle = rng.random::<f64>() * TAU;
    center.translate(Vector2d::from_polar(r, angle))
}

/// Redraws allowed per sample before the sample is given up
const MAX_REDRAWS: u32 = 1000;

/// Uniform launch point in the level's launch disc that is on screen
///
/// Points outside the view are redrawn; `None` only if every one of
/// `MAX_REDRAWS` draws missed.
pub fn sample_launch_point(
    level: &Level,
    max_magnitude: f64,
    rng: &mut impl Rng,
) -> Option<Point2d> {
    let start = level.ball().center;
    (0..MAX_REDRAWS)
        .map(|_| sample_in_disc(start, max_magnitude, rng))
        .find(|p| level.on_screen(*p))
}

/// Rules a flight position must pass to become a goal candidate
struct CandidateFilter<'a> {
    geometry: &'a Geometry,
    start: Point2d,
    /// Camera shift when the level opens; goals must sit well inside that view
    view_shift: Vector2d,
    settings: &'a PlacementSettings,
}

impl CandidateFilter<'_> {
    fn accepts(&self, position: Point2d) -> bool {
        if position.distance(self.start) <= far_enough_distance() {
            return false;
        }

        let margin = self.settings.edge_margin;
        let screen = position + self.view_shift;
        let inside_view = screen.x >= margin
            && screen.x <= VIEWPORT_WIDTH - margin
            && screen.y >= margin
            && screen.y <= VIEWPORT_HEIGHT - margin;
        if !inside_view {
            return false;
        }

        self.geometry.bodies.iter().all(|body| {
            position.distance(body.center) > body.radius + self.settings.body_clearance
        })
    }
}

/// Pick a goal for `level`, or `None` if no sampled flight produced a candidate
///
/// Candidates are kept with single-slot reservoir sampling, so every harvested
/// position is equally likely without buffering them.
pub fn place_goal(
    level: &Level,
    settings: &PlacementSettings,
    max_magnitude: f64,
    rng: &mut impl Rng,
) -> Option<Goal> {
    sample_flights(level, settings, max_magnitude, rng).goal
}

struct Harvest {
    goal: Option<Goal>,
    flights: u32,
}

fn sample_flights(
    level: &Level,
    settings: &PlacementSettings,
    max_magnitude: f64,
    rng: &mut impl Rng,
) -> Harvest {
    let start = level.ball().center;
    let filter = CandidateFilter {
        geometry: level.geometry(),
        start,
        view_shift: level.camera_shift(),
        settings,
    };

    let mut chosen: Option<Point2d> = None;
    let mut seen: u64 = 0;
    let mut flights = 0;
    for _ in 0..settings.samples {
        let Some(target) = sample_launch_point(level, max_magnitude, rng) else {
            log::debug!("No on-screen launch point after {MAX_REDRAWS} draws");
            continue;
        };
        flights += 1;

        let mut flight = level.snapshot();
        flight.launch(oracle::launch_velocity(start, target, max_magnitude));
        oracle::fly(&mut flight, Budget::Ticks(settings.max_ticks), |l| {
            let position = l.ball().center;
            if filter.accepts(position) {
                seen += 1;
                if rng.random_range(0..seen) == 0 {
                    chosen = Some(position);
                }
            }
        });
    }

    log::debug!("Placement: {flights} flights, {seen} candidate positions");
    Harvest {
        goal: chosen.map(|center| Goal::new(center, settings.goal_radius)),
        flights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Ball, GravityBody};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn open_level(bodies: Vec<GravityBody>) -> Level {
        Level::new(
            Ball::new(Point2d::new(100.0, 100.0), 3.0),
            Geometry {
                bodies,
                blockages: Vec::new(),
                warps: Vec::new(),
                goals: Vec::new(),
                gravity_strength: 1.0,
                follow_factor: 5.0,
            },
        )
    }

    #[test]
    fn test_disc_samples_stay_in_disc() {
        let mut rng = Pcg32::seed_from_u64(7);
        let center = Point2d::new(10.0, -5.0);
        for _ in 0..500 {
            let p = sample_in_disc(center, 40.0, &mut rng);
            assert!(p.distance(center) <= 40.0 + 1e-9);
        }
    }

    #[test]
    fn test_every_sample_flies_from_a_corner_ball() {
        // Near the top-left corner a large share of the disc is off screen
        let level = Level::new(
            Ball::new(Point2d::new(75.0, 50.0), 3.0),
            Geometry {
                bodies: Vec::new(),
                blockages: Vec::new(),
                warps: Vec::new(),
                goals: Vec::new(),
                gravity_strength: 1.0,
                follow_factor: 5.0,
            },
        );
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..1000 {
            let p = sample_launch_point(&level, 300.0, &mut rng).unwrap();
            assert!(level.on_screen(p));
            assert!(p.distance(level.ball().center) <= 300.0 + 1e-9);
        }

        let settings = PlacementSettings {
            samples: 200,
            max_ticks: 10,
            ..PlacementSettings::default()
        };
        let harvest = sample_flights(&level, &settings, 300.0, &mut rng);
        assert_eq!(harvest.flights, 200);
        assert_eq!(harvest.goal, None);
    }

    #[test]
    fn test_goal_satisfies_placement_rules() {
        let body = GravityBody::new(Point2d::new(900.0, 100.0), 40.0);
        let level = open_level(vec![body.clone()]);
        let settings = PlacementSettings::default();
        let mut rng = Pcg32::seed_from_u64(42);

        let goal = place_goal(&level, &settings, 300.0, &mut rng).expect("open level has room");
        assert_eq!(goal.radius, 15.0);
        assert!(goal.center.distance(level.ball().center) > far_enough_distance());
        let screen = goal.center + level.camera_shift();
        assert!(screen.x >= 100.0 && screen.x <= 900.0);
        assert!(screen.y >= 100.0 && screen.y <= 600.0);
        assert!(goal.center.distance(body.center) > body.radius + 10.0);
    }

    #[test]
    fn test_short_flights_find_nothing() {
        let level = open_level(Vec::new());
        let settings = PlacementSettings {
            samples: 50,
            max_ticks: 20,
            ..PlacementSettings::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(place_goal(&level, &settings, 300.0, &mut rng), None);
    }

    #[test]
    fn test_same_seed_same_goal() {
        let level = open_level(vec![GravityBody::new(Point2d::new(500.0, 400.0), 60.0)]);
        let settings = PlacementSettings {
            samples: 100,
            ..PlacementSettings::default()
        };
        let a = place_goal(&level, &settings, 300.0, &mut Pcg32::seed_from_u64(9));
        let b = place_goal(&level, &settings, 300.0, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
