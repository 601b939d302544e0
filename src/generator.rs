//! Random level generation
//!
//! A random level is a ball near one of a few preferred spots plus
//! non-overlapping bodies until a random share of the viewport area is
//! covered. `generate_level` retries until goal placement succeeds, up to a
//! fixed number of attempts.

use std::f64::consts::{PI, TAU};

use rand::Rng;

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::error::Error;
use crate::placement::place_goal;
use crate::settings::Settings;
use crate::sim::{Ball, Geometry, GravityBody, Level, Point2d};

const BALL_RADIUS: f64 = 3.0;
const BALL_SPREAD: f64 = 15.0;
/// Preferred ball coordinates with cumulative probabilities
const BALL_X_MEANS: [(f64, f64); 3] = [(0.6, 75.0), (0.8, 500.0), (1.0, 800.0)];
const BALL_Y_MEANS: [(f64, f64); 3] = [(0.6, 50.0), (0.8, 300.0), (1.0, 500.0)];

const FILL_MEAN: f64 = 0.3;
const FILL_SD: f64 = 0.2;
const FILL_MIN: f64 = 0.1;
const FILL_MAX: f64 = 0.5;

const BODY_X_RANGE: std::ops::RangeInclusive<i32> = -100..=1100;
const BODY_Y_RANGE: std::ops::RangeInclusive<i32> = -100..=800;
const BODY_RADIUS_MEAN: f64 = 120.0;
const BODY_RADIUS_SD: f64 = 90.0;
const MIN_BODY_RADIUS: f64 = 10.0;
/// Placement tries per body before the level is left as is
const MAX_BODY_TRIES: u32 = 1000;

const FOLLOW_FACTOR: f64 = 5.0;
const GRAVITY_STRENGTH: f64 = 1.0;

/// Normally distributed sample (Box-Muller)
pub fn gaussian(rng: &mut impl Rng, mean: f64, sd: f64) -> f64 {
    // 1 - u keeps the log argument in (0, 1]
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    mean + sd * (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

fn gaussian_integer(rng: &mut impl Rng, mean: f64, sd: f64) -> f64 {
    gaussian(rng, mean, sd).round()
}

fn pick_mean(rng: &mut impl Rng, table: &[(f64, f64)]) -> f64 {
    let u = rng.random::<f64>();
    table
        .iter()
        .find(|(cumulative, _)| u < *cumulative)
        .or(table.last())
        .map_or(0.0, |&(_, mean)| mean)
}

fn random_ball(rng: &mut impl Rng) -> Ball {
    let x_mean = pick_mean(rng, &BALL_X_MEANS);
    let y_mean = pick_mean(rng, &BALL_Y_MEANS);
    let x = gaussian_integer(rng, x_mean, BALL_SPREAD);
    let y = gaussian_integer(rng, y_mean, BALL_SPREAD);
    Ball::new(Point2d::new(x, y), BALL_RADIUS)
}

fn random_body(rng: &mut impl Rng) -> GravityBody {
    let x = rng.random_range(BODY_X_RANGE);
    let y = rng.random_range(BODY_Y_RANGE);
    let radius = gaussian_integer(rng, BODY_RADIUS_MEAN, BODY_RADIUS_SD).max(MIN_BODY_RADIUS);
    GravityBody::new(Point2d::new(f64::from(x), f64::from(y)), radius)
}

fn random_bodies(rng: &mut impl Rng, ball: &Ball) -> Vec<GravityBody> {
    let fill = gaussian(rng, FILL_MEAN, FILL_SD).clamp(FILL_MIN, FILL_MAX);
    let must_fill = fill * VIEWPORT_WIDTH * VIEWPORT_HEIGHT;

    let mut bodies: Vec<GravityBody> = Vec::new();
    let mut filled = 0.0;
    while filled < must_fill {
        let placed = (0..MAX_BODY_TRIES)
            .map(|_| random_body(rng))
            .find(|candidate| {
                let circle = candidate.circle();
                !circle.intersects(&ball.circle())
                    && bodies.iter().all(|b| !b.circle().intersects(&circle))
            });
        let Some(body) = placed else {
            log::debug!("No room for another body after {MAX_BODY_TRIES} tries");
            break;
        };
        filled += PI * body.radius * body.radius;
        bodies.push(body);
    }
    bodies
}

/// A random level without a goal
pub fn random_level(rng: &mut impl Rng) -> Level {
    let ball = random_ball(rng);
    let bodies = random_bodies(rng, &ball);
    Level::new(
        ball,
        Geometry {
            bodies,
            blockages: Vec::new(),
            warps: Vec::new(),
            goals: Vec::new(),
            gravity_strength: GRAVITY_STRENGTH,
            follow_factor: FOLLOW_FACTOR,
        },
    )
}

/// A random level with a placed goal
///
/// Levels where placement finds no candidate are thrown away and regenerated,
/// at most `settings.generator.max_attempts` times.
pub fn generate_level(settings: &Settings, rng: &mut impl Rng) -> Result<Level, Error> {
    let attempts = settings.generator.max_attempts;
    for attempt in 1..=attempts {
        let level = random_level(rng);
        match place_goal(&level, &settings.placement, settings.max_magnitude, rng) {
            Some(goal) => {
                log::info!(
                    "Generated level with {} bodies on attempt {attempt}; goal at ({:.1}, {:.1})",
                    level.geometry().bodies.len(),
                    goal.center.x,
                    goal.center.y
                );
                return Ok(level.with_goal(goal));
            }
            None => log::debug!("Attempt {attempt}: no goal candidates, regenerating"),
        }
    }
    log::warn!("Gave up generating a level after {attempts} attempts");
    Err(Error::GenerationExhausted { attempts })
}
