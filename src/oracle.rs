//! Trajectory oracle
//!
//! Simulates a single launch to termination on a private copy of the level.
//! The caller's level is never touched, so any number of probes can run
//! against the same snapshot at once.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::consts::LAUNCH_SCALE;
use crate::sim::{FlightPhase, Level, Point2d, Vector2d, tick};

/// How a probe ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Reset,
    /// The budget ran out mid-flight; callers treat this as not winning
    TimedOut,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        self == Outcome::Win
    }
}

/// Cap on how long a single flight may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Stop after this many ticks (deterministic)
    Ticks(u64),
    /// Stop once this much wall-clock time has elapsed
    WallClock(Duration),
}

impl Default for Budget {
    fn default() -> Self {
        Budget::WallClock(Duration::from_millis(10))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub outcome: Outcome,
    /// Ticks simulated before the outcome was decided
    pub ticks: u64,
}

/// One recorded frame of a traced flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub center: Point2d,
    pub camera_shift: Vector2d,
}

/// Initial velocity for a launch from `from` aimed at `toward`
///
/// The drag length is clamped to `max_magnitude` and scaled down by
/// `LAUNCH_SCALE`.
pub fn launch_velocity(from: Point2d, toward: Point2d, max_magnitude: f64) -> Vector2d {
    let magnitude = from.distance(toward).min(max_magnitude);
    Vector2d::from_polar(magnitude, from.angle_to(toward)) / LAUNCH_SCALE
}

/// Probe a launch toward `point` on a private copy of `level`
pub fn probe(level: &Level, point: Point2d, max_magnitude: f64, budget: Budget) -> ProbeResult {
    probe_with(level, point, max_magnitude, budget, |_| {})
}

/// Like [`probe`], also recording the ball and camera after every tick
pub fn trace(
    level: &Level,
    point: Point2d,
    max_magnitude: f64,
    budget: Budget,
) -> (ProbeResult, Vec<TrajectorySample>) {
    let mut samples = Vec::new();
    let result = probe_with(level, point, max_magnitude, budget, |l| {
        samples.push(TrajectorySample {
            center: l.ball().center,
            camera_shift: l.camera_shift(),
        });
    });
    (result, samples)
}

fn probe_with(
    level: &Level,
    point: Point2d,
    max_magnitude: f64,
    budget: Budget,
    observe: impl FnMut(&Level),
) -> ProbeResult {
    if !level.on_screen(point) {
        return ProbeResult {
            outcome: Outcome::Reset,
            ticks: 0,
        };
    }

    let mut flight = level.snapshot();
    let velocity = launch_velocity(flight.ball().center, point, max_magnitude);
    flight.launch(velocity);
    fly(&mut flight, budget, observe)
}

/// Tick an already launched level until it wins, resets or exhausts `budget`
///
/// `observe` sees the level after every tick, before the phase is checked.
pub fn fly(level: &mut Level, budget: Budget, mut observe: impl FnMut(&Level)) -> ProbeResult {
    let started = Instant::now();
    let mut ticks = 0;
    loop {
        tick(level);
        ticks += 1;
        observe(level);

        let outcome = match level.phase() {
            FlightPhase::Won => Some(Outcome::Win),
            // A level that was never launched can't go anywhere
            FlightPhase::Reset | FlightPhase::NotLaunched => Some(Outcome::Reset),
            FlightPhase::Flying => None,
        };
        if let Some(outcome) = outcome {
            return ProbeResult { outcome, ticks };
        }

        let exhausted = match budget {
            Budget::Ticks(max) => ticks >= max,
            Budget::WallClock(limit) => started.elapsed() >= limit,
        };
        if exhausted {
            return ProbeResult {
                outcome: Outcome::TimedOut,
                ticks,
            };
        }
    }
}
