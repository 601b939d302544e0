//! Parallel solution enumerator
//!
//! Finds every integer launch point that wins a level. The bounding square of
//! the launch disc is cut into one column strip per integer x; strips run on a
//! rayon pool with no shared mutable state beyond a cancellation flag, and
//! their local hits are merged into a set at the end.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::error::Error;
use crate::oracle::{self, Budget};
use crate::settings::Settings;
use crate::sim::{IntPoint, Level, Point2d};

/// Winning launch points found for a level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolutionSet {
    pub points: HashSet<IntPoint>,
    /// False when the ceiling expired before every strip finished; the
    /// points are then a lower bound
    pub complete: bool,
}

impl SolutionSet {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, point: IntPoint) -> bool {
        self.points.contains(&point)
    }

    /// Points in (x, y) order
    pub fn sorted(&self) -> Vec<IntPoint> {
        let mut points: Vec<_> = self.points.iter().copied().collect();
        points.sort();
        points
    }
}

/// The search area for one level: the launch disc intersected with the
/// playfield as seen at the moment the search starts
#[derive(Debug, Clone)]
struct Search<'a> {
    level: &'a Level,
    center: Point2d,
    max_magnitude: f64,
    budget: Budget,
}

impl<'a> Search<'a> {
    fn new(level: &'a Level, max_magnitude: f64, budget: Budget) -> Self {
        Self {
            level,
            center: level.ball().center,
            max_magnitude,
            budget,
        }
    }

    fn columns(&self) -> std::ops::RangeInclusive<i32> {
        let lo = (self.center.x - self.max_magnitude).floor() as i32;
        let hi = (self.center.x + self.max_magnitude).ceil() as i32;
        lo..=hi
    }

    fn rows(&self) -> std::ops::RangeInclusive<i32> {
        let lo = (self.center.y - self.max_magnitude).floor() as i32;
        let hi = (self.center.y + self.max_magnitude).ceil() as i32;
        lo..=hi
    }

    fn is_candidate(&self, point: Point2d) -> bool {
        point.distance_squared(self.center) <= self.max_magnitude * self.max_magnitude
            && !self.level.is_point_out_of_bounds(point)
    }

    /// Probe every candidate in column `x`; stops early once `deadline` passes
    fn strip(&self, x: i32, deadline: Option<Instant>, cancelled: &AtomicBool) -> Vec<IntPoint> {
        // One private copy per strip; probes clone from it again
        let level = self.level.snapshot();
        let mut wins = Vec::new();
        for y in self.rows() {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                cancelled.store(true, Ordering::Relaxed);
                break;
            }
            let point = Point2d::new(f64::from(x), f64::from(y));
            if !self.is_candidate(point) {
                continue;
            }
            let result = oracle::probe(&level, point, self.max_magnitude, self.budget);
            if result.outcome.is_win() {
                wins.push(IntPoint::new(x, y));
            }
        }
        wins
    }
}

/// Enumerate winning launch points on a worker pool
///
/// Blocks until every strip finishes or the configured ceiling passes.
pub fn solve(level: &Level, settings: &Settings) -> Result<SolutionSet, Error> {
    let search = Search::new(level, settings.max_magnitude, settings.probe.budget());
    let columns: Vec<i32> = search.columns().collect();
    let started = Instant::now();
    // An unrepresentable ceiling means no ceiling
    let deadline = started.checked_add(settings.solver.ceiling());
    let cancelled = AtomicBool::new(false);

    log::info!(
        "Solving: {} strips around ({:.1}, {:.1}), max magnitude {}",
        columns.len(),
        search.center.x,
        search.center.y,
        search.max_magnitude
    );

    let run = || -> Vec<Vec<IntPoint>> {
        columns
            .par_iter()
            .map(|&x| search.strip(x, deadline, &cancelled))
            .collect()
    };
    let strips = match settings.solver.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            pool.install(run)
        }
        None => run(),
    };

    let points: HashSet<IntPoint> = strips.into_iter().flatten().collect();
    let complete = !cancelled.load(Ordering::Relaxed);
    if complete {
        log::info!(
            "Found {} solutions in {:.2?}",
            points.len(),
            started.elapsed()
        );
    } else {
        log::warn!(
            "Ceiling of {:?} expired; returning {} solutions found so far",
            settings.solver.ceiling(),
            points.len()
        );
    }
    Ok(SolutionSet { points, complete })
}

/// Single-threaded sweep over the same candidates as [`solve`], without a ceiling
pub fn solve_sequential(level: &Level, max_magnitude: f64, budget: Budget) -> SolutionSet {
    let search = Search::new(level, max_magnitude, budget);
    let mut points = HashSet::new();
    for x in search.columns() {
        for y in search.rows() {
            let point = Point2d::new(f64::from(x), f64::from(y));
            if search.is_candidate(point)
                && oracle::probe(level, point, max_magnitude, budget)
                    .outcome
                    .is_win()
            {
                points.insert(IntPoint::new(x, y));
            }
        }
    }
    SolutionSet {
        points,
        complete: true,
    }
}
