//! Search and generation settings
//!
//! Every field has a default, so a settings file only needs the values it
//! changes. Loaded from JSON.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{GOAL_RADIUS, MAX_INITIAL_MAGNITUDE};
use crate::error::Error;
use crate::oracle::Budget;

/// Per-probe termination budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Wall-clock cap for one simulated flight (milliseconds)
    pub timeout_ms: u64,
    /// When set, probes stop after this many ticks instead of on the clock
    pub max_ticks: Option<u64>,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 10,
            max_ticks: None,
        }
    }
}

impl ProbeSettings {
    /// The budget each probe runs under
    pub fn budget(&self) -> Budget {
        match self.max_ticks {
            Some(ticks) => Budget::Ticks(ticks),
            None => Budget::WallClock(Duration::from_millis(self.timeout_ms)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Worker threads; rayon picks when unset
    pub threads: Option<usize>,
    /// Overall cap on one enumeration (seconds)
    pub ceiling_secs: u64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            threads: None,
            ceiling_secs: 3600,
        }
    }
}

impl SolverSettings {
    pub fn ceiling(&self) -> Duration {
        Duration::from_secs(self.ceiling_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// Random launches tried per level
    pub samples: u32,
    /// Tick budget for each sampled launch
    pub max_ticks: u64,
    /// Minimum distance from every viewport edge (screen coordinates)
    pub edge_margin: f64,
    /// Extra gap kept between a goal and every body's surface
    pub body_clearance: f64,
    pub goal_radius: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            samples: 1000,
            max_ticks: 10_000,
            edge_margin: 100.0,
            body_clearance: 10.0,
            goal_radius: GOAL_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Levels generated before giving up on goal placement
    pub max_attempts: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self { max_attempts: 25 }
    }
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Longest launch drag considered by the solver and placement
    pub max_magnitude: f64,
    pub probe: ProbeSettings,
    pub solver: SolverSettings,
    pub placement: PlacementSettings,
    pub generator: GeneratorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_magnitude: MAX_INITIAL_MAGNITUDE,
            probe: ProbeSettings::default(),
            solver: SolverSettings::default(),
            placement: PlacementSettings::default(),
            generator: GeneratorSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let settings = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.max_magnitude, 300.0);
        assert_eq!(s.probe.budget(), Budget::WallClock(Duration::from_millis(10)));
        assert_eq!(s.solver.ceiling(), Duration::from_secs(3600));
        assert_eq!(s.placement.samples, 1000);
        assert_eq!(s.generator.max_attempts, 25);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{"probe": {"max_ticks": 1500}, "solver": {"threads": 2}}"#)
            .unwrap();
        assert_eq!(s.probe.budget(), Budget::Ticks(1500));
        assert_eq!(s.solver.threads, Some(2));
        assert_eq!(s.solver.ceiling_secs, 3600);
        assert_eq!(s.placement, PlacementSettings::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut s = Settings::default();
        s.max_magnitude = 50.0;
        s.placement.edge_margin = 80.0;
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(Settings::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
