//! Level descriptions
//!
//! The plain-data form of a level as exchanged with loaders and writers.
//! Colors are carried for round trips but never reach the simulation. Moon
//! angles are in degrees; a body without a mass weighs its radius.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sim::{Ball, Blockage, Geometry, Goal, GravityBody, Level, Point2d, WarpPoint};

fn default_ball_radius() -> f64 {
    3.0
}

fn default_gravity_strength() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallDescription {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_ball_radius")]
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonDescription {
    /// Starting phase in degrees
    pub angle: f64,
    /// Distance from the parent's center
    pub distance: f64,
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDescription {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    #[serde(default)]
    pub reflector: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moons: Vec<MoonDescription>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarpDescription {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockageDescription {
    pub x: f64,
    pub y: f64,
    pub half_width: f64,
    pub half_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalDescription {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// A whole level; warp order is the teleport cycle order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    pub ball: BallDescription,
    #[serde(default)]
    pub bodies: Vec<BodyDescription>,
    #[serde(default)]
    pub warps: Vec<WarpDescription>,
    #[serde(default)]
    pub blockages: Vec<BlockageDescription>,
    #[serde(default)]
    pub goals: Vec<GoalDescription>,
    /// 0 disables camera following
    #[serde(default)]
    pub follow_factor: f64,
    #[serde(default = "default_gravity_strength")]
    pub gravity_strength: f64,
}

impl LevelDescription {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let description = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::debug!(
            "Loaded level from {}: {} bodies, {} goals",
            path.display(),
            description.bodies.len(),
            description.goals.len()
        );
        Ok(description)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the playable level
    pub fn to_level(&self) -> Level {
        let g = self.gravity_strength;
        let bodies = self
            .bodies
            .iter()
            .map(|b| {
                let body = GravityBody::new(Point2d::new(b.x, b.y), b.radius)
                    .with_mass(b.mass.unwrap_or(b.radius))
                    .with_reflector(b.reflector);
                b.moons.iter().fold(body, |body, m| {
                    body.with_moon(m.angle, m.distance, m.radius, g)
                })
            })
            .collect();

        let geometry = Geometry {
            bodies,
            blockages: self
                .blockages
                .iter()
                .map(|b| Blockage::new(Point2d::new(b.x, b.y), b.half_width, b.half_height))
                .collect(),
            warps: self
                .warps
                .iter()
                .map(|w| WarpPoint::new(Point2d::new(w.x, w.y)))
                .collect(),
            goals: self
                .goals
                .iter()
                .map(|goal| Goal::new(Point2d::new(goal.x, goal.y), goal.radius))
                .collect(),
            gravity_strength: g,
            follow_factor: self.follow_factor,
        };
        let ball = Ball::new(Point2d::new(self.ball.x, self.ball.y), self.ball.radius);
        Level::new(ball, geometry)
    }
}

impl From<&LevelDescription> for Level {
    fn from(description: &LevelDescription) -> Self {
        description.to_level()
    }
}

impl From<LevelDescription> for Level {
    fn from(description: LevelDescription) -> Self {
        description.to_level()
    }
}

impl From<&Level> for LevelDescription {
    /// Describe the level as it was built; flight state is not recorded
    fn from(level: &Level) -> Self {
        let geometry = level.geometry();
        let ball = level.ball();
        Self {
            ball: BallDescription {
                x: ball.starting_position.x,
                y: ball.starting_position.y,
                radius: ball.radius,
                color: None,
            },
            bodies: geometry
                .bodies
                .iter()
                .map(|b| BodyDescription {
                    x: b.center.x,
                    y: b.center.y,
                    radius: b.radius,
                    color: None,
                    mass: (b.mass != b.radius).then_some(b.mass),
                    reflector: b.reflector,
                    moons: b
                        .moons
                        .iter()
                        .map(|m| MoonDescription {
                            angle: m.starting_angle.to_degrees(),
                            distance: m.distance,
                            radius: m.radius,
                            color: None,
                        })
                        .collect(),
                })
                .collect(),
            warps: geometry
                .warps
                .iter()
                .map(|w| WarpDescription {
                    x: w.center.x,
                    y: w.center.y,
                })
                .collect(),
            blockages: geometry
                .blockages
                .iter()
                .map(|b| BlockageDescription {
                    x: b.center.x,
                    y: b.center.y,
                    half_width: b.half_width,
                    half_height: b.half_height,
                    color: None,
                })
                .collect(),
            goals: geometry
                .goals
                .iter()
                .map(|g| GoalDescription {
                    x: g.center.x,
                    y: g.center.y,
                    radius: g.radius,
                })
                .collect(),
            follow_factor: geometry.follow_factor,
            gravity_strength: geometry.gravity_strength,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"{
        "ball": {"x": 100, "y": 100, "color": "red"},
        "bodies": [
            {"x": 300, "y": 100, "radius": 50, "color": "blue",
             "moons": [{"angle": 90, "distance": 120, "radius": 8}]},
            {"x": 600, "y": 400, "radius": 30, "mass": 90, "reflector": true}
        ],
        "warps": [{"x": 700, "y": 100}, {"x": 200, "y": 500}],
        "blockages": [{"x": 500, "y": 600, "half_width": 80, "half_height": 10}],
        "goals": [{"x": 300, "y": 40, "radius": 15}],
        "follow_factor": 5.0
    }"#;

    #[test]
    fn test_defaults_and_conversion() {
        let description = LevelDescription::from_json(LEVEL).unwrap();
        assert_eq!(description.ball.radius, 3.0);
        assert_eq!(description.gravity_strength, 1.0);

        let level = Level::from(&description);
        let geometry = level.geometry();
        assert_eq!(geometry.bodies[0].mass, 50.0);
        assert_eq!(geometry.bodies[1].mass, 90.0);
        assert!(geometry.bodies[1].reflector);
        assert_eq!(geometry.moon_count(), 1);
        let moon = &geometry.bodies[0].moons[0];
        assert!((moon.starting_angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(geometry.warps[1].center, Point2d::new(200.0, 500.0));
        assert_eq!(geometry.blockages[0].width(), 160.0);
        assert_eq!(level.ball().center, Point2d::new(100.0, 100.0));
    }

    #[test]
    fn test_level_roundtrip_drops_only_colors() {
        let description = LevelDescription::from_json(LEVEL).unwrap();
        let back = LevelDescription::from(&description.to_level());
        assert_eq!(back.ball.color, None);
        assert_eq!(back.bodies[0].mass, None);
        assert_eq!(back.bodies[1].mass, Some(90.0));
        assert!((back.bodies[0].moons[0].angle - 90.0).abs() < 1e-9);
        assert_eq!(back.warps, description.warps);
        assert_eq!(back.goals, description.goals);
        assert_eq!(back.blockages, description.blockages);
        assert_eq!(back.follow_factor, 5.0);
    }

    #[test]
    fn test_missing_ball_is_rejected() {
        assert!(matches!(
            LevelDescription::from_json(r#"{"bodies": []}"#),
            Err(Error::Json(_))
        ));
    }
}
