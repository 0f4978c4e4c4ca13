//! Scenario files – a TOML description of one control run.
//!
//! A scenario names the route, the follower gains, any obstacles, and the
//! simulation settings.  Every field is optional; omissions fall back to
//! the built-in default scenario (a straight 100-unit segment with one
//! obstacle sitting on it).

use std::fs;
use std::path::Path;

use rmpflow_types::{ObstacleParams, PathGains};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A complete run description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// The route to follow.
    #[serde(default)]
    pub path: PathSpec,

    /// Path-follower gains.
    #[serde(default)]
    pub gains: PathGains,

    /// Obstacles to avoid (`[[obstacle]]` tables).
    #[serde(default, rename = "obstacle")]
    pub obstacles: Vec<ObstacleParams>,

    /// Control-loop settings.
    #[serde(default)]
    pub sim: SimSettings,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            path: PathSpec::Segment(SegmentSpec::default()),
            gains: PathGains {
                h: 0.9,
                ..PathGains::default()
            },
            obstacles: vec![ObstacleParams {
                center: nalgebra::Vector2::new(50.0, 0.0),
                radius: 10.0,
                repulsion: 1.0,
                decay: 4.0,
                damping: 1.0,
            }],
            sim: SimSettings::default(),
        }
    }
}

/// The route description: a straight segment or a circular arc.
///
/// The two table shapes are told apart structurally – an arc names all
/// four of its fields, a segment at most `start`/`goal`.  An empty
/// `[path]` table is the default segment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSpec {
    Arc(ArcSpec),
    Segment(SegmentSpec),
}

impl Default for PathSpec {
    fn default() -> Self {
        PathSpec::Segment(SegmentSpec::default())
    }
}

/// Endpoints of a straight segment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SegmentSpec {
    #[serde(default = "default_path_start")]
    pub start: [f64; 2],
    #[serde(default = "default_path_goal")]
    pub goal: [f64; 2],
}

impl Default for SegmentSpec {
    fn default() -> Self {
        Self {
            start: default_path_start(),
            goal: default_path_goal(),
        }
    }
}

/// A constant-curvature arc: center, radius, polar start angle, and the
/// signed sweep in radians (counter-clockwise positive).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArcSpec {
    pub center: [f64; 2],
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

/// Control-loop settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimSettings {
    /// Tick duration in seconds.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Give up after this many ticks.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: usize,
    /// The run ends when the body is within this distance of the goal.
    #[serde(default = "default_goal_tolerance")]
    pub goal_tolerance: f64,
    /// Where the body starts, which need not be on the route.
    #[serde(default = "default_spawn")]
    pub spawn: [f64; 2],
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            max_ticks: default_max_ticks(),
            goal_tolerance: default_goal_tolerance(),
            spawn: default_spawn(),
        }
    }
}

fn default_path_start() -> [f64; 2] {
    [0.0, 0.0]
}
fn default_path_goal() -> [f64; 2] {
    [100.0, 0.0]
}
fn default_dt() -> f64 {
    0.01
}
fn default_max_ticks() -> usize {
    100_000
}
fn default_goal_tolerance() -> f64 {
    0.5
}
fn default_spawn() -> [f64; 2] {
    [0.0, 5.0]
}

/// Scenario loading failures.  The caller falls back to the default
/// scenario; a bad file never aborts the binary.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load a scenario from a TOML file.
pub fn load(path: &Path) -> Result<Scenario, ScenarioError> {
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}
