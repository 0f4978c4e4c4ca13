//! `rmpflow-types` – shared data model for the RMP fusion engine.
//!
//! The engine combines independently-authored control objectives by having
//! every tree node exchange exactly two things with its parent:
//!
//! - a [`TaskState`] – where the node's task space currently is and how fast
//!   it is moving, recomputed from the parent's state every tick;
//! - a [`ForceMetric`] – the node's desired force together with the metric
//!   that says how strongly that desire should weigh in the fused result.
//!
//! Everything here is a plain value type over fixed-size `nalgebra`
//! vectors/matrices; nothing allocates in the per-tick hot path.

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// TaskState
// ────────────────────────────────────────────────────────────────────────────

/// A node's position and velocity expressed in its own task space.
///
/// Produced by the downward pass: `x = ψ(parent.x)`, `ẋ = J · parent.ẋ`.
/// Never persisted across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskState {
    /// Task-space position.
    pub position: Vector2<f64>,
    /// Task-space velocity.
    pub velocity: Vector2<f64>,
}

impl TaskState {
    /// Create a task state from a position/velocity pair.
    pub fn new(position: Vector2<f64>, velocity: Vector2<f64>) -> Self {
        Self { position, velocity }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ForceMetric
// ────────────────────────────────────────────────────────────────────────────

/// A desired force and its importance metric, both in one node's task space.
///
/// The pair is in *natural form*: `force` already carries the metric's
/// weighting (`f = M·a` for a leaf that wants acceleration `a`).  `metric`
/// is symmetric positive-semidefinite by construction.  Pairs from sibling
/// nodes are combined by plain summation after being pulled back into the
/// common parent space, so every objective's vote is weighted by its own
/// declared authority.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceMetric {
    /// Desired force in this node's task space.
    pub force: Vector2<f64>,
    /// Importance metric (symmetric PSD) in this node's task space.
    pub metric: Matrix2<f64>,
}

impl ForceMetric {
    /// Create a pair from its parts.
    pub fn new(force: Vector2<f64>, metric: Matrix2<f64>) -> Self {
        Self { force, metric }
    }

    /// The additive identity: zero force, zero metric.
    pub fn zero() -> Self {
        Self {
            force: Vector2::zeros(),
            metric: Matrix2::zeros(),
        }
    }

    /// Pull this pair back through a task map into the parent's space.
    ///
    /// `j` and `j_dot` are the task map's Jacobian and its time derivative,
    /// evaluated at the parent's state; `parent_velocity` is the velocity of
    /// the space being pulled back *into*.  This is the standard Riemannian
    /// pullback:
    ///
    /// ```text
    /// f' = Jᵀ · (f − M · J̇ · q̇)
    /// M' = Jᵀ · M · J
    /// ```
    pub fn pulled_back(
        &self,
        j: &Matrix2<f64>,
        j_dot: &Matrix2<f64>,
        parent_velocity: &Vector2<f64>,
    ) -> Self {
        let jt = j.transpose();
        Self {
            force: jt * (self.force - self.metric * j_dot * parent_velocity),
            metric: jt * self.metric * j,
        }
    }
}

impl std::ops::Add for ForceMetric {
    type Output = ForceMetric;

    fn add(self, rhs: ForceMetric) -> ForceMetric {
        ForceMetric {
            force: self.force + rhs.force,
            metric: self.metric + rhs.metric,
        }
    }
}

impl std::ops::AddAssign for ForceMetric {
    fn add_assign(&mut self, rhs: ForceMetric) {
        self.force += rhs.force;
        self.metric += rhs.metric;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tuning parameters
// ────────────────────────────────────────────────────────────────────────────

/// Gains for the path-following policy.
///
/// Longitudinal control is a PI loop on progress rate against
/// `target_speed`, capped by the braking bound
/// `min(target_speed, sqrt(2 · max_accel · remaining))`.  Lateral control is
/// a PD loop back onto the centerline.  `k` and `h` set the fixed diagonal
/// metric `diag(k·sin(h·π/2), k·cos(h·π/2))`: `h` trades authority between
/// holding speed (`h → 1`) and holding the line (`h → 0`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathGains {
    /// Cruise speed along the path (units/s).
    #[serde(default = "default_target_speed")]
    pub target_speed: f64,
    /// Proportional gain on the progress-rate error.
    #[serde(default = "default_unit_gain")]
    pub p: f64,
    /// Integral gain on the accumulated progress-rate error.
    #[serde(default)]
    pub i: f64,
    /// Proportional gain on lateral deviation.
    #[serde(default = "default_unit_gain")]
    pub a: f64,
    /// Damping gain on lateral rate.
    #[serde(default = "default_unit_gain")]
    pub b: f64,
    /// Overall metric scale.
    #[serde(default = "default_unit_gain")]
    pub k: f64,
    /// Fore/side authority split, in `[0, 1]`.
    #[serde(default = "default_authority_split")]
    pub h: f64,
    /// Maximum deceleration assumed by the braking cap (units/s²).
    #[serde(default = "default_max_accel")]
    pub max_accel: f64,
}

impl Default for PathGains {
    fn default() -> Self {
        Self {
            target_speed: default_target_speed(),
            p: default_unit_gain(),
            i: 0.0,
            a: default_unit_gain(),
            b: default_unit_gain(),
            k: default_unit_gain(),
            h: default_authority_split(),
            max_accel: default_max_accel(),
        }
    }
}

fn default_target_speed() -> f64 {
    5.0
}
fn default_unit_gain() -> f64 {
    1.0
}
fn default_authority_split() -> f64 {
    0.5
}
fn default_max_accel() -> f64 {
    2.0
}

/// A circular obstacle and the gains of its repulsive barrier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleParams {
    /// Obstacle center in configuration space.
    pub center: Vector2<f64>,
    /// Obstacle radius; the barrier force grows without bound as the
    /// distance to `center` approaches it.
    pub radius: f64,
    /// Repulsion strength.
    #[serde(default = "default_unit_gain")]
    pub repulsion: f64,
    /// Decay exponent: how fast repulsion falls off with normalized
    /// clearance (larger ⇒ shorter influence range).
    #[serde(default = "default_decay")]
    pub decay: f64,
    /// Damping gain on the approach rate.
    #[serde(default = "default_unit_gain")]
    pub damping: f64,
}

fn default_decay() -> f64 {
    4.0
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Construction-time tree errors.
///
/// These are the only fatal errors in the engine: a malformed tree is
/// rejected while it is being assembled, and `solve` itself never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("unknown parent node `{parent}` while attaching `{child}`")]
    UnknownParent { parent: String, child: String },

    #[error("a node named `{0}` already exists in the tree")]
    DuplicateName(String),

    #[error("`{parent}` is a policy leaf and cannot parent `{child}`")]
    LeafParent { parent: String, child: String },
}
