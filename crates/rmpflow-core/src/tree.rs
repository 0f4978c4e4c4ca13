//! The policy tree and the two-phase fusion pass.
//!
//! One `solve` call walks the tree twice.  Downward, every node computes
//! its own [`TaskState`] from its parent's via its task map.  Upward,
//! every leaf emits a (force, metric) pair in its own task space; each
//! pair is pulled back through the node's Jacobian into the parent's
//! space and summed with its siblings'.  Summation is associative and
//! commutative, so child order never matters.  At the root the combined
//! metric is inverted against the combined force to produce the one
//! commanded acceleration.

use nalgebra::{Matrix2, Vector2};
use rmpflow_types::{ForceMetric, TaskState};
use tracing::{trace, warn};

use crate::policy::{Policy, TaskMap};

/// Singular values at or below this are treated as unsupported directions
/// when pseudo-inverting the root metric.
const PINV_TOLERANCE: f64 = 1e-10;

/// Tikhonov damping added to the root metric when the pseudo-inverse
/// fails or yields a non-finite acceleration.
const DAMPING: f64 = 1e-6;

/// A node of the policy tree.
///
/// Leaves terminate the recursion with their policy's control law;
/// fusion nodes aggregate their children.  Leaves deliberately have no
/// child collection at all – attaching a child under one is rejected at
/// build time.
pub enum RmpNode {
    /// Internal node: owns a task map and aggregates its children's
    /// pulled-back pairs in its own space.
    Fusion {
        name: String,
        map: Box<dyn TaskMap>,
        children: Vec<RmpNode>,
    },
    /// Terminal node: a policy and nothing else.
    Leaf { name: String, policy: Box<dyn Policy> },
}

impl RmpNode {
    /// The node's diagnostic name.
    pub fn name(&self) -> &str {
        match self {
            RmpNode::Fusion { name, .. } => name,
            RmpNode::Leaf { name, .. } => name,
        }
    }

    /// Compute this node's (force, metric) pair and pull it back into the
    /// parent's space.
    ///
    /// `parent_state` is the parent's task-space state for this tick;
    /// `dt` is threaded through to the leaf control laws.
    pub(crate) fn pulled_force_metric(
        &mut self,
        parent_state: &TaskState,
        dt: f64,
    ) -> ForceMetric {
        match self {
            RmpNode::Leaf { name, policy } => {
                let j = policy.jacobian(&parent_state.position);
                let j_dot = policy.jacobian_dot(&parent_state.position, &parent_state.velocity);
                let state = TaskState::new(
                    policy.psi(&parent_state.position),
                    j * parent_state.velocity,
                );
                let pair = ForceMetric::new(
                    policy.desired_force(&state, dt),
                    policy.metric(&state),
                );
                trace!(leaf = %name, force = ?pair.force, "leaf evaluated");
                pair.pulled_back(&j, &j_dot, &parent_state.velocity)
            }
            RmpNode::Fusion { map, children, .. } => {
                let j = map.jacobian(&parent_state.position);
                let j_dot = map.jacobian_dot(&parent_state.position, &parent_state.velocity);
                let state = TaskState::new(
                    map.psi(&parent_state.position),
                    j * parent_state.velocity,
                );
                let combined = children
                    .iter_mut()
                    .fold(ForceMetric::zero(), |acc, child| {
                        acc + child.pulled_force_metric(&state, dt)
                    });
                combined.pulled_back(&j, &j_dot, &parent_state.velocity)
            }
        }
    }
}

/// The distinguished node living in configuration space.
///
/// Built once via [`RmpTreeBuilder`][crate::builder::RmpTreeBuilder],
/// then driven with [`RmpRoot::solve`] every control tick.  The root's
/// task map is the identity, so the aggregated pair is already in
/// configuration space.
pub struct RmpRoot {
    name: String,
    children: Vec<RmpNode>,
}

impl RmpRoot {
    pub(crate) fn new(name: String, children: Vec<RmpNode>) -> Self {
        Self { name, children }
    }

    /// The root's diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fuse every policy's opinion into one commanded acceleration.
    ///
    /// `position`/`velocity` are the configuration-space state, `dt` the
    /// tick duration in seconds.  One complete downward-then-upward tree
    /// traversal; no allocation, no failure path.  A singular or
    /// ill-conditioned combined metric degrades to "no commanded
    /// acceleration from the unsupported subspace" – never `NaN`, never a
    /// panic, because a control loop cannot tolerate either mid-cycle.
    pub fn solve(
        &mut self,
        position: Vector2<f64>,
        velocity: Vector2<f64>,
        dt: f64,
    ) -> Vector2<f64> {
        let state = TaskState::new(position, velocity);
        let combined = self
            .children
            .iter_mut()
            .fold(ForceMetric::zero(), |acc, child| {
                acc + child.pulled_force_metric(&state, dt)
            });
        let accel = Self::resolve(&combined);
        trace!(root = %self.name, accel = ?accel, "tick solved");
        accel
    }

    /// Invert the combined metric against the combined force.
    ///
    /// SVD pseudo-inverse first: directions without metric support simply
    /// contribute nothing.  If the decomposition fails or the result is
    /// non-finite, retry with Tikhonov damping `(M + λI)⁻¹`.
    fn resolve(pair: &ForceMetric) -> Vector2<f64> {
        if let Ok(pinv) = pair.metric.pseudo_inverse(PINV_TOLERANCE) {
            let accel = pinv * pair.force;
            if accel.iter().all(|a| a.is_finite()) {
                return accel;
            }
        }
        warn!(metric = ?pair.metric, "root metric pseudo-inverse failed; applying damped inverse");
        let damped = pair.metric + Matrix2::identity() * DAMPING;
        match damped.try_inverse() {
            Some(inv) => {
                let accel = inv * pair.force;
                if accel.iter().all(|a| a.is_finite()) {
                    accel
                } else {
                    Vector2::zeros()
                }
            }
            None => Vector2::zeros(),
        }
    }
}
