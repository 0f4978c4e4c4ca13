//! The task-map and policy traits: the seam new objectives plug into.

use nalgebra::{Matrix2, Vector2};
use rmpflow_types::TaskState;

/// A smooth map `ψ` from a parent space into a node's own task space,
/// together with its Jacobian and the Jacobian's time derivative.
///
/// The fusion pass uses `psi`/`jacobian` on the way down to compute each
/// node's [`TaskState`], and `jacobian`/`jacobian_dot` on the way up for
/// the Riemannian pullback.  Implementations must be pure functions of
/// their arguments.
pub trait TaskMap {
    /// Map a parent-space position into this task space.
    fn psi(&self, q: &Vector2<f64>) -> Vector2<f64>;

    /// Jacobian of `psi` at the parent-space position `q`.
    fn jacobian(&self, q: &Vector2<f64>) -> Matrix2<f64>;

    /// Time derivative of the Jacobian along the parent-space trajectory
    /// `(q, q̇)`.
    fn jacobian_dot(&self, q: &Vector2<f64>, q_dot: &Vector2<f64>) -> Matrix2<f64>;
}

/// The identity task map, for nodes that live directly in their parent's
/// coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMap;

impl TaskMap for IdentityMap {
    fn psi(&self, q: &Vector2<f64>) -> Vector2<f64> {
        *q
    }

    fn jacobian(&self, _q: &Vector2<f64>) -> Matrix2<f64> {
        Matrix2::identity()
    }

    fn jacobian_dot(&self, _q: &Vector2<f64>, _q_dot: &Vector2<f64>) -> Matrix2<f64> {
        Matrix2::zeros()
    }
}

/// A terminal control objective.
///
/// A policy owns its task map and, given its current task-space state,
/// declares a desired force and an importance metric.  The force is in
/// *natural form* (`M·a` for a policy that wants acceleration `a`); the
/// metric must be symmetric positive-semidefinite – directions with larger
/// singular values claim more authority in the fused result.
///
/// `dt` is the tick duration threaded down from `solve`, so policies with
/// cross-tick memory (integral terms) stay deterministic and replayable;
/// `&mut self` exists solely for that memory.
pub trait Policy: TaskMap {
    /// Desired force in this policy's task space.
    fn desired_force(&mut self, state: &TaskState, dt: f64) -> Vector2<f64>;

    /// Importance metric in this policy's task space.
    fn metric(&self, state: &TaskState) -> Matrix2<f64>;
}
