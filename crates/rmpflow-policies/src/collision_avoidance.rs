//! Collision-avoidance policy.
//!
//! A one-dimensional barrier task embedded in the engine's fixed 2-D
//! representation: the first task coordinate is the normalized clearance
//! `x = ‖q − center‖/r − 1` (zero at the obstacle boundary), the second is
//! identically zero.  Repulsion grows without bound as the clearance
//! approaches zero and is negligible beyond a few radii; the metric grows
//! with proximity *and* approach rate, so in fusion avoidance dominates
//! exactly when a collision is imminent and cedes authority otherwise.

use nalgebra::{Matrix2, Vector2};
use rmpflow_core::policy::{Policy, TaskMap};
use rmpflow_types::{ObstacleParams, TaskState};

/// Floor of the velocity weight `u = ε + min(0, ẋ)·ẋ`; keeps the metric
/// positive while making a static or receding obstacle nearly weightless.
const VELOCITY_FLOOR: f64 = 1e-8;

/// The barrier is evaluated at no less than this clearance, so a body at or
/// inside the boundary sees a large but finite push.
const MIN_CLEARANCE: f64 = 1e-3;

const FORCE_LIMIT: f64 = 1e10;
const METRIC_LIMIT: f64 = 1e5;

/// Stay clear of one circular obstacle.
///
/// Multiple obstacles are sibling leaves; their pulled-back pairs sum, so
/// combined avoidance is a superposition, not a max/min selection.
pub struct CollisionAvoidance {
    params: ObstacleParams,
}

impl CollisionAvoidance {
    /// Create an avoidance leaf.  A non-positive radius is clamped up to a
    /// point-like obstacle rather than rejected.
    pub fn new(mut params: ObstacleParams) -> Self {
        params.radius = params.radius.max(MIN_CLEARANCE);
        Self { params }
    }

    /// Obstacle center in configuration space.
    pub fn center(&self) -> Vector2<f64> {
        self.params.center
    }

    /// Obstacle radius.
    pub fn radius(&self) -> f64 {
        self.params.radius
    }

    /// Barrier weight `w = x⁻ᵖ` and its gradient, saturated at
    /// [`MIN_CLEARANCE`].
    fn barrier(&self, clearance: f64) -> (f64, f64) {
        let x = clearance.max(MIN_CLEARANCE);
        let w = x.powf(-self.params.decay);
        let grad_w = -self.params.decay * x.powf(-(self.params.decay + 1.0));
        (w, grad_w)
    }
}

impl TaskMap for CollisionAvoidance {
    fn psi(&self, q: &Vector2<f64>) -> Vector2<f64> {
        let distance = (q - self.params.center).norm();
        Vector2::new(distance / self.params.radius - 1.0, 0.0)
    }

    fn jacobian(&self, q: &Vector2<f64>) -> Matrix2<f64> {
        let offset = q - self.params.center;
        let distance = offset.norm();
        if distance < MIN_CLEARANCE {
            // At the center no outward direction exists; a zero Jacobian
            // makes the pullback discard this leaf for the tick.
            return Matrix2::zeros();
        }
        let row = offset / (distance * self.params.radius);
        Matrix2::new(row.x, row.y, 0.0, 0.0)
    }

    fn jacobian_dot(&self, q: &Vector2<f64>, q_dot: &Vector2<f64>) -> Matrix2<f64> {
        let offset = q - self.params.center;
        let distance = offset.norm();
        if distance < MIN_CLEARANCE {
            return Matrix2::zeros();
        }
        let outward = offset / distance;
        // Only the tangential part of the motion turns the radial direction.
        let tangential = q_dot - outward * outward.dot(q_dot);
        let row = tangential / (distance * self.params.radius);
        Matrix2::new(row.x, row.y, 0.0, 0.0)
    }
}

impl Policy for CollisionAvoidance {
    fn desired_force(&mut self, state: &TaskState, _dt: f64) -> Vector2<f64> {
        let clearance = state.position.x;
        let approach = state.velocity.x;
        let (w, grad_w) = self.barrier(clearance);
        let u = VELOCITY_FLOOR + approach.min(0.0) * approach;
        // Repulsion descends the barrier potential; the curvature term and
        // approach damping keep the braking consistent with the metric.
        let curvature = 0.5 * approach * approach * u * grad_w;
        let force = -self.params.repulsion * w * grad_w
            - curvature
            - self.params.damping * w * u * approach;
        Vector2::new(force.clamp(-FORCE_LIMIT, FORCE_LIMIT), 0.0)
    }

    fn metric(&self, state: &TaskState) -> Matrix2<f64> {
        let clearance = state.position.x;
        let approach = state.velocity.x;
        let (w, _) = self.barrier(clearance);
        let u = VELOCITY_FLOOR + approach.min(0.0) * approach;
        let grad_u = 2.0 * approach.min(0.0);
        let weight = (w * u + 0.5 * approach * w * grad_u).clamp(0.0, METRIC_LIMIT);
        Matrix2::new(weight, 0.0, 0.0, 0.0)
    }
}
