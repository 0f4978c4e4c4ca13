//! Path-following policy.
//!
//! Decomposes the planar position into path-aligned coordinates `(c, d)` –
//! progress along the route and lateral deviation from it – and runs a PI
//! loop on progress rate against a braking-limited target speed plus a PD
//! loop back onto the centerline.
//!
//! # Sign convention
//!
//! The task frame's lateral axis is the path's left normal, while `d`
//! carries the *opposite* sign (negative when the body is left of the
//! tangent).  The lateral law `A·d − B·ḋ` is therefore restoring with
//! damping that opposes the lateral rate.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Matrix2, Vector2};
use rmpflow_core::policy::{Policy, TaskMap};
use rmpflow_mapping::Path;
use rmpflow_types::{PathGains, TaskState};
use tracing::debug;

/// Follow a [`Path`] at a target speed while pulling onto its centerline.
///
/// The only node type with cross-tick memory: the longitudinal integral
/// accumulator.  One instance serves exactly one tree.
pub struct PathFollowing<P: Path> {
    path: P,
    gains: PathGains,
    k_fore: f64,
    k_side: f64,
    err: f64,
}

impl<P: Path> PathFollowing<P> {
    /// Create a follower for `path` with the given gains.
    ///
    /// The metric split is fixed at construction:
    /// `k_fore = k·sin(h·π/2)`, `k_side = k·cos(h·π/2)`, with `h` clamped
    /// into `[0, 1]` and `k` to non-negative so the metric stays PSD for
    /// any input.
    pub fn new(path: P, gains: PathGains) -> Self {
        let k = gains.k.max(0.0);
        let split = gains.h.clamp(0.0, 1.0) * FRAC_PI_2;
        let k_fore = k * split.sin();
        let k_side = k * split.cos();
        debug!(k_fore, k_side, "path follower configured");
        Self {
            path,
            k_fore,
            k_side,
            gains,
            err: 0.0,
        }
    }

    /// Clear the longitudinal integral accumulator.
    pub fn reset(&mut self) {
        self.err = 0.0;
    }

    /// Target speed at progress `c`: the cruise speed, capped so the path
    /// end can still be reached without exceeding `max_accel` of braking.
    fn target_speed(&self, c: f64) -> f64 {
        let remaining = (self.path.length() - c).max(0.0);
        self.gains
            .target_speed
            .min((2.0 * self.gains.max_accel * remaining).sqrt())
    }
}

impl<P: Path> TaskMap for PathFollowing<P> {
    fn psi(&self, q: &Vector2<f64>) -> Vector2<f64> {
        let c = self.path.progress(q);
        let on_path = self.path.position(c);
        let to_path = on_path - q;
        let theta = self.path.rotation(c);
        // Which side of the tangent the body lies on; zero offset means the
        // deviation is zero regardless of the sign.
        let side = -(theta - to_path.y.atan2(to_path.x)).sin().signum();
        Vector2::new(c, to_path.norm() * side)
    }

    fn jacobian(&self, q: &Vector2<f64>) -> Matrix2<f64> {
        // Rotation into path-aligned coordinates at the projected point.
        let theta = self.path.rotation(self.path.progress(q));
        Matrix2::new(theta.cos(), theta.sin(), -theta.sin(), theta.cos())
    }

    fn jacobian_dot(&self, q: &Vector2<f64>, q_dot: &Vector2<f64>) -> Matrix2<f64> {
        let c = self.path.progress(q);
        let theta = self.path.rotation(c);
        let off_path = q - self.path.position(c);
        let phi = off_path.y.atan2(off_path.x);
        // Progress rate along the tangent scales the frame's turn rate.
        let progress_rate = theta.cos() * q_dot.x + theta.sin() * q_dot.y;
        Matrix2::new(-theta.sin(), theta.cos(), -phi.sin(), phi.cos())
            * (progress_rate * self.path.angular_velocity(c))
    }
}

impl<P: Path> Policy for PathFollowing<P> {
    fn desired_force(&mut self, state: &TaskState, dt: f64) -> Vector2<f64> {
        let rate_error = self.target_speed(state.position.x) - state.velocity.x;
        if dt > 0.0 {
            self.err += rate_error * dt;
        }
        let mut fore = self.gains.p * rate_error + self.gains.i * self.err;
        if rate_error < 0.0 {
            // The proportional term alone tracks the braking curve from
            // above and crosses the path end at speed, so the full braking
            // deceleration is added as feed-forward.  It is rate-limited so
            // one tick never pushes the progress rate below its target and
            // reverses along the path.
            fore -= self.gains.max_accel;
            if dt > 0.0 {
                fore = fore.max(rate_error / dt);
            }
        }
        let accel = Vector2::new(
            fore,
            self.gains.a * state.position.y - self.gains.b * state.velocity.y,
        );
        self.metric(state) * accel
    }

    fn metric(&self, _state: &TaskState) -> Matrix2<f64> {
        Matrix2::new(self.k_fore, 0.0, 0.0, self.k_side)
    }
}
