//! Constant-curvature arc path provider.

use std::f64::consts::TAU;

use nalgebra::Vector2;

use crate::{DEGENERATE_LENGTH, Path};

/// A circular arc of fixed radius about `center`.
///
/// The arc starts at polar angle `start_angle` (measured from the center)
/// and spans `sweep` radians, counter-clockwise when `sweep` is positive.
/// Progress runs along the arc, so `length = radius · |sweep|` and the
/// signed curvature is `±1/radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularArc {
    center: Vector2<f64>,
    radius: f64,
    start_angle: f64,
    sweep: f64,
}

impl CircularArc {
    /// Create an arc.  A non-positive radius or an empty sweep yields a
    /// degenerate (zero-length) path anchored at the start point.
    pub fn new(center: Vector2<f64>, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            start_angle,
            sweep,
        }
    }

    fn turn(&self) -> f64 {
        self.sweep.signum()
    }

    /// Polar angle about the center at progress `c`.
    fn angle_at(&self, c: f64) -> f64 {
        if self.length() < DEGENERATE_LENGTH {
            return self.start_angle;
        }
        self.start_angle + self.turn() * c.clamp(0.0, self.length()) / self.radius
    }
}

impl Path for CircularArc {
    fn progress(&self, point: &Vector2<f64>) -> f64 {
        let len = self.length();
        if len < DEGENERATE_LENGTH {
            return 0.0;
        }
        let offset = point - self.center;
        if offset.norm() < DEGENERATE_LENGTH {
            // The center is equidistant from the whole arc; no projection
            // direction is defined.
            return 0.0;
        }
        // Angle traveled from the start, unwound in the sweep direction.
        let phi = offset.y.atan2(offset.x);
        let traveled = (self.turn() * (phi - self.start_angle)).rem_euclid(TAU);
        if traveled <= self.sweep.abs() {
            (traveled * self.radius).min(len)
        } else {
            // Off the arc: snap to whichever endpoint is angularly nearer.
            let beyond_end = traveled - self.sweep.abs();
            let before_start = TAU - traveled;
            if beyond_end <= before_start { len } else { 0.0 }
        }
    }

    fn position(&self, c: f64) -> Vector2<f64> {
        let a = self.angle_at(c);
        self.center + Vector2::new(a.cos(), a.sin()) * self.radius
    }

    fn rotation(&self, c: f64) -> f64 {
        self.angle_at(c) + self.turn() * std::f64::consts::FRAC_PI_2
    }

    fn angular_velocity(&self, _c: f64) -> f64 {
        if self.length() < DEGENERATE_LENGTH {
            0.0
        } else {
            self.turn() / self.radius
        }
    }

    fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }
}
