//! Straight-segment path provider.

use nalgebra::Vector2;
use tracing::warn;

use crate::{DEGENERATE_LENGTH, Path};

/// A straight route from `start` to `end`.
///
/// Heading is constant and angular velocity is zero.  A segment whose
/// endpoints coincide is degenerate: every projection yields progress `0`
/// and every evaluation yields `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSegment {
    start: Vector2<f64>,
    length: f64,
    heading: f64,
    direction: Vector2<f64>,
}

impl LinearSegment {
    /// Create a segment between two points.
    pub fn new(start: Vector2<f64>, end: Vector2<f64>) -> Self {
        let span = end - start;
        let length = span.norm();
        let (heading, direction) = if length < DEGENERATE_LENGTH {
            warn!(?start, "degenerate segment; projections collapse onto the start point");
            (0.0, Vector2::zeros())
        } else {
            (span.y.atan2(span.x), span / length)
        };
        Self {
            start,
            length,
            heading,
            direction,
        }
    }
}

impl Path for LinearSegment {
    fn progress(&self, point: &Vector2<f64>) -> f64 {
        if self.length < DEGENERATE_LENGTH {
            return 0.0;
        }
        (point - self.start).dot(&self.direction).clamp(0.0, self.length)
    }

    fn position(&self, c: f64) -> Vector2<f64> {
        self.start + self.direction * c.clamp(0.0, self.length)
    }

    fn rotation(&self, _c: f64) -> f64 {
        self.heading
    }

    fn angular_velocity(&self, _c: f64) -> f64 {
        0.0
    }

    fn length(&self) -> f64 {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_the_orthogonal_projection() {
        let path = LinearSegment::new(Vector2::new(0.0, 0.0), Vector2::new(100.0, 0.0));
        // A point 5 units off the line projects straight down onto it.
        assert!((path.progress(&Vector2::new(30.0, 5.0)) - 30.0).abs() < 1e-12);
        assert!((path.progress(&Vector2::new(30.0, -5.0)) - 30.0).abs() < 1e-12);
    }

    #[test]
    fn progress_clamps_to_the_segment() {
        let path = LinearSegment::new(Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0));
        assert_eq!(path.progress(&Vector2::new(-3.0, 1.0)), 0.0);
        assert_eq!(path.progress(&Vector2::new(25.0, 1.0)), 10.0);
    }

    #[test]
    fn position_walks_the_segment() {
        let path = LinearSegment::new(Vector2::new(0.0, 0.0), Vector2::new(3.0, 4.0));
        // length = 5; halfway is (1.5, 2.0).
        let mid = path.position(2.5);
        assert!((mid - Vector2::new(1.5, 2.0)).norm() < 1e-12);
        // Out-of-range progress clamps to the endpoints.
        assert!((path.position(99.0) - Vector2::new(3.0, 4.0)).norm() < 1e-12);
        assert!((path.position(-1.0) - Vector2::new(0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn heading_is_constant_and_curvature_zero() {
        let path = LinearSegment::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0));
        let expected = std::f64::consts::FRAC_PI_4;
        assert!((path.rotation(0.0) - expected).abs() < 1e-12);
        assert!((path.rotation(path.length()) - expected).abs() < 1e-12);
        assert_eq!(path.angular_velocity(0.7), 0.0);
    }

    #[test]
    fn degenerate_segment_projects_everything_to_zero() {
        let p = Vector2::new(7.0, -2.0);
        let path = LinearSegment::new(p, p);
        assert_eq!(path.length(), 0.0);
        assert_eq!(path.progress(&Vector2::new(100.0, 100.0)), 0.0);
        assert_eq!(path.progress(&p), 0.0);
        assert!((path.position(0.0) - p).norm() < 1e-12);
        assert!((path.position(5.0) - p).norm() < 1e-12);
    }
}
