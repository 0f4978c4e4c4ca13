//! `rmpflow-mapping` – progress-parametrized routes for path-following.
//!
//! A [`Path`] is an immutable geometric route parametrized by *progress*: an
//! arclength-like scalar running from `0` at the start to [`Path::length`] at
//! the end.  Policies query it both ways – project an arbitrary point onto
//! the route ([`Path::progress`]) and evaluate the route at a progress value
//! ([`Path::position`], [`Path::rotation`], [`Path::angular_velocity`]).
//!
//! # Providers
//!
//! - [`LinearSegment`] – a straight segment between two points.
//! - [`CircularArc`] – a constant-curvature arc.
//!
//! # Example
//!
//! ```rust
//! use nalgebra::Vector2;
//! use rmpflow_mapping::{LinearSegment, Path};
//!
//! let path = LinearSegment::new(Vector2::new(0.0, 0.0), Vector2::new(100.0, 0.0));
//! let c = path.progress(&Vector2::new(30.0, 4.0));
//! assert!((c - 30.0).abs() < 1e-9);
//! assert!((path.position(c).y).abs() < 1e-9);
//! ```

use nalgebra::Vector2;

mod arc;
mod linear;

pub use arc::CircularArc;
pub use linear::LinearSegment;

/// Below this length a path is treated as a single point: `progress` is `0`
/// everywhere and no direction-dependent quantity divides by the length.
pub(crate) const DEGENERATE_LENGTH: f64 = 1e-12;

/// An ordered geometric route parametrized by progress `c ∈ [0, length]`.
///
/// Implementations must be total on that interval; queries for points off
/// the curve are *nearest projections*, never extrapolations, and progress
/// arguments outside the interval are clamped.
pub trait Path {
    /// Nearest-progress projection of an arbitrary point onto the route.
    ///
    /// Returns `0` for a degenerate (zero-length) path.
    fn progress(&self, point: &Vector2<f64>) -> f64;

    /// Position on the route at progress `c`.
    fn position(&self, c: f64) -> Vector2<f64>;

    /// Heading (tangent direction) at progress `c`, in radians.
    fn rotation(&self, c: f64) -> f64;

    /// Rate of change of heading per unit progress at `c` (signed curvature).
    fn angular_velocity(&self, c: f64) -> f64;

    /// Total route length.
    fn length(&self) -> f64;
}
