//! Trapezoidal state integration for consumers of the engine.
//!
//! The engine itself is a pure function of state to acceleration; whatever
//! drives the control loop owns the state and advances it.  This is the
//! expected update rule – average-velocity (trapezoidal) integration:
//!
//! ```text
//! ẋ' = ẋ + ẍ·Δt
//! x' = x + ½·(ẋ + ẋ')·Δt
//! ```

use nalgebra::Vector2;

/// Advance `(position, velocity)` by one tick of duration `dt` under the
/// commanded acceleration.
///
/// Returns the new `(position, velocity)`.  A non-positive `dt` leaves the
/// state unchanged.
pub fn step(
    dt: f64,
    accel: &Vector2<f64>,
    velocity: &Vector2<f64>,
    position: &Vector2<f64>,
) -> (Vector2<f64>, Vector2<f64>) {
    if dt <= 0.0 {
        return (*position, *velocity);
    }
    let next_velocity = velocity + accel * dt;
    let next_position = position + (velocity + next_velocity) * (0.5 * dt);
    (next_position, next_velocity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_acceleration_is_integrated_exactly() {
        // a = (2, 0), v0 = 0, dt = 0.1:
        // v' = 0.2, x' = 0.5 * (0 + 0.2) * 0.1 = 0.01.
        let (pos, vel) = step(
            0.1,
            &Vector2::new(2.0, 0.0),
            &Vector2::zeros(),
            &Vector2::zeros(),
        );
        assert!((vel - Vector2::new(0.2, 0.0)).norm() < 1e-12);
        assert!((pos - Vector2::new(0.01, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn zero_acceleration_drifts_at_constant_velocity() {
        let (pos, vel) = step(
            0.5,
            &Vector2::zeros(),
            &Vector2::new(2.0, -4.0),
            &Vector2::new(1.0, 1.0),
        );
        assert!((vel - Vector2::new(2.0, -4.0)).norm() < 1e-12);
        assert!((pos - Vector2::new(2.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn repeated_steps_match_the_closed_form() {
        // Under constant acceleration the trapezoidal rule is exact:
        // after n steps, x = ½·a·t² and v = a·t.
        let accel = Vector2::new(0.0, 3.0);
        let mut pos = Vector2::zeros();
        let mut vel = Vector2::zeros();
        let dt = 0.01;
        for _ in 0..100 {
            (pos, vel) = step(dt, &accel, &vel, &pos);
        }
        // t = 1.0: v = 3.0, x = 1.5.
        assert!((vel.y - 3.0).abs() < 1e-9);
        assert!((pos.y - 1.5).abs() < 1e-9);
    }

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let pos = Vector2::new(1.0, 2.0);
        let vel = Vector2::new(3.0, 4.0);
        let accel = Vector2::new(5.0, 6.0);
        assert_eq!(step(0.0, &accel, &vel, &pos), (pos, vel));
        assert_eq!(step(-0.1, &accel, &vel, &pos), (pos, vel));
    }
}
