//! `rmpflow-policies` – concrete control objectives for the fusion engine.
//!
//! Each policy is a leaf: it owns a task map into the space where its
//! objective is naturally expressed and a control law that says what it
//! wants there.  Policies never know about each other; the engine's
//! pullback/summation pass makes their opinions commensurable.
//!
//! # Policies
//!
//! - [`PathFollowing`] – track a route at a braking-limited target speed
//!   while pulling onto its centerline.
//! - [`CollisionAvoidance`] – a barrier that repels from a circular
//!   obstacle, dominating fusion only when a collision is imminent.

mod collision_avoidance;
mod path_following;

pub use collision_avoidance::CollisionAvoidance;
pub use path_following::PathFollowing;

// ────────────────────────────────────────────────────────────────────────────
// End-to-end scenarios
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use super::*;
    use nalgebra::Vector2;
    use rmpflow_core::builder::RmpTreeBuilder;
    use rmpflow_core::integrator::step;
    use rmpflow_core::tree::RmpRoot;
    use rmpflow_mapping::{LinearSegment, Path};
    use rmpflow_types::{ObstacleParams, PathGains};

    fn straight() -> LinearSegment {
        LinearSegment::new(Vector2::zeros(), Vector2::new(100.0, 0.0))
    }

    fn follower_tree(gains: PathGains, obstacles: &[ObstacleParams]) -> RmpRoot {
        let mut builder = RmpTreeBuilder::new("root");
        builder
            .add_leaf(
                "root",
                "follow",
                Box::new(PathFollowing::new(straight(), gains)),
            )
            .unwrap();
        for (i, params) in obstacles.iter().enumerate() {
            builder
                .add_leaf(
                    "root",
                    format!("obstacle_{i}"),
                    Box::new(CollisionAvoidance::new(*params)),
                )
                .unwrap();
        }
        builder.build()
    }

    #[test]
    fn straight_segment_converges_without_overshoot() {
        let gains = PathGains {
            target_speed: 5.0,
            p: 1.0,
            i: 0.0,
            a: 1.0,
            b: 1.0,
            k: 1.0,
            h: 0.5,
            max_accel: 2.0,
        };
        let mut root = follower_tree(gains, &[]);
        let path = straight();

        let dt = 0.02;
        let mut position = Vector2::new(0.0, 5.0);
        let mut velocity = Vector2::zeros();
        let mut last_progress = 0.0_f64;
        let mut last_deviation = 5.0_f64;
        let mut max_reach = 0.0_f64;

        for tick in 0..6000 {
            let accel = root.solve(position, velocity, dt);
            assert!(accel.iter().all(|a| a.is_finite()));
            (position, velocity) = step(dt, &accel, &velocity, &position);

            // Progress clamps at the path end, so overshoot has to be
            // checked on the raw coordinate.
            max_reach = max_reach.max(position.x);

            let progress = path.progress(&position);
            assert!(
                progress >= last_progress - 1e-9,
                "progress regressed at tick {tick}"
            );
            last_progress = progress;

            // The lateral deviation shrinks monotonically over the first
            // couple of seconds (the damped approach before any crossing).
            if tick < 100 {
                let deviation = position.y.abs();
                assert!(
                    deviation <= last_deviation + 1e-9,
                    "deviation grew at tick {tick}"
                );
                last_deviation = deviation;
            }
        }

        assert!(last_progress > 99.0, "did not reach the end of the path");
        assert!(
            max_reach <= 100.0 + 0.05,
            "overshot the path end (reached {max_reach:.3})"
        );
        assert!(position.y.abs() < 0.5, "did not settle onto the centerline");
    }

    #[test]
    fn obstacle_on_the_path_forces_a_detour_and_return() {
        // The obstacle sits dead-center on the route, so the trajectory must
        // bulge around it and come back.  Authority is shifted toward
        // holding speed (h = 0.9): a centerline pull strong enough to beat
        // the barrier's sideways push would pin the body head-on against
        // the obstacle instead of letting it slide off and around.
        let gains = PathGains {
            target_speed: 5.0,
            p: 1.0,
            i: 0.0,
            a: 1.0,
            b: 1.0,
            k: 1.0,
            h: 0.9,
            max_accel: 2.0,
        };
        let obstacle = ObstacleParams {
            center: Vector2::new(50.0, 0.0),
            radius: 10.0,
            repulsion: 1.0,
            decay: 4.0,
            damping: 1.0,
        };
        let mut root = follower_tree(gains, &[obstacle]);
        let path = straight();

        let dt = 0.01;
        let mut position = Vector2::new(0.0, 5.0);
        let mut velocity = Vector2::zeros();
        let mut min_distance = f64::INFINITY;
        let mut max_detour = 0.0_f64;

        for _ in 0..40_000 {
            let accel = root.solve(position, velocity, dt);
            assert!(accel.iter().all(|a| a.is_finite()));
            (position, velocity) = step(dt, &accel, &velocity, &position);

            min_distance = min_distance.min((position - obstacle.center).norm());
            if position.x > 30.0 && position.x < 70.0 {
                max_detour = max_detour.max(position.y.abs());
            }
        }

        assert!(
            min_distance > obstacle.radius,
            "trajectory entered the obstacle (closest approach {min_distance:.2})"
        );
        assert!(max_detour > 5.0, "trajectory never deviated around the obstacle");
        assert!(
            path.progress(&position) > 99.0,
            "did not reach the end of the path"
        );
        assert!(position.y.abs() < 2.0, "did not return to the centerline");
    }

    #[test]
    fn twin_obstacles_superpose() {
        // Two identical leaves at the same spot must push exactly twice as
        // hard as one: combination is summation, not selection.
        let obstacle = ObstacleParams {
            center: Vector2::new(20.0, 0.0),
            radius: 5.0,
            repulsion: 1.0,
            decay: 4.0,
            damping: 1.0,
        };

        let mut builder = RmpTreeBuilder::new("root");
        builder
            .add_leaf("root", "solo", Box::new(CollisionAvoidance::new(obstacle)))
            .unwrap();
        let mut single = builder.build();

        let mut builder = RmpTreeBuilder::new("root");
        builder
            .add_leaf("root", "twin_a", Box::new(CollisionAvoidance::new(obstacle)))
            .unwrap();
        builder
            .add_leaf("root", "twin_b", Box::new(CollisionAvoidance::new(obstacle)))
            .unwrap();
        let mut twin = builder.build();

        // Approaching the obstacle head-on from the right.
        let position = Vector2::new(32.0, 0.0);
        let velocity = Vector2::new(-1.0, 0.0);
        let one = single.solve(position, velocity, 0.01);
        let two = twin.solve(position, velocity, 0.01);

        // Metric and force both double, so the fused acceleration is
        // unchanged; the pulled-back force itself doubles.
        assert!((one - two).norm() < 1e-9);
    }
}
