//! `rmpflow` – headless scenario runner for the RMP fusion engine.
//!
//! Loads a TOML scenario (or falls back to a built-in one), assembles the
//! policy tree, then drives the control loop tick by tick: solve one
//! acceleration, integrate it, repeat until the goal is reached or the
//! tick budget runs out.  State lines stream to stdout; diagnostics go
//! through `tracing` (set `RUST_LOG`, and `RMPFLOW_LOG_FORMAT=json` for
//! newline-delimited JSON logs).

mod config;

use std::path::Path as FsPath;

use colored::Colorize;
use nalgebra::Vector2;
use tracing::{debug, info};

use config::{PathSpec, Scenario};
use rmpflow_core::builder::RmpTreeBuilder;
use rmpflow_core::integrator;
use rmpflow_mapping::{CircularArc, LinearSegment, Path};
use rmpflow_policies::{CollisionAvoidance, PathFollowing};

/// How often a state line is printed, in ticks.
const REPORT_EVERY: usize = 100;

fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("RMPFLOW_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Scenario ──────────────────────────────────────────────────────────
    let scenario = match std::env::args().nth(1) {
        Some(arg) => match config::load(FsPath::new(&arg)) {
            Ok(scenario) => {
                println!("  Scenario loaded from {}", arg.bold());
                scenario
            }
            Err(e) => {
                println!("{}: {}", "Scenario error".red(), e);
                println!("  Using the built-in default scenario.");
                Scenario::default()
            }
        },
        None => {
            println!("  No scenario file given; using the built-in default.");
            Scenario::default()
        }
    };

    match scenario.path {
        PathSpec::Segment(seg) => run(
            &scenario,
            LinearSegment::new(
                Vector2::new(seg.start[0], seg.start[1]),
                Vector2::new(seg.goal[0], seg.goal[1]),
            ),
        ),
        PathSpec::Arc(arc) => run(
            &scenario,
            CircularArc::new(
                Vector2::new(arc.center[0], arc.center[1]),
                arc.radius,
                arc.start_angle,
                arc.sweep,
            ),
        ),
    }
}

fn run<P: Path + Copy + 'static>(scenario: &Scenario, route: P) {
    let start = route.position(0.0);
    let goal = route.position(route.length());

    println!(
        "  Route {} → {}, length {:.1}",
        format!("({:.1}, {:.1})", start.x, start.y).green(),
        format!("({:.1}, {:.1})", goal.x, goal.y).blue(),
        route.length()
    );
    for obstacle in &scenario.obstacles {
        println!(
            "  Obstacle at ({:.1}, {:.1}), radius {:.1}",
            obstacle.center.x, obstacle.center.y, obstacle.radius
        );
    }

    // ── Policy tree ───────────────────────────────────────────────────────
    // Construction errors are configuration bugs; fail fast before the
    // first tick rather than mid-loop.
    let mut builder = RmpTreeBuilder::new("root");
    builder
        .add_leaf(
            "root",
            "follow",
            Box::new(PathFollowing::new(route, scenario.gains)),
        )
        .expect("attaching the follower to a fresh root cannot fail");
    for (i, params) in scenario.obstacles.iter().enumerate() {
        builder
            .add_leaf(
                "root",
                format!("obstacle_{i}"),
                Box::new(CollisionAvoidance::new(*params)),
            )
            .unwrap_or_else(|e| panic!("scenario produced a malformed tree: {e}"));
    }
    let mut root = builder.build();
    debug!(leaves = scenario.obstacles.len() + 1, "policy tree ready");

    // ── Control loop ──────────────────────────────────────────────────────
    let sim = scenario.sim;
    let mut position = Vector2::new(sim.spawn[0], sim.spawn[1]);
    let mut velocity = Vector2::zeros();
    let mut reached = false;
    let mut ticks = 0;

    for tick in 0..sim.max_ticks {
        let accel = root.solve(position, velocity, sim.dt);
        (position, velocity) = integrator::step(sim.dt, &accel, &velocity, &position);
        ticks = tick + 1;

        if tick % REPORT_EVERY == 0 {
            println!(
                "  t={:8.2}s  pos=({:7.2}, {:7.2})  vel=({:6.2}, {:6.2})  c={:6.2}",
                tick as f64 * sim.dt,
                position.x,
                position.y,
                velocity.x,
                velocity.y,
                route.progress(&position)
            );
        }

        if (position - goal).norm() < sim.goal_tolerance {
            reached = true;
            break;
        }
    }

    // ── Summary ───────────────────────────────────────────────────────────
    let elapsed = ticks as f64 * sim.dt;
    if reached {
        info!(ticks, elapsed, "goal reached");
        println!(
            "{}",
            format!("  ✓ Goal reached in {ticks} ticks ({elapsed:.2} s simulated).").green()
        );
    } else {
        info!(ticks, elapsed, "tick budget exhausted");
        println!(
            "{}",
            format!(
                "  ✗ Tick budget exhausted after {elapsed:.2} s; stopped at ({:.2}, {:.2}).",
                position.x, position.y
            )
            .yellow()
        );
    }
}

fn print_banner() {
    println!();
    println!("{}", "  rmpflow – Riemannian motion-policy fusion".bold());
    println!("{}", "  ──────────────────────────────────────────".dimmed());
}
