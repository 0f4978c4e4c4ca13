//! `rmpflow-core` – the Riemannian-motion-policy fusion engine.
//!
//! Fuses independently-authored control objectives into one commanded
//! acceleration per control tick.  Objectives live as leaves of a tree,
//! each in its own task space with its own desired dynamics and its own
//! importance metric; the engine pulls every leaf's (force, metric) pair
//! back into configuration space and resolves the sum into a single
//! acceleration, without any leaf knowing about any other.
//!
//! # Modules
//!
//! - [`policy`] – the [`TaskMap`][policy::TaskMap] and
//!   [`Policy`][policy::Policy] traits: the open seam new objectives plug
//!   into without touching the fusion algorithm.
//! - [`tree`] – [`RmpNode`][tree::RmpNode] and [`RmpRoot`][tree::RmpRoot]:
//!   the two-phase downward/upward pass and the damped pseudo-inverse
//!   resolution at the root.
//! - [`builder`] – [`RmpTreeBuilder`][builder::RmpTreeBuilder]: validated
//!   whole-tree assembly; malformed trees are rejected before the first
//!   `solve`.
//! - [`integrator`] – the trapezoidal step consumers use to advance state
//!   from the solved acceleration.
//!
//! # Example
//!
//! ```rust
//! use nalgebra::Vector2;
//! use rmpflow_core::builder::RmpTreeBuilder;
//!
//! let mut root = RmpTreeBuilder::new("root").build();
//! // An empty tree commands no acceleration.
//! let accel = root.solve(Vector2::new(0.0, 0.0), Vector2::new(0.0, 0.0), 0.02);
//! assert_eq!(accel, Vector2::zeros());
//! ```

pub mod builder;
pub mod integrator;
pub mod policy;
pub mod tree;
