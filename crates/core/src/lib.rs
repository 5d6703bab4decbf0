//! Core traits and types for sinew.
//!
//! This crate defines the seams between an optimizer and the simulation it
//! drives:
//!
//! - [`Model`] — the forward-dynamics capability (state access, actuation,
//!   contact, and the dynamics solve)
//! - [`ActuatorSet`] and [`TaskSet`] — per-actuator forces and stresses, and
//!   the tracked accelerations an evaluation is scored against
//! - [`Controller`] — owns a model and hands out its mutable [`Parts`]
//! - [`DerivCallback`] and [`CallbackSet`] — hooks notified at each stage of
//!   an evaluation
//! - [`OptimizationTarget`] — the performance/constraint contract consumed by
//!   SQP-style solvers, together with its [`ConstraintCounts`]

mod callback;
mod constraint;
mod controller;
mod model;
mod target;

pub use callback::{CallbackSet, DerivCallback};
pub use constraint::{ConstraintCounts, ConstraintCountsError};
pub use controller::{Controller, Parts};
pub use model::{ActuatorSet, Dimensions, Model, TaskSet};
pub use target::OptimizationTarget;
