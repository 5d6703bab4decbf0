//! Actuator force optimization target for computed muscle control.
//!
//! [`ActuatorForceTarget`] scores a candidate vector of actuator forces at a
//! single simulation instant. Each evaluation loads the forces into the
//! model, solves the dynamics, and combines the actuators' summed squared
//! stress with the weighted error of the tracked task accelerations:
//!
//! ```text
//! p = stress_weight * sum(stress_i^2) + sum(w_j * (desired_j - achieved_j)^2)
//! ```
//!
//! The target implements [`OptimizationTarget`], so an SQP solver can drive
//! it directly. Gradients come from central differences over repeated
//! evaluations.
//!
//! Evaluations are not pure: every call rewrites the model's force and
//! acceleration state. The same `x` against the same model configuration
//! always gives the same performance, because each evaluation starts by
//! refreshing the model state.
//!
//! [`OptimizationTarget`]: sinew_core::OptimizationTarget

mod buffers;
mod config;
mod error;
mod target;

#[cfg(test)]
mod test_utils;

pub use buffers::Buffers;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use target::ActuatorForceTarget;
