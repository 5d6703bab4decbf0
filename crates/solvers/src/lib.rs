//! Numerical building blocks for sinew optimization targets.
//!
//! - [`finite_difference`] — central-difference gradients of targets whose
//!   performance and constraints are only available by evaluation

pub mod finite_difference;
