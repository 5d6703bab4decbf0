use sinew_solvers::finite_difference;
use thiserror::Error;

use crate::ConfigError;

/// Errors that can occur while evaluating an actuator force target.
///
/// Simulation failures are carried unchanged in [`Error::Simulation`]; the
/// target never retries or recovers from them.
#[derive(Debug, Error)]
pub enum Error<E> {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The model, a derivative callback, or the task set failed.
    #[error("simulation failed")]
    Simulation(#[source] E),

    #[error("expected {expected} controls, got {actual}")]
    ControlLength { expected: usize, actual: usize },

    #[error("output buffer holds {actual} values, expected {expected}")]
    OutputLength { expected: usize, actual: usize },

    #[error(
        "task set returned {weights} weights, {desired} desired and {achieved} achieved accelerations"
    )]
    TaskLength {
        weights: usize,
        desired: usize,
        achieved: usize,
    },
}

impl<E> Error<E> {
    /// Unwraps a gradient error raised while re-entering the target.
    ///
    /// Evaluation failures come back as the target error they carry.
    pub(crate) fn from_difference(err: finite_difference::Error<Self>) -> Self {
        match err {
            finite_difference::Error::ControlLength { expected, actual } => {
                Self::ControlLength { expected, actual }
            }
            finite_difference::Error::GradientLength { expected, actual } => {
                Self::OutputLength { expected, actual }
            }
            finite_difference::Error::Evaluation { source, .. } => source,
        }
    }
}
