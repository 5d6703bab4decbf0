use thiserror::Error;

/// Errors that can occur when configuring perturbation steps.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum StepError {
    #[error("at least one perturbation step is required")]
    Empty,

    #[error("expected {expected} perturbation steps, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("perturbation step {index} must be finite and non-zero, got {step}")]
    Invalid { index: usize, step: f64 },
}

/// Errors that can occur while computing a gradient.
#[derive(Debug, Error)]
pub enum Error<E> {
    #[error("expected {expected} controls, got {actual}")]
    ControlLength { expected: usize, actual: usize },

    #[error("gradient buffer holds {actual} values, expected {expected}")]
    GradientLength { expected: usize, actual: usize },

    /// The differentiated function failed.
    #[error("evaluation failed while perturbing control {index}")]
    Evaluation {
        index: usize,
        #[source]
        source: E,
    },
}
