use sinew_solvers::finite_difference::StepError;
use thiserror::Error;

/// Configuration for an [`ActuatorForceTarget`](crate::ActuatorForceTarget).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Weight premultiplying the sum of squared actuator stresses.
    pub stress_weight: f64,

    /// Uniform perturbation size for numerical gradients.
    pub perturbation: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stress_weight: 1.0,
            perturbation: 1e-6,
        }
    }
}

impl Config {
    /// Validates the stress weight and perturbation size.
    ///
    /// # Errors
    ///
    /// Returns an error if the stress weight is non-finite, or the
    /// perturbation is non-finite or zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.stress_weight.is_finite() {
            return Err(ConfigError::StressWeight(self.stress_weight));
        }
        if !self.perturbation.is_finite() || self.perturbation == 0.0 {
            return Err(ConfigError::Perturbation(StepError::Invalid {
                index: 0,
                step: self.perturbation,
            }));
        }
        Ok(())
    }
}

/// Errors that make an actuator force target unusable.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("no controls: at least one control is required")]
    NoControls,

    #[error("controller has no model")]
    NoModel,

    #[error("{controls} controls given for a model with {actuators} actuators")]
    ActuatorCount { controls: usize, actuators: usize },

    #[error("stress weight must be finite, got {0}")]
    StressWeight(f64),

    #[error("invalid perturbation")]
    Perturbation(#[from] StepError),
}
