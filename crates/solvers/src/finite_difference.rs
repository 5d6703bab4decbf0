//! Central-difference gradients.
//!
//! # Algorithm
//!
//! For each control `k`, the function is evaluated with `x[k]` moved by
//! `+h[k]` and `-h[k]` while every other control stays fixed:
//!
//! ```text
//! df/dx[k] = (f(x + h[k] e_k) - f(x - h[k] e_k)) / (2 h[k])
//! ```
//!
//! The truncation error is `O(h^2)`. Each gradient costs `2 n` evaluations,
//! run strictly one after another, so a function that mutates shared state
//! while evaluating is safe to differentiate as long as it refreshes that
//! state on entry.
//!
//! # Perturbation sizes
//!
//! Steps are per control, since controls can differ in scale by orders of
//! magnitude. Every step must be finite and non-zero.
//!
//! # Scratch
//!
//! [`CentralDifference`] owns a perturbed copy of `x` that is allocated once.
//! Component `k` of that copy is restored from `x[k]` before component
//! `k + 1` is perturbed, so no perturbation leaks across dimensions, and the
//! caller's `x` is never written.

mod error;


pub use error::{Error, StepError};

use sinew_core::OptimizationTarget;
use tracing::trace;

/// A central-difference gradient engine with per-control step sizes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CentralDifference {
    steps: Vec<f64>,
    scratch: Vec<f64>,
}

impl CentralDifference {
    /// Creates an engine from per-control step sizes.
    ///
    /// # Errors
    ///
    /// Returns an error if `steps` is empty or any step is non-finite or zero.
    pub fn new(steps: Vec<f64>) -> Result<Self, StepError> {
        if steps.is_empty() {
            return Err(StepError::Empty);
        }
        validate(&steps)?;

        let scratch = vec![0.0; steps.len()];
        Ok(Self { steps, scratch })
    }

    /// Creates an engine with the same step for each of `n` controls.
    ///
    /// # Errors
    ///
    /// Returns an error if `n` is zero or `step` is non-finite or zero.
    pub fn uniform(n: usize, step: f64) -> Result<Self, StepError> {
        Self::new(vec![step; n])
    }

    /// Returns the number of controls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the engine has no controls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the step sizes.
    #[must_use]
    pub fn steps(&self) -> &[f64] {
        &self.steps
    }

    /// Replaces every step size.
    ///
    /// # Errors
    ///
    /// Returns an error if `steps` has the wrong length or holds an invalid
    /// step. The current steps are kept on error.
    pub fn set_steps(&mut self, steps: &[f64]) -> Result<(), StepError> {
        if steps.len() != self.steps.len() {
            return Err(StepError::Length {
                expected: self.steps.len(),
                actual: steps.len(),
            });
        }
        validate(steps)?;

        self.steps.copy_from_slice(steps);
        Ok(())
    }

    /// Sets every step size to `step`.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` is non-finite or zero.
    pub fn set_uniform(&mut self, step: f64) -> Result<(), StepError> {
        validate(&[step])?;
        self.steps.fill(step);
        Ok(())
    }

    /// Writes the central-difference gradient of `f` at `x` into `grad`.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` or `grad` has the wrong length, or the first
    /// error returned by `f`, tagged with the control being perturbed.
    pub fn gradient<E, F>(
        &mut self,
        x: &[f64],
        grad: &mut [f64],
        mut f: F,
    ) -> Result<(), Error<E>>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let n = self.steps.len();
        if x.len() != n {
            return Err(Error::ControlLength {
                expected: n,
                actual: x.len(),
            });
        }
        if grad.len() != n {
            return Err(Error::GradientLength {
                expected: n,
                actual: grad.len(),
            });
        }

        self.scratch.copy_from_slice(x);

        for k in 0..n {
            let h = self.steps[k];

            self.scratch[k] = x[k] + h;
            let forward =
                f(&self.scratch).map_err(|source| Error::Evaluation { index: k, source })?;

            self.scratch[k] = x[k] - h;
            let backward =
                f(&self.scratch).map_err(|source| Error::Evaluation { index: k, source })?;

            self.scratch[k] = x[k];
            grad[k] = (forward - backward) / (2.0 * h);

            trace!(
                index = k,
                step = h,
                forward,
                backward,
                slope = grad[k],
                "central difference"
            );
        }

        Ok(())
    }

    /// Writes the central-difference gradient of constraint `ic` at `x` into `dcdx`.
    ///
    /// `f` is called with the perturbed controls and `ic` unchanged.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`CentralDifference::gradient`].
    pub fn constraint_gradient<E, F>(
        &mut self,
        x: &[f64],
        ic: usize,
        dcdx: &mut [f64],
        mut f: F,
    ) -> Result<(), Error<E>>
    where
        F: FnMut(&[f64], usize) -> Result<f64, E>,
    {
        self.gradient(x, dcdx, |xp| f(xp, ic))
    }
}

/// Differentiates a target's performance criterion.
///
/// The target is re-entered through [`OptimizationTarget::compute_performance`]
/// twice per control.
///
/// # Errors
///
/// Returns the same errors as [`CentralDifference::gradient`].
pub fn performance_gradient<T>(
    engine: &mut CentralDifference,
    target: &mut T,
    x: &[f64],
    dpdx: &mut [f64],
) -> Result<(), Error<T::Error>>
where
    T: OptimizationTarget + ?Sized,
{
    engine.gradient(x, dpdx, |xp| target.compute_performance(xp))
}

/// Differentiates constraint `ic` (1-based) of a target.
///
/// The target is re-entered through [`OptimizationTarget::compute_constraint`]
/// twice per control.
///
/// # Errors
///
/// Returns the same errors as [`CentralDifference::gradient`].
pub fn constraint_gradient<T>(
    engine: &mut CentralDifference,
    target: &mut T,
    x: &[f64],
    ic: usize,
    dcdx: &mut [f64],
) -> Result<(), Error<T::Error>>
where
    T: OptimizationTarget + ?Sized,
{
    engine.constraint_gradient(x, ic, dcdx, |xp, ic| target.compute_constraint(xp, ic))
}

fn validate(steps: &[f64]) -> Result<(), StepError> {
    match steps
        .iter()
        .position(|&step| !step.is_finite() || step == 0.0)
    {
        Some(index) => Err(StepError::Invalid {
            index,
            step: steps[index],
        }),
        None => Ok(()),
    }
}
