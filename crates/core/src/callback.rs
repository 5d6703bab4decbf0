use std::fmt;

use uom::si::f64::Time;

use crate::Model;

/// Hooks notified at each stage of a model evaluation.
///
/// Every hook defaults to a no-op, so a callback only implements the stages
/// it cares about. Hooks receive the evaluation time, the control buffer
/// (`x`), the state buffer (`y`), and the model itself, and run right after
/// the model stage they are named for.
pub trait DerivCallback<M: Model> {
    /// Returns `false` to have the callback skipped.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Called after the model state has been refreshed.
    ///
    /// # Errors
    ///
    /// Returns a model error to abort the evaluation.
    fn set(&mut self, _t: Time, _x: &[f64], _y: &[f64], _model: &mut M) -> Result<(), M::Error> {
        Ok(())
    }

    /// Called after baseline actuation, before forces are overridden.
    ///
    /// # Errors
    ///
    /// Returns a model error to abort the evaluation.
    fn compute_actuation(
        &mut self,
        _t: Time,
        _x: &[f64],
        _y: &[f64],
        _model: &mut M,
    ) -> Result<(), M::Error> {
        Ok(())
    }

    /// Called after actuation has been applied.
    ///
    /// # Errors
    ///
    /// Returns a model error to abort the evaluation.
    fn apply_actuation(
        &mut self,
        _t: Time,
        _x: &[f64],
        _y: &[f64],
        _model: &mut M,
    ) -> Result<(), M::Error> {
        Ok(())
    }

    /// Called after contact forces have been computed.
    ///
    /// # Errors
    ///
    /// Returns a model error to abort the evaluation.
    fn compute_contact(
        &mut self,
        _t: Time,
        _x: &[f64],
        _y: &[f64],
        _model: &mut M,
    ) -> Result<(), M::Error> {
        Ok(())
    }

    /// Called after contact forces have been applied.
    ///
    /// # Errors
    ///
    /// Returns a model error to abort the evaluation.
    fn apply_contact(
        &mut self,
        _t: Time,
        _x: &[f64],
        _y: &[f64],
        _model: &mut M,
    ) -> Result<(), M::Error> {
        Ok(())
    }

    /// Called after the dynamics solve with the state derivative buffer.
    ///
    /// # Errors
    ///
    /// Returns a model error to abort the evaluation.
    fn compute_derivatives(
        &mut self,
        _t: Time,
        _x: &[f64],
        _y: &[f64],
        _dydt: &mut [f64],
        _model: &mut M,
    ) -> Result<(), M::Error> {
        Ok(())
    }
}

/// An ordered collection of derivative callbacks.
///
/// Each stage method forwards to every enabled callback in insertion order
/// and stops at the first error.
pub struct CallbackSet<M: Model> {
    callbacks: Vec<Box<dyn DerivCallback<M>>>,
}

impl<M: Model> CallbackSet<M> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// Appends a callback.
    pub fn push(&mut self, callback: impl DerivCallback<M> + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Returns the number of callbacks, enabled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Returns `true` if the set holds no callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    fn enabled(&mut self) -> impl Iterator<Item = &mut Box<dyn DerivCallback<M>>> {
        self.callbacks.iter_mut().filter(|cb| cb.is_enabled())
    }

    /// Runs [`DerivCallback::set`] on every enabled callback.
    ///
    /// # Errors
    ///
    /// Returns the first callback error.
    pub fn set(&mut self, t: Time, x: &[f64], y: &[f64], model: &mut M) -> Result<(), M::Error> {
        self.enabled().try_for_each(|cb| cb.set(t, x, y, model))
    }

    /// Runs [`DerivCallback::compute_actuation`] on every enabled callback.
    ///
    /// # Errors
    ///
    /// Returns the first callback error.
    pub fn compute_actuation(
        &mut self,
        t: Time,
        x: &[f64],
        y: &[f64],
        model: &mut M,
    ) -> Result<(), M::Error> {
        self.enabled()
            .try_for_each(|cb| cb.compute_actuation(t, x, y, model))
    }

    /// Runs [`DerivCallback::apply_actuation`] on every enabled callback.
    ///
    /// # Errors
    ///
    /// Returns the first callback error.
    pub fn apply_actuation(
        &mut self,
        t: Time,
        x: &[f64],
        y: &[f64],
        model: &mut M,
    ) -> Result<(), M::Error> {
        self.enabled()
            .try_for_each(|cb| cb.apply_actuation(t, x, y, model))
    }

    /// Runs [`DerivCallback::compute_contact`] on every enabled callback.
    ///
    /// # Errors
    ///
    /// Returns the first callback error.
    pub fn compute_contact(
        &mut self,
        t: Time,
        x: &[f64],
        y: &[f64],
        model: &mut M,
    ) -> Result<(), M::Error> {
        self.enabled()
            .try_for_each(|cb| cb.compute_contact(t, x, y, model))
    }

    /// Runs [`DerivCallback::apply_contact`] on every enabled callback.
    ///
    /// # Errors
    ///
    /// Returns the first callback error.
    pub fn apply_contact(
        &mut self,
        t: Time,
        x: &[f64],
        y: &[f64],
        model: &mut M,
    ) -> Result<(), M::Error> {
        self.enabled()
            .try_for_each(|cb| cb.apply_contact(t, x, y, model))
    }

    /// Runs [`DerivCallback::compute_derivatives`] on every enabled callback.
    ///
    /// # Errors
    ///
    /// Returns the first callback error.
    pub fn compute_derivatives(
        &mut self,
        t: Time,
        x: &[f64],
        y: &[f64],
        dydt: &mut [f64],
        model: &mut M,
    ) -> Result<(), M::Error> {
        self.enabled()
            .try_for_each(|cb| cb.compute_derivatives(t, x, y, dydt, model))
    }
}

impl<M: Model> Default for CallbackSet<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> fmt::Debug for CallbackSet<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSet")
            .field("len", &self.callbacks.len())
            .finish()
    }
}
