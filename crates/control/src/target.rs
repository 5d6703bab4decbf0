use std::mem;

use sinew_core::{
    ActuatorSet, ConstraintCounts, Controller, Dimensions, Model, OptimizationTarget, Parts,
    TaskSet,
};
use sinew_solvers::finite_difference::{self, CentralDifference};
use tracing::{debug, trace, warn};

use crate::{Buffers, Config, ConfigError, Error};

type ModelError<C> = <<C as Controller>::Model as Model>::Error;

/// Scores actuator forces by the stress they cost and the tracking they buy.
///
/// The target borrows its controller for its whole lifetime. Every
/// performance evaluation drives the controller's model through one full
/// cycle, always in this order:
///
/// 1. Read the model state and write it back unchanged.
/// 2. Compute baseline actuation.
/// 3. Override each actuator force with the matching entry of `x`.
/// 4. Apply actuation.
/// 5. Compute, then apply, contact forces.
/// 6. Solve the dynamics for coordinate and speed derivatives.
/// 7. Compute the achieved task accelerations.
/// 8. Combine stress and tracking error into the performance.
///
/// Derivative callbacks run after each model stage. Time is whatever the
/// model reports and is never advanced: this is a force solve at a single
/// instant.
///
/// The target has no constraints. [`OptimizationTarget::compute_constraint`]
/// and its gradient are kept so the target fits the general solver contract.
pub struct ActuatorForceTarget<'a, C: Controller> {
    controller: &'a mut C,
    num_controls: usize,
    stress_weight: f64,
    counts: ConstraintCounts,
    buffers: Buffers,
    differences: CentralDifference,
}

impl<'a, C: Controller> ActuatorForceTarget<'a, C> {
    /// Creates a target for `num_controls` actuator forces with the default config.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_controls` is zero, the controller has no
    /// model, or the model's actuator count differs from `num_controls`.
    pub fn new(num_controls: usize, controller: &'a mut C) -> Result<Self, ConfigError> {
        Self::with_config(num_controls, controller, Config::default())
    }

    /// Creates a target for `num_controls` actuator forces.
    ///
    /// Scratch buffers are sized from the model's reported dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, `num_controls` is zero,
    /// the controller has no model, or the model's actuator count differs
    /// from `num_controls`.
    pub fn with_config(
        num_controls: usize,
        controller: &'a mut C,
        config: Config,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        if num_controls == 0 {
            return Err(ConfigError::NoControls);
        }

        let model = controller.model().ok_or(ConfigError::NoModel)?;

        let actuators = model.actuators().len();
        if actuators != num_controls {
            return Err(ConfigError::ActuatorCount {
                controls: num_controls,
                actuators,
            });
        }

        let dimensions = model.dimensions();
        let differences = CentralDifference::uniform(num_controls, config.perturbation)?;

        debug!(
            num_controls,
            controls = dimensions.controls,
            states = dimensions.states,
            coordinates = dimensions.coordinates,
            speeds = dimensions.speeds,
            "created actuator force target"
        );

        Ok(Self {
            controller,
            num_controls,
            stress_weight: config.stress_weight,
            counts: ConstraintCounts::NONE,
            buffers: Buffers::new(dimensions),
            differences,
        })
    }

    /// Returns the weight on the summed squared stresses.
    #[must_use]
    pub fn stress_weight(&self) -> f64 {
        self.stress_weight
    }

    /// Sets the weight on the summed squared stresses.
    ///
    /// Any value is accepted; a negative weight rewards stress.
    pub fn set_stress_weight(&mut self, weight: f64) {
        if weight < 0.0 {
            warn!(weight, "negative stress weight");
        }
        self.stress_weight = weight;
    }

    /// Returns the per-control perturbation sizes.
    #[must_use]
    pub fn perturbations(&self) -> &[f64] {
        self.differences.steps()
    }

    /// Sets every perturbation size to `step`.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` is non-finite or zero.
    pub fn set_perturbation(&mut self, step: f64) -> Result<(), ConfigError> {
        Ok(self.differences.set_uniform(step)?)
    }

    /// Sets per-control perturbation sizes.
    ///
    /// # Errors
    ///
    /// Returns an error if `steps` does not have one entry per control, or
    /// any step is non-finite or zero.
    pub fn set_perturbations(&mut self, steps: &[f64]) -> Result<(), ConfigError> {
        Ok(self.differences.set_steps(steps)?)
    }

    /// Returns the model dimensions the buffers were sized from.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.buffers.dimensions()
    }

    /// Returns the scratch buffers as left by the last evaluation.
    #[must_use]
    pub fn buffers(&self) -> &Buffers {
        &self.buffers
    }

    /// Runs one full evaluation cycle and returns the performance at `x`.
    fn evaluate(&mut self, x: &[f64]) -> Result<f64, Error<ModelError<C>>> {
        if x.len() != self.num_controls {
            return Err(Error::ControlLength {
                expected: self.num_controls,
                actual: x.len(),
            });
        }

        let Parts {
            model,
            tasks,
            callbacks,
        } = self.controller.parts_mut().ok_or(ConfigError::NoModel)?;
        let buffers = &mut self.buffers;
        let t = model.time();

        // State
        model.states(&mut buffers.states);
        model
            .set_states(&buffers.states)
            .map_err(Error::Simulation)?;
        callbacks
            .set(t, &buffers.controls, &buffers.states, model)
            .map_err(Error::Simulation)?;

        // Actuation
        model.compute_actuation().map_err(Error::Simulation)?;
        callbacks
            .compute_actuation(t, &buffers.controls, &buffers.states, model)
            .map_err(Error::Simulation)?;

        let actuators = model.actuators_mut();
        for (index, &force) in x.iter().enumerate() {
            actuators.set_force(index, force);
        }

        model.apply_actuation().map_err(Error::Simulation)?;
        callbacks
            .apply_actuation(t, &buffers.controls, &buffers.states, model)
            .map_err(Error::Simulation)?;

        // Contact
        model.compute_contact().map_err(Error::Simulation)?;
        callbacks
            .compute_contact(t, &buffers.controls, &buffers.states, model)
            .map_err(Error::Simulation)?;
        model.apply_contact().map_err(Error::Simulation)?;
        callbacks
            .apply_contact(t, &buffers.controls, &buffers.states, model)
            .map_err(Error::Simulation)?;

        // Accelerations
        model
            .compute_derivatives(
                &mut buffers.coordinate_derivatives,
                &mut buffers.speed_derivatives,
            )
            .map_err(Error::Simulation)?;
        buffers.state_derivatives.fill(0.0);
        callbacks
            .compute_derivatives(
                t,
                &buffers.controls,
                &buffers.states,
                &mut buffers.state_derivatives,
                model,
            )
            .map_err(Error::Simulation)?;
        tasks
            .compute_accelerations(model, &buffers.speed_derivatives)
            .map_err(Error::Simulation)?;

        // Performance
        let actuators = model.actuators();
        let pf: f64 = (0..actuators.len())
            .map(|index| actuators.stress(index).powi(2))
            .sum();

        let weights = tasks.weights();
        let desired = tasks.desired_accelerations();
        let achieved = tasks.accelerations();
        if weights.len() != desired.len() || achieved.len() != desired.len() {
            return Err(Error::TaskLength {
                weights: weights.len(),
                desired: desired.len(),
                achieved: achieved.len(),
            });
        }
        let pacc: f64 = weights
            .iter()
            .zip(desired)
            .zip(achieved)
            .map(|((w, des), acc)| w * (des - acc).powi(2))
            .sum();

        let p = self.stress_weight * pf + pacc;
        trace!(pf, pacc, p, "evaluated performance");

        Ok(p)
    }
}

impl<C: Controller> OptimizationTarget for ActuatorForceTarget<'_, C> {
    type Error = Error<ModelError<C>>;

    fn num_controls(&self) -> usize {
        self.num_controls
    }

    fn constraint_counts(&self) -> ConstraintCounts {
        self.counts
    }

    fn compute_performance(&mut self, x: &[f64]) -> Result<f64, Self::Error> {
        self.evaluate(x)
    }

    /// Always zero: this target has no constraints.
    fn compute_constraint(&mut self, _x: &[f64], _ic: usize) -> Result<f64, Self::Error> {
        Ok(0.0)
    }

    fn compute_performance_gradient(
        &mut self,
        x: &[f64],
        dpdx: &mut [f64],
    ) -> Result<(), Self::Error> {
        // The engine re-enters `self`, so it is moved out for the duration.
        let mut differences = mem::take(&mut self.differences);
        let result = finite_difference::performance_gradient(&mut differences, self, x, dpdx);
        self.differences = differences;
        result.map_err(Error::from_difference)
    }

    fn compute_constraint_gradient(
        &mut self,
        x: &[f64],
        ic: usize,
        dcdx: &mut [f64],
    ) -> Result<(), Self::Error> {
        let mut differences = mem::take(&mut self.differences);
        let result = finite_difference::constraint_gradient(&mut differences, self, x, ic, dcdx);
        self.differences = differences;
        result.map_err(Error::from_difference)
    }
}
