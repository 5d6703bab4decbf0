//! A one-degree-of-freedom arm for exercising the target.
//!
//! Each actuator pushes on a single generalized speed through a fixed moment
//! arm. Contact reacts against a fixed fraction of the applied actuation, so
//! it is only correct when computed after actuation has been applied.

use thiserror::Error;
use uom::si::{f64::Time, time::second};

use sinew_core::{ActuatorSet, CallbackSet, Controller, Dimensions, Model, Parts, TaskSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    SetStates,
    ComputeActuation,
    ApplyActuation,
    ComputeContact,
    ApplyContact,
    ComputeDerivatives,
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum ArmError {
    #[error("mass matrix is singular")]
    SingularMass,

    #[error("callback `{0}` failed")]
    Callback(&'static str),
}

#[derive(Debug)]
pub(crate) struct Arm {
    pub(crate) time: Time,
    pub(crate) states: Vec<f64>,
    pub(crate) moment_arms: Vec<f64>,
    pub(crate) optimal_forces: Vec<f64>,
    pub(crate) forces: Vec<f64>,
    pub(crate) mass: f64,
    pub(crate) contact_ratio: f64,
    pub(crate) generalized_force: f64,
    pub(crate) contact_force: f64,
    pub(crate) stages: Vec<Stage>,
    pub(crate) set_states_calls: usize,
}

impl Arm {
    pub(crate) fn new(
        moment_arms: Vec<f64>,
        optimal_forces: Vec<f64>,
        mass: f64,
        contact_ratio: f64,
    ) -> Self {
        let forces = vec![0.0; moment_arms.len()];
        Self {
            time: Time::new::<second>(0.5),
            states: vec![0.2, 0.3],
            moment_arms,
            optimal_forces,
            forces,
            mass,
            contact_ratio,
            generalized_force: 0.0,
            contact_force: 0.0,
            stages: Vec::new(),
            set_states_calls: 0,
        }
    }
}

impl ActuatorSet for Arm {
    fn len(&self) -> usize {
        self.forces.len()
    }

    fn force(&self, index: usize) -> f64 {
        self.forces[index]
    }

    fn set_force(&mut self, index: usize, force: f64) {
        self.forces[index] = force;
    }

    fn stress(&self, index: usize) -> f64 {
        self.forces[index] / self.optimal_forces[index]
    }
}

impl Model for Arm {
    type Error = ArmError;
    type Actuators = Self;

    fn dimensions(&self) -> Dimensions {
        Dimensions {
            controls: self.forces.len(),
            states: 2,
            coordinates: 1,
            speeds: 1,
        }
    }

    fn time(&self) -> Time {
        self.time
    }

    fn states(&self, y: &mut [f64]) {
        y.copy_from_slice(&self.states);
    }

    fn set_states(&mut self, y: &[f64]) -> Result<(), Self::Error> {
        self.stages.push(Stage::SetStates);
        self.set_states_calls += 1;
        self.states.copy_from_slice(y);
        Ok(())
    }

    fn actuators(&self) -> &Self {
        self
    }

    fn actuators_mut(&mut self) -> &mut Self {
        self
    }

    fn compute_actuation(&mut self) -> Result<(), Self::Error> {
        self.stages.push(Stage::ComputeActuation);
        // Passive baseline; always overridden by the candidate forces.
        self.forces.fill(1.0);
        Ok(())
    }

    fn apply_actuation(&mut self) -> Result<(), Self::Error> {
        self.stages.push(Stage::ApplyActuation);
        self.generalized_force = self
            .forces
            .iter()
            .zip(&self.moment_arms)
            .map(|(f, r)| f * r)
            .sum();
        Ok(())
    }

    fn compute_contact(&mut self) -> Result<(), Self::Error> {
        self.stages.push(Stage::ComputeContact);
        self.contact_force = -self.contact_ratio * self.generalized_force;
        Ok(())
    }

    fn apply_contact(&mut self) -> Result<(), Self::Error> {
        self.stages.push(Stage::ApplyContact);
        self.generalized_force += self.contact_force;
        Ok(())
    }

    fn compute_derivatives(
        &mut self,
        dqdt: &mut [f64],
        dudt: &mut [f64],
    ) -> Result<(), Self::Error> {
        self.stages.push(Stage::ComputeDerivatives);
        if self.mass == 0.0 {
            return Err(ArmError::SingularMass);
        }
        dqdt[0] = self.states[1];
        dudt[0] = self.generalized_force / self.mass;
        Ok(())
    }
}

/// Tracks the arm's single speed acceleration.
#[derive(Debug)]
pub(crate) struct Tracking {
    pub(crate) weights: Vec<f64>,
    pub(crate) desired: Vec<f64>,
    pub(crate) achieved: Vec<f64>,
    pub(crate) calls: usize,
}

impl TaskSet<Arm> for Tracking {
    fn compute_accelerations(&mut self, _arm: &Arm, dudt: &[f64]) -> Result<(), ArmError> {
        self.calls += 1;
        self.achieved.clear();
        self.achieved.extend_from_slice(dudt);
        Ok(())
    }

    fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn desired_accelerations(&self) -> &[f64] {
        &self.desired
    }

    fn accelerations(&self) -> &[f64] {
        &self.achieved
    }
}

#[derive(Debug)]
pub(crate) struct Rig {
    pub(crate) model: Option<Arm>,
    pub(crate) tasks: Tracking,
    pub(crate) callbacks: CallbackSet<Arm>,
}

impl Rig {
    pub(crate) fn new(arm: Arm, desired: f64, weight: f64) -> Self {
        Self {
            model: Some(arm),
            tasks: Tracking {
                weights: vec![weight],
                desired: vec![desired],
                achieved: vec![0.0],
                calls: 0,
            },
            callbacks: CallbackSet::new(),
        }
    }
}

impl Controller for Rig {
    type Model = Arm;
    type Tasks = Tracking;

    fn model(&self) -> Option<&Arm> {
        self.model.as_ref()
    }

    fn parts_mut(&mut self) -> Option<Parts<'_, Arm, Tracking>> {
        let model = self.model.as_mut()?;
        Some(Parts {
            model,
            tasks: &mut self.tasks,
            callbacks: &mut self.callbacks,
        })
    }
}
