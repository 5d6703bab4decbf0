use std::convert::Infallible;

use approx::assert_relative_eq;
use uom::si::{f64::Time, time::second};

use sinew_control::{ActuatorForceTarget, Config, ConfigError};
use sinew_core::{
    ActuatorSet, CallbackSet, Controller, Dimensions, Model, OptimizationTarget, Parts, TaskSet,
};

/// Motors acting on one free body through equal moment arms.
///
/// Stress is the force magnitude, so each motor's squared stress is its
/// squared force.
struct Motors {
    forces: Vec<f64>,
    moment_arm: f64,
    applied: f64,
}

impl ActuatorSet for Motors {
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
        self.forces[index].abs()
    }
}

struct Body {
    motors: Motors,
    states: [f64; 2],
}

impl Body {
    fn new(num_motors: usize, moment_arm: f64) -> Self {
        Self {
            motors: Motors {
                forces: vec![0.0; num_motors],
                moment_arm,
                applied: 0.0,
            },
            states: [0.0, 0.0],
        }
    }
}

impl Model for Body {
    type Error = Infallible;
    type Actuators = Motors;

    fn dimensions(&self) -> Dimensions {
        Dimensions {
            controls: self.motors.len(),
            states: 2,
            coordinates: 1,
            speeds: 1,
        }
    }

    fn time(&self) -> Time {
        Time::new::<second>(1.25)
    }

    fn states(&self, y: &mut [f64]) {
        y.copy_from_slice(&self.states);
    }

    fn set_states(&mut self, y: &[f64]) -> Result<(), Self::Error> {
        self.states.copy_from_slice(y);
        Ok(())
    }

    fn actuators(&self) -> &Motors {
        &self.motors
    }

    fn actuators_mut(&mut self) -> &mut Motors {
        &mut self.motors
    }

    fn compute_actuation(&mut self) -> Result<(), Self::Error> {
        self.motors.forces.fill(0.0);
        Ok(())
    }

    fn apply_actuation(&mut self) -> Result<(), Self::Error> {
        self.motors.applied = self.motors.moment_arm * self.motors.forces.iter().sum::<f64>();
        Ok(())
    }

    fn compute_contact(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn apply_contact(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn compute_derivatives(
        &mut self,
        dqdt: &mut [f64],
        dudt: &mut [f64],
    ) -> Result<(), Self::Error> {
        dqdt[0] = self.states[1];
        dudt[0] = self.motors.applied;
        Ok(())
    }
}

struct Task {
    weight: [f64; 1],
    desired: [f64; 1],
    achieved: [f64; 1],
}

impl TaskSet<Body> for Task {
    fn compute_accelerations(&mut self, _body: &Body, dudt: &[f64]) -> Result<(), Infallible> {
        self.achieved[0] = dudt[0];
        Ok(())
    }

    fn weights(&self) -> &[f64] {
        &self.weight
    }

    fn desired_accelerations(&self) -> &[f64] {
        &self.desired
    }

    fn accelerations(&self) -> &[f64] {
        &self.achieved
    }
}

struct Cmc {
    body: Body,
    task: Task,
    callbacks: CallbackSet<Body>,
}

impl Cmc {
    /// Two motors with moment arm 1.5, so `x = [1, 1]` accelerates the body at 3.
    fn two_motors() -> Self {
        Self::new(2)
    }

    fn new(num_motors: usize) -> Self {
        Self {
            body: Body::new(num_motors, 1.5),
            task: Task {
                weight: [1.0],
                desired: [5.0],
                achieved: [0.0],
            },
            callbacks: CallbackSet::new(),
        }
    }
}

impl Controller for Cmc {
    type Model = Body;
    type Tasks = Task;

    fn model(&self) -> Option<&Body> {
        Some(&self.body)
    }

    fn parts_mut(&mut self) -> Option<Parts<'_, Body, Task>> {
        Some(Parts {
            model: &mut self.body,
            tasks: &mut self.task,
            callbacks: &mut self.callbacks,
        })
    }
}

fn config(stress_weight: f64, perturbation: f64) -> Config {
    Config {
        stress_weight,
        perturbation,
    }
}

#[test]
fn construction_follows_control_count() {
    for n in 1..=5 {
        let mut cmc = Cmc::new(n);
        let target = ActuatorForceTarget::new(n, &mut cmc).expect("valid control count");
        assert_eq!(target.num_controls(), n);
        assert_eq!(target.buffers().controls().len(), n);
    }

    let mut cmc = Cmc::two_motors();
    assert!(matches!(
        ActuatorForceTarget::new(0, &mut cmc),
        Err(ConfigError::NoControls)
    ));
}

#[test]
fn two_motor_performance() {
    let mut cmc = Cmc::two_motors();
    let mut target = ActuatorForceTarget::with_config(2, &mut cmc, config(2.0, 1e-6)).unwrap();

    // 2 * (1^2 + 1^2) + 1 * (5 - 3)^2
    let p = target.compute_performance(&[1.0, 1.0]).unwrap();
    assert_relative_eq!(p, 8.0, epsilon = 1e-12);
}

#[test]
fn performance_is_reproducible() {
    let mut cmc = Cmc::two_motors();
    let mut target = ActuatorForceTarget::with_config(2, &mut cmc, config(2.0, 1e-6)).unwrap();

    let x = [0.7, -1.3];
    let values: Vec<u64> = (0..5)
        .map(|_| target.compute_performance(&x).unwrap().to_bits())
        .collect();

    assert!(values.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn two_motor_gradient() {
    let mut cmc = Cmc::two_motors();
    let mut target = ActuatorForceTarget::with_config(2, &mut cmc, config(2.0, 1e-4)).unwrap();

    let x = [1.0_f64, 1.0];
    let bits: Vec<u64> = x.iter().map(|v| v.to_bits()).collect();
    let mut dpdx = [0.0; 2];
    target.compute_performance_gradient(&x, &mut dpdx).unwrap();

    // p = 2 (x0^2 + x1^2) + (5 - 1.5 (x0 + x1))^2
    // dp/dxi = 4 xi - 3 (5 - 1.5 (x0 + x1))
    let analytic = 4.0 * 1.0 - 3.0 * (5.0 - 3.0);
    for g in dpdx {
        assert_relative_eq!(g, analytic, max_relative = 1e-3);
    }

    let after: Vec<u64> = x.iter().map(|v| v.to_bits()).collect();
    assert_eq!(bits, after);
}

#[test]
fn gradient_away_from_symmetry() {
    let mut cmc = Cmc::two_motors();
    let mut target = ActuatorForceTarget::with_config(2, &mut cmc, config(2.0, 1e-4)).unwrap();
    target.set_perturbations(&[1e-4, 1e-3]).unwrap();

    let x = [2.0, -0.5];
    let mut dpdx = [0.0; 2];
    target.compute_performance_gradient(&x, &mut dpdx).unwrap();

    let residual = 5.0 - 1.5 * (x[0] + x[1]);
    assert_relative_eq!(dpdx[0], 4.0 * x[0] - 3.0 * residual, max_relative = 1e-6);
    assert_relative_eq!(dpdx[1], 4.0 * x[1] - 3.0 * residual, max_relative = 1e-6);
}

#[test]
fn combined_entry_points_have_no_constraints() {
    let mut cmc = Cmc::two_motors();
    let mut target = ActuatorForceTarget::with_config(2, &mut cmc, config(2.0, 1e-4)).unwrap();

    let counts = target.constraint_counts();
    assert_eq!(counts.total(), 0);
    assert_eq!(counts.nonlinear_inequality(), 0);
    assert_eq!(counts.nonlinear_equality(), 0);

    let p = target.compute(&[1.0, 1.0], &mut []).unwrap();
    assert_relative_eq!(p, 8.0, epsilon = 1e-12);

    let mut dpdx = [0.0; 2];
    target
        .compute_gradients(&[1.0, 1.0], &mut dpdx, &mut [])
        .unwrap();
    assert_relative_eq!(dpdx[0], -2.0, max_relative = 1e-3);
    assert_relative_eq!(dpdx[1], -2.0, max_relative = 1e-3);

    assert_relative_eq!(target.compute_constraint(&[1.0, 1.0], 1).unwrap(), 0.0);
}
