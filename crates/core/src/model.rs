use uom::si::f64::Time;

/// Sizes a model reports through introspection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    /// Number of model controls.
    pub controls: usize,

    /// Number of state variables.
    pub states: usize,

    /// Number of generalized coordinates.
    pub coordinates: usize,

    /// Number of generalized speeds.
    pub speeds: usize,
}

/// A forward-dynamics model driven one stage at a time.
///
/// An evaluation walks the stages in a fixed order: refresh the state,
/// compute baseline actuation, override actuator forces, apply actuation,
/// compute and apply contact, then solve for accelerations. Each stage
/// overwrites the model's internal accumulators rather than adding to them,
/// so a full pass leaves no trace of the previous one.
///
/// Implementations are free to keep any internal representation; the
/// optimizer only relies on the ordering and on the slices it passes in
/// being sized from [`Model::dimensions`].
pub trait Model {
    /// The error returned when a stage of the simulation fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The actuators this model exposes.
    type Actuators: ActuatorSet;

    /// Returns the model's control, state, coordinate, and speed counts.
    fn dimensions(&self) -> Dimensions;

    /// Returns the current simulation time.
    fn time(&self) -> Time;

    /// Copies the full state vector into `y`.
    fn states(&self, y: &mut [f64]);

    /// Replaces the full state vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the model rejects the state.
    fn set_states(&mut self, y: &[f64]) -> Result<(), Self::Error>;

    /// Returns the actuator set.
    fn actuators(&self) -> &Self::Actuators;

    /// Returns the actuator set for force updates.
    fn actuators_mut(&mut self) -> &mut Self::Actuators;

    /// Computes the model-intrinsic actuator forces at the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if actuation cannot be computed.
    fn compute_actuation(&mut self) -> Result<(), Self::Error>;

    /// Applies the current actuator forces to the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the forces cannot be applied.
    fn apply_actuation(&mut self) -> Result<(), Self::Error>;

    /// Computes contact forces from the current, fully actuated, model.
    ///
    /// # Errors
    ///
    /// Returns an error if contact cannot be resolved.
    fn compute_contact(&mut self) -> Result<(), Self::Error>;

    /// Applies the computed contact forces to the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the forces cannot be applied.
    fn apply_contact(&mut self) -> Result<(), Self::Error>;

    /// Solves the dynamics for coordinate and speed derivatives.
    ///
    /// # Errors
    ///
    /// Returns an error if the dynamics solve fails, for example when the
    /// mass matrix is singular.
    fn compute_derivatives(
        &mut self,
        dqdt: &mut [f64],
        dudt: &mut [f64],
    ) -> Result<(), Self::Error>;
}

/// An ordered set of force-producing actuators.
pub trait ActuatorSet {
    /// Returns the number of actuators.
    fn len(&self) -> usize;

    /// Returns `true` if the set has no actuators.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the force of actuator `index`.
    fn force(&self, index: usize) -> f64;

    /// Overrides the force of actuator `index`.
    fn set_force(&mut self, index: usize, force: f64);

    /// Returns the normalized force loading of actuator `index`.
    fn stress(&self, index: usize) -> f64;
}

/// Tracked kinematic tasks scored against the model's accelerations.
///
/// After [`TaskSet::compute_accelerations`], the weights, desired
/// accelerations, and achieved accelerations are equal-length sequences in
/// task order.
pub trait TaskSet<M: Model> {
    /// Computes the achieved task accelerations from a solved model.
    ///
    /// # Errors
    ///
    /// Returns an error if the task kinematics cannot be evaluated.
    fn compute_accelerations(&mut self, model: &M, dudt: &[f64]) -> Result<(), M::Error>;

    /// Returns the per-task weights.
    fn weights(&self) -> &[f64];

    /// Returns the desired accelerations.
    fn desired_accelerations(&self) -> &[f64];

    /// Returns the achieved accelerations from the last computation.
    fn accelerations(&self) -> &[f64];
}
