use sinew_core::Dimensions;

/// Scratch buffers sized once from model introspection.
///
/// Nothing here carries state between evaluations: the state buffer is
/// refreshed from the model, the derivative buffers are overwritten by the
/// model, and the state derivatives are zeroed before callbacks see them.
/// The buffers are never resized.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffers {
    pub(crate) controls: Vec<f64>,
    pub(crate) states: Vec<f64>,
    pub(crate) state_derivatives: Vec<f64>,
    pub(crate) coordinate_derivatives: Vec<f64>,
    pub(crate) speed_derivatives: Vec<f64>,
}

impl Buffers {
    /// Allocates zeroed buffers for a model of the given dimensions.
    #[must_use]
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            controls: vec![0.0; dimensions.controls],
            states: vec![0.0; dimensions.states],
            state_derivatives: vec![0.0; dimensions.states],
            coordinate_derivatives: vec![0.0; dimensions.coordinates],
            speed_derivatives: vec![0.0; dimensions.speeds],
        }
    }

    /// Returns the dimensions the buffers were sized for.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            controls: self.controls.len(),
            states: self.states.len(),
            coordinates: self.coordinate_derivatives.len(),
            speeds: self.speed_derivatives.len(),
        }
    }

    /// Returns the control buffer handed to derivative callbacks as `x`.
    ///
    /// The buffer is sized from the model's control count and is never
    /// written, so callbacks always see zeros here. Actuator forces under
    /// evaluation are read from the model's actuator set instead.
    #[must_use]
    pub fn controls(&self) -> &[f64] {
        &self.controls
    }

    /// Returns the state read at the start of the last evaluation.
    #[must_use]
    pub fn states(&self) -> &[f64] {
        &self.states
    }

    /// Returns the state derivatives from the last evaluation.
    #[must_use]
    pub fn state_derivatives(&self) -> &[f64] {
        &self.state_derivatives
    }

    /// Returns the coordinate derivatives from the last evaluation.
    #[must_use]
    pub fn coordinate_derivatives(&self) -> &[f64] {
        &self.coordinate_derivatives
    }

    /// Returns the speed derivatives (accelerations) from the last evaluation.
    #[must_use]
    pub fn speed_derivatives(&self) -> &[f64] {
        &self.speed_derivatives
    }
}
