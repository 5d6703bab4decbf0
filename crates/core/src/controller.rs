use crate::{CallbackSet, Model, TaskSet};

/// Owns the simulation pieces an optimization target works against.
///
/// A target borrows its controller mutably for its whole lifetime, which
/// keeps every other collaborator from touching the model mid-solve.
pub trait Controller {
    /// The model being controlled.
    type Model: Model;

    /// The tasks tracked by the controller.
    type Tasks: TaskSet<Self::Model>;

    /// Returns the model, or `None` if no model is attached.
    fn model(&self) -> Option<&Self::Model>;

    /// Borrows the model, tasks, and callbacks together for one evaluation.
    ///
    /// Returns `None` if no model is attached.
    fn parts_mut(&mut self) -> Option<Parts<'_, Self::Model, Self::Tasks>>;
}

/// Disjoint mutable borrows of a controller's parts.
pub struct Parts<'a, M: Model, T> {
    pub model: &'a mut M,
    pub tasks: &'a mut T,
    pub callbacks: &'a mut CallbackSet<M>,
}
