use crate::ConstraintCounts;

/// A performance criterion and its constraints, evaluated by a solver.
///
/// This is the contract SQP-style solvers consume. Evaluations take
/// `&mut self` because targets are allowed to mutate shared simulation state
/// while computing a value; a target only promises that the same `x` under
/// the same model configuration yields the same result.
///
/// Constraint indices are 1-based, following solver convention.
///
/// A successful return stands in for a zero status code, an error for a
/// negative one.
pub trait OptimizationTarget {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the number of controls in `x`.
    fn num_controls(&self) -> usize;

    /// Returns the constraint structure.
    fn constraint_counts(&self) -> ConstraintCounts;

    /// Computes the performance criterion at `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if the performance cannot be evaluated.
    fn compute_performance(&mut self, x: &[f64]) -> Result<f64, Self::Error>;

    /// Computes constraint `ic` (1-based) at `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if the constraint cannot be evaluated.
    fn compute_constraint(&mut self, x: &[f64], ic: usize) -> Result<f64, Self::Error>;

    /// Writes the gradient of the performance criterion at `x` into `dpdx`.
    ///
    /// # Errors
    ///
    /// Returns an error if the gradient cannot be evaluated.
    fn compute_performance_gradient(
        &mut self,
        x: &[f64],
        dpdx: &mut [f64],
    ) -> Result<(), Self::Error>;

    /// Writes the gradient of constraint `ic` (1-based) at `x` into `dcdx`.
    ///
    /// # Errors
    ///
    /// Returns an error if the gradient cannot be evaluated.
    fn compute_constraint_gradient(
        &mut self,
        x: &[f64],
        ic: usize,
        dcdx: &mut [f64],
    ) -> Result<(), Self::Error>;

    /// Computes the performance and every constraint at `x`.
    ///
    /// Constraint values are written to the front of `c` in index order.
    ///
    /// # Errors
    ///
    /// Returns the first evaluation error.
    ///
    /// # Panics
    ///
    /// Panics if `c` holds fewer values than there are constraints.
    fn compute(&mut self, x: &[f64], c: &mut [f64]) -> Result<f64, Self::Error> {
        let nc = self.constraint_counts().total();
        let c = &mut c[..nc];

        let p = self.compute_performance(x)?;
        for (i, value) in c.iter_mut().enumerate() {
            *value = self.compute_constraint(x, i + 1)?;
        }
        Ok(p)
    }

    /// Computes the performance gradient and the constraint Jacobian at `x`.
    ///
    /// `dcdx` is row-major with one row of `num_controls` values per
    /// constraint.
    ///
    /// # Errors
    ///
    /// Returns the first evaluation error.
    ///
    /// # Panics
    ///
    /// Panics if `dcdx` holds fewer than `nc * num_controls` values.
    fn compute_gradients(
        &mut self,
        x: &[f64],
        dpdx: &mut [f64],
        dcdx: &mut [f64],
    ) -> Result<(), Self::Error> {
        let nc = self.constraint_counts().total();
        let nx = self.num_controls();
        let dcdx = &mut dcdx[..nc * nx];

        self.compute_performance_gradient(x, dpdx)?;
        if nc == 0 || nx == 0 {
            return Ok(());
        }
        for (i, row) in dcdx.chunks_exact_mut(nx).enumerate() {
            self.compute_constraint_gradient(x, i + 1, row)?;
        }
        Ok(())
    }
}
