use thiserror::Error;

/// Constraint structure reported to a solver.
///
/// Inequality and equality counts each include a nonlinear sub-count, so the
/// nonlinear count can never exceed the total of its kind. Nonlinear
/// constraints come first in solver index order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintCounts {
    nonlinear_inequality: usize,
    inequality: usize,
    nonlinear_equality: usize,
    equality: usize,
}

/// Errors that can occur when building [`ConstraintCounts`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintCountsError {
    #[error("{nonlinear} nonlinear inequality constraints exceed the total of {total}")]
    Inequality { nonlinear: usize, total: usize },

    #[error("{nonlinear} nonlinear equality constraints exceed the total of {total}")]
    Equality { nonlinear: usize, total: usize },
}

impl ConstraintCounts {
    /// No constraints of any kind.
    pub const NONE: Self = Self {
        nonlinear_inequality: 0,
        inequality: 0,
        nonlinear_equality: 0,
        equality: 0,
    };

    /// Creates validated constraint counts.
    ///
    /// # Errors
    ///
    /// Returns an error if a nonlinear count exceeds the total of its kind.
    pub fn new(
        nonlinear_inequality: usize,
        inequality: usize,
        nonlinear_equality: usize,
        equality: usize,
    ) -> Result<Self, ConstraintCountsError> {
        if nonlinear_inequality > inequality {
            return Err(ConstraintCountsError::Inequality {
                nonlinear: nonlinear_inequality,
                total: inequality,
            });
        }
        if nonlinear_equality > equality {
            return Err(ConstraintCountsError::Equality {
                nonlinear: nonlinear_equality,
                total: equality,
            });
        }

        Ok(Self {
            nonlinear_inequality,
            inequality,
            nonlinear_equality,
            equality,
        })
    }

    /// Returns the number of nonlinear inequality constraints.
    #[must_use]
    pub fn nonlinear_inequality(&self) -> usize {
        self.nonlinear_inequality
    }

    /// Returns the number of linear inequality constraints.
    #[must_use]
    pub fn linear_inequality(&self) -> usize {
        self.inequality - self.nonlinear_inequality
    }

    /// Returns the total number of inequality constraints.
    #[must_use]
    pub fn inequality(&self) -> usize {
        self.inequality
    }

    /// Returns the number of nonlinear equality constraints.
    #[must_use]
    pub fn nonlinear_equality(&self) -> usize {
        self.nonlinear_equality
    }

    /// Returns the number of linear equality constraints.
    #[must_use]
    pub fn linear_equality(&self) -> usize {
        self.equality - self.nonlinear_equality
    }

    /// Returns the total number of equality constraints.
    #[must_use]
    pub fn equality(&self) -> usize {
        self.equality
    }

    /// Returns the total number of constraints.
    #[must_use]
    pub fn total(&self) -> usize {
        self.inequality + self.equality
    }

    /// Returns `true` if there are no constraints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
