//! Henv options — configuration for heteroscedastic envelope fits.
//!
//! Purpose
//! -------
//! Collect the knobs of `HenvModel::fit` in one validated struct that is
//! resolved once and never mutated by the estimator: optimizer stopping
//! rules, verbosity, an optional starting basis and the manifold solver.
//!
//! Invariants & assumptions
//! ------------------------
//! - `max_iter > 0`, and `ftol` / `gradtol` are finite and positive
//!   (enforced by [`HenvOptions::new`] through `ManifoldOptions::new`).
//! - `initial_basis` is checked against the data (shape `r×u`, rank `u`)
//!   only when a fit runs, since `r` and `u` are not known here.
//!
//! Conventions
//! -----------
//! - Defaults: `max_iter = 300`, `ftol = 1e-10`, `gradtol = 1e-7`,
//!   `verbose = false`, no initial basis, Grassmann conjugate gradient.
use crate::{
    envelope::errors::EnvelopeResult,
    optimization::manifold::{ManifoldOptions, SolverKind},
};
use ndarray::Array2;

/// HenvOptions — estimation-time configuration for `henv`.
///
/// Fields
/// ------
/// - `max_iter`: iteration cap for the manifold optimizer.
/// - `ftol`: relative objective-change tolerance.
/// - `gradtol`: Riemannian gradient-norm tolerance.
/// - `verbose`: log optimizer progress at `info` level.
/// - `initial_basis`: optional `r×u` starting basis; when `None` the
///   eigenvector-subset initializer is used.
/// - `solver`: which built-in manifold optimizer to run.
#[derive(Debug, Clone, PartialEq)]
pub struct HenvOptions {
    pub max_iter: usize,
    pub ftol: f64,
    pub gradtol: f64,
    pub verbose: bool,
    pub initial_basis: Option<Array2<f64>>,
    pub solver: SolverKind,
}

impl HenvOptions {
    /// Validated constructor.
    ///
    /// # Errors
    /// `EnvelopeError::Optimization` wrapping `InvalidMaxIter`,
    /// `InvalidTolCost` or `InvalidTolGrad`.
    ///
    /// # Examples
    /// ```rust
    /// # use envelope_models::envelope::core::options::HenvOptions;
    /// let opts = HenvOptions::new(500, 1e-12, 1e-8, false).unwrap();
    /// assert_eq!(opts.max_iter, 500);
    /// assert!(HenvOptions::new(0, 1e-12, 1e-8, false).is_err());
    /// ```
    pub fn new(max_iter: usize, ftol: f64, gradtol: f64, verbose: bool) -> EnvelopeResult<Self> {
        ManifoldOptions::new(max_iter, ftol, gradtol, verbose)?;
        Ok(Self { max_iter, ftol, gradtol, verbose, initial_basis: None, solver: SolverKind::default() })
    }

    /// Start the optimizer from `basis` instead of the default initializer.
    pub fn with_initial_basis(mut self, basis: Array2<f64>) -> Self {
        self.initial_basis = Some(basis);
        self
    }

    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    /// Stopping rules handed to the manifold optimizer.
    pub fn manifold_options(&self) -> ManifoldOptions {
        ManifoldOptions {
            max_iter: self.max_iter,
            ftol: self.ftol,
            gradtol: self.gradtol,
            verbose: self.verbose,
        }
    }
}

impl Default for HenvOptions {
    fn default() -> Self {
        let manifold = ManifoldOptions::default();
        Self {
            max_iter: manifold.max_iter,
            ftol: manifold.ftol,
            gradtol: manifold.gradtol,
            verbose: manifold.verbose,
            initial_basis: None,
            solver: SolverKind::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{envelope::errors::EnvelopeError, optimization::loglik_optimizer::LineSearcher};
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Defaults match the documented values and builders only touch their
    // own field.
    //
    // Given
    // -----
    // - HenvOptions::default() with a solver and a basis attached.
    //
    // Expect
    // ------
    // - 300 / 1e-10 / 1e-7 / false, the chosen solver and basis, and
    //   manifold_options() mirroring the stopping rules.
    fn defaults_and_builders() {
        // Arrange
        let basis = array![[1.0], [0.0]];

        // Act
        let opts = HenvOptions::default()
            .with_solver(SolverKind::ChartLbfgs(LineSearcher::HagerZhang))
            .with_initial_basis(basis.clone());

        // Assert
        assert_eq!(opts.max_iter, 300);
        assert_eq!(opts.ftol, 1e-10);
        assert_eq!(opts.gradtol, 1e-7);
        assert!(!opts.verbose);
        assert_eq!(opts.initial_basis, Some(basis));
        assert_eq!(opts.solver, SolverKind::ChartLbfgs(LineSearcher::HagerZhang));
        assert_eq!(opts.manifold_options(), ManifoldOptions::default());
    }

    #[test]
    // Purpose
    // -------
    // Invalid tolerances are rejected at construction.
    //
    // Given
    // -----
    // - A negative ftol.
    //
    // Expect
    // ------
    // - An Optimization error.
    fn invalid_tolerances_are_rejected() {
        let err = HenvOptions::new(10, -1.0, 1e-7, false).unwrap_err();
        assert!(matches!(err, EnvelopeError::Optimization(_)));
    }
}
