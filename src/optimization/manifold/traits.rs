//! Strategy traits and shared types for subspace optimization.
//!
//! - [`SubspaceObjective`]: a smooth function of an orthonormal `r×u` basis
//!   that depends only on the spanned subspace.
//! - [`ManifoldOptimizer`]: minimizes such an objective over the Grassmann
//!   manifold `Gr(r, u)`.
//! - [`ManifoldOptions`] / [`ManifoldOutcome`]: configuration and result.
use ndarray::Array2;
use std::str::FromStr;

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        LineSearcher,
        validation::{verify_max_iter, verify_tol_cost, verify_tol_grad},
    },
};

/// Objective `F(R)` on orthonormal `r×u` bases.
///
/// Implementations must satisfy `F(RQ) = F(R)` for orthogonal `Q`; the
/// optimizers rely on this to work with Riemannian (horizontal) gradients.
pub trait SubspaceObjective {
    /// `(r, u)`: ambient dimension and subspace dimension.
    fn dims(&self) -> (usize, usize);

    /// Evaluate `F(R)`.
    fn value(&self, basis: &Array2<f64>) -> OptResult<f64>;

    /// Euclidean gradient `∂F/∂R` (shape `r×u`).
    fn gradient(&self, basis: &Array2<f64>) -> OptResult<Array2<f64>>;
}

/// Minimizer of a [`SubspaceObjective`] over `Gr(r, u)`.
///
/// Implementations never fail because of slow progress: running out of
/// iterations is reported through [`ManifoldOutcome::converged`]. Errors
/// are reserved for shape problems and numerical breakdown.
pub trait ManifoldOptimizer {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Minimize `objective` starting from the orthonormal basis `start`.
    fn minimize(
        &self, objective: &dyn SubspaceObjective, start: Array2<f64>, options: &ManifoldOptions,
    ) -> OptResult<ManifoldOutcome>;
}

/// Stopping rules shared by the manifold optimizers.
///
/// - `max_iter`: hard cap on iterations.
/// - `ftol`: stop when `|Δf| / max(1, |f|) < ftol` after an accepted step.
/// - `gradtol`: stop when the Riemannian gradient norm drops below it.
/// - `verbose`: log progress at `info` level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManifoldOptions {
    pub max_iter: usize,
    pub ftol: f64,
    pub gradtol: f64,
    pub verbose: bool,
}

impl ManifoldOptions {
    /// Validated constructor.
    ///
    /// # Errors
    /// [`OptError::InvalidMaxIter`], [`OptError::InvalidTolCost`] (for
    /// `ftol`) or [`OptError::InvalidTolGrad`].
    pub fn new(max_iter: usize, ftol: f64, gradtol: f64, verbose: bool) -> OptResult<Self> {
        verify_max_iter(Some(max_iter))?;
        verify_tol_cost(Some(ftol))?;
        verify_tol_grad(Some(gradtol))?;
        Ok(Self { max_iter, ftol, gradtol, verbose })
    }
}

impl Default for ManifoldOptions {
    fn default() -> Self {
        Self { max_iter: 300, ftol: 1e-10, gradtol: 1e-7, verbose: false }
    }
}

/// Result of a manifold optimization.
///
/// `converged` is `true` when a gradient or function tolerance was met.
/// `basis` is always the best iterate seen, even when `converged` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifoldOutcome {
    pub basis: Array2<f64>,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub grad_norm: f64,
}

/// Built-in optimizer choice, parseable from `"cg"` / `"lbfgs"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverKind {
    /// Riemannian conjugate gradient on the Grassmann manifold.
    #[default]
    GrassmannCg,
    /// argmin L-BFGS in a re-centered local chart.
    ChartLbfgs(LineSearcher),
}

impl FromStr for SolverKind {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cg" | "grassmanncg" => Ok(SolverKind::GrassmannCg),
            "lbfgs" | "chartlbfgs" => Ok(SolverKind::ChartLbfgs(LineSearcher::MoreThuente)),
            "lbfgs-hz" | "lbfgs-hagerzhang" => Ok(SolverKind::ChartLbfgs(LineSearcher::HagerZhang)),
            _ => Err(OptError::InvalidSolver {
                name: s.to_string(),
                reason: "Valid options are 'cg', 'lbfgs' or 'lbfgs-hz'.",
            }),
        }
    }
}
