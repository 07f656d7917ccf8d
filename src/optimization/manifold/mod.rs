//! manifold — optimization over the Grassmann manifold `Gr(r, u)`.
//!
//! Purpose
//! -------
//! Minimize subspace objectives `F(R)` (functions of an orthonormal `r×u`
//! basis that depend only on its span). The envelope estimator consumes
//! this layer through the [`ManifoldOptimizer`] trait, so the algorithm is
//! a pluggable strategy.
//!
//! Key behaviors
//! -------------
//! - [`GrassmannCg`] (default): Riemannian Polak–Ribière conjugate gradient
//!   with QR retraction and Armijo backtracking.
//! - [`ChartLbfgs`]: argmin L-BFGS in a re-centered graph chart, built on
//!   `loglik_optimizer`.
//! - [`SolverKind`] selects one of the two and builds it with
//!   [`SolverKind::build`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Starting bases are orthonormal with the shape reported by
//!   [`SubspaceObjective::dims`].
//! - Non-convergence is a flag on [`ManifoldOutcome`], never an error.
//!
//! Testing notes
//! -------------
//! - Solvers are tested on Rayleigh quotients `tr(XᵀSX)`, whose minimizers
//!   are known eigenspaces, and against each other.

pub mod chart;
pub mod conjugate_gradient;
pub mod grassmann;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::{
    chart::ChartLbfgs,
    conjugate_gradient::GrassmannCg,
    grassmann::GraphChart,
    traits::{ManifoldOptimizer, ManifoldOptions, ManifoldOutcome, SolverKind, SubspaceObjective},
};

impl SolverKind {
    /// Boxed optimizer for this choice.
    pub fn build(self) -> Box<dyn ManifoldOptimizer> {
        match self {
            SolverKind::GrassmannCg => Box::new(GrassmannCg),
            SolverKind::ChartLbfgs(line_searcher) => Box::new(ChartLbfgs::new(line_searcher)),
        }
    }
}

pub mod prelude {
    pub use super::{
        ChartLbfgs, GrassmannCg, ManifoldOptimizer, ManifoldOptions, ManifoldOutcome, SolverKind,
        SubspaceObjective,
    };
}
