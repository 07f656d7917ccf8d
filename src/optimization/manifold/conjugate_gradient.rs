//! Riemannian conjugate gradient on the Grassmann manifold.
//!
//! Purpose
//! -------
//! Minimize a [`SubspaceObjective`] with a Polak–Ribière (PR+) nonlinear
//! conjugate gradient method adapted to `Gr(r, u)`.
//!
//! Key behaviors
//! -------------
//! - Riemannian gradient `ξ = (I − XXᵀ)∇F(X)`.
//! - Armijo backtracking along the QR retraction `qf(X + αη)`.
//! - Vector transport by projection onto the new horizontal space.
//! - `β = max(0, ⟨ξ₊, ξ₊ − T(ξ)⟩ / ⟨ξ, ξ⟩)`; the direction is reset to
//!   steepest descent whenever it fails to be a descent direction.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every iterate is orthonormal (QR retraction).
//! - The objective value never increases between accepted iterates, so the
//!   returned basis is the best point visited.
//! - Termination is guaranteed: gradient tolerance, function tolerance,
//!   line-search stall, or `max_iter`, whichever comes first.
use log::{debug, info};
use ndarray::Array2;

use crate::optimization::{
    errors::OptResult,
    manifold::{
        grassmann::{check_basis_shape, inner, norm, project_horizontal, retract, riemannian_gradient},
        traits::{ManifoldOptimizer, ManifoldOptions, ManifoldOutcome, SubspaceObjective},
    },
    numerical_stability::relative_change,
};

/// Sufficient-decrease constant of the Armijo condition.
const ARMIJO_C1: f64 = 1e-4;
/// Step shrink factor used while backtracking.
const BACKTRACK: f64 = 0.5;
/// Maximum number of backtracking halvings per iteration.
const MAX_BACKTRACKS: usize = 60;

/// Grassmann Polak–Ribière conjugate gradient (the default solver).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrassmannCg;

impl ManifoldOptimizer for GrassmannCg {
    fn name(&self) -> &'static str {
        "grassmann-cg"
    }

    fn minimize(
        &self, objective: &dyn SubspaceObjective, start: Array2<f64>, options: &ManifoldOptions,
    ) -> OptResult<ManifoldOutcome> {
        check_basis_shape(objective, &start)?;
        let mut x = start;
        let mut f = objective.value(&x)?;
        let mut xi = riemannian_gradient(objective, &x)?;
        let mut eta = xi.mapv(|v| -v);
        let mut step = 0.0_f64;

        for iter in 0..options.max_iter {
            let grad_norm = norm(&xi);
            if options.verbose {
                info!("{} iter {iter}: f = {f:.10e}, |grad| = {grad_norm:.3e}", self.name());
            }
            if grad_norm < options.gradtol {
                return Ok(finish(x, f, true, "gradient norm below tolerance", iter, grad_norm));
            }

            let mut slope = inner(&xi, &eta);
            if slope >= 0.0 {
                eta = xi.mapv(|v| -v);
                slope = -grad_norm * grad_norm;
            }
            let alpha0 = if step > 0.0 { 2.0 * step } else { 1.0 / grad_norm.max(1.0) };

            let accepted = match armijo_search(objective, &x, f, &eta, slope, alpha0)? {
                Some(found) => Some(found),
                // Retry once along steepest descent before declaring a stall.
                None if slope > -grad_norm * grad_norm * (1.0 - 1e-12) => {
                    eta = xi.mapv(|v| -v);
                    let steepest = -grad_norm * grad_norm;
                    armijo_search(objective, &x, f, &eta, steepest, 1.0 / grad_norm.max(1.0))?
                }
                None => None,
            };
            let Some((alpha, x_new, f_new)) = accepted else {
                debug!("{}: line search stalled at iteration {iter}", self.name());
                return Ok(finish(x, f, false, "line search stalled", iter, grad_norm));
            };

            let xi_new = riemannian_gradient(objective, &x_new)?;
            let xi_moved = project_horizontal(&x_new, &xi);
            let eta_moved = project_horizontal(&x_new, &eta);
            let beta = (inner(&xi_new, &(&xi_new - &xi_moved)) / (grad_norm * grad_norm)).max(0.0);
            eta = &xi_new.mapv(|v| -v) + &(eta_moved * beta);

            let change = relative_change(f, f_new);
            x = x_new;
            f = f_new;
            xi = xi_new;
            step = alpha;

            if change < options.ftol {
                let grad_norm = norm(&xi);
                return Ok(finish(x, f, true, "function change below tolerance", iter + 1, grad_norm));
            }
        }
        let grad_norm = norm(&xi);
        let converged = grad_norm < options.gradtol;
        Ok(finish(x, f, converged, "maximum iterations reached", options.max_iter, grad_norm))
    }
}

// ---- Helper methods ----

/// Backtracking search for `F(qf(X + αη)) ≤ F(X) + c₁ α slope`.
///
/// Returns `None` if no step satisfies the condition within
/// [`MAX_BACKTRACKS`] halvings. Trial points where the objective or the
/// retraction fails are treated as rejected steps.
fn armijo_search(
    objective: &dyn SubspaceObjective, x: &Array2<f64>, f: f64, eta: &Array2<f64>, slope: f64,
    alpha0: f64,
) -> OptResult<Option<(f64, Array2<f64>, f64)>> {
    let mut alpha = alpha0;
    for _ in 0..MAX_BACKTRACKS {
        let trial = retract(x, &(eta * alpha)).and_then(|x_new| {
            let f_new = objective.value(&x_new)?;
            Ok((x_new, f_new))
        });
        if let Ok((x_new, f_new)) = trial {
            if f_new.is_finite() && f_new <= f + ARMIJO_C1 * alpha * slope {
                return Ok(Some((alpha, x_new, f_new)));
            }
        }
        alpha *= BACKTRACK;
    }
    Ok(None)
}

fn finish(
    basis: Array2<f64>, value: f64, converged: bool, status: &str, iterations: usize,
    grad_norm: f64,
) -> ManifoldOutcome {
    ManifoldOutcome { basis, value, converged, status: status.to_string(), iterations, grad_norm }
}
