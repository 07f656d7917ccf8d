//! loglik_optimizer::builders — L-BFGS solver construction.
//!
//! Purpose
//! -------
//! Turn an [`MLEOptions`] into a configured argmin L-BFGS solver for the
//! chosen line search. Builders apply history size and the gradient / cost
//! tolerances only; the starting point and the iteration cap are runtime
//! concerns handled by [`run_lbfgs`](super::run::run_lbfgs).
//!
//! Conventions
//! -----------
//! - History size is `opts.lbfgs_mem` or [`DEFAULT_LBFGS_MEM`].
//! - Tolerances argmin rejects surface as [`OptError`](crate::optimization::errors::OptError)
//!   through the crate's `From<argmin::core::Error>` conversion.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with Hager–Zhang line search, configured from `opts`.
///
/// # Errors
/// Tolerances rejected by argmin.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    build_lbfgs(HagerZhangLS::new(), opts)
}

/// L-BFGS with More–Thuente line search, configured from `opts`.
///
/// # Errors
/// Tolerances rejected by argmin.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    build_lbfgs(MoreThuenteLS::new(), opts)
}

/// configure_lbfgs — apply optional gradient / cost tolerances.
///
/// Parameters
/// ----------
/// - `solver`: pre-built L-BFGS over any line search `L`.
/// - `opts`: source of `tols.tol_grad` and `tols.tol_cost`.
///
/// Returns
/// -------
/// The solver with the tolerances that are `Some` applied; absent ones keep
/// argmin's defaults.
///
/// Errors
/// ------
/// Propagates argmin's rejection of a tolerance as `OptError`.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

// ---- Helper methods ----

fn build_lbfgs<L>(line_search: L, opts: &MLEOptions) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LBFGS::new(line_search, mem), opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::{LineSearcher, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Construction of both L-BFGS variants with default / explicit memory and
    // with present / absent tolerances. Execution is covered by the runner and
    // by the chart-based manifold solver tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Both builders succeed with default and explicit history sizes.
    //
    // Given
    // -----
    // - Valid tolerances; lbfgs_mem = None and Some(11).
    //
    // Expect
    // ------
    // - Every builder call returns Ok.
    fn builders_accept_default_and_explicit_memory() {
        // Arrange
        let tols = Tolerances::new(Some(1e-6), Some(1e-8), Some(50)).unwrap();

        for mem in [None, Some(11)] {
            let hz = MLEOptions::new(tols, LineSearcher::HagerZhang, false, mem).unwrap();
            let mt = MLEOptions::new(tols, LineSearcher::MoreThuente, false, mem).unwrap();

            // Act / Assert
            assert!(build_optimizer_hager_zhang(&hz).is_ok());
            assert!(build_optimizer_more_thuente(&mt).is_ok());
        }
    }

    #[test]
    // Purpose
    // -------
    // `configure_lbfgs` leaves argmin defaults in place when no tolerance is
    // given.
    //
    // Given
    // -----
    // - Tolerances with only max_iter set.
    //
    // Expect
    // ------
    // - Ok(_).
    fn configure_lbfgs_accepts_absent_tolerances() {
        // Arrange
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(50)).unwrap();
        let opts = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).unwrap();

        // Act
        let configured = configure_lbfgs(raw, &opts);

        // Assert
        assert!(configured.is_ok());
    }
}
