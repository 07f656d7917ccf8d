//! High-level entry point for maximizing a [`LogLikelihood`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome},
        types::Theta,
    },
};

/// Maximize `ℓ(θ)` with L-BFGS and the line search named in `opts`.
///
/// Validates the start with `f.check`, wraps `(f, data)` in an
/// [`ArgMinAdapter`] and hands the configured solver to [`run_lbfgs`].
///
/// # Errors
/// Errors from `f.check`, the solver builders and the run itself.
///
/// # Example
/// ```no_run
/// use envelope_models::optimization::errors::OptResult;
/// use envelope_models::optimization::loglik_optimizer::{
///     maximize, LogLikelihood, MLEOptions, Theta,
/// };
/// use ndarray::array;
///
/// struct Concave;
/// impl LogLikelihood for Concave {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Concave, array![0.1, -0.2], &(), &MLEOptions::default())?;
/// assert!(out.value <= 0.0);
/// # Ok::<(), envelope_models::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{Grad, Tolerances},
    };
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// ℓ(θ) = -(θ₀ - 1)² - 2(θ₁ + 0.5)², maximized at (1, -0.5).
    struct ShiftedBowl;

    impl LogLikelihood for ShiftedBowl {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            Ok(-(theta[0] - 1.0).powi(2) - 2.0 * (theta[1] + 0.5).powi(2))
        }

        fn check(&self, theta: &Theta, _: &()) -> OptResult<()> {
            if theta.len() != 2 {
                return Err(OptError::GradientDimMismatch { expected: 2, found: theta.len() });
            }
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            Ok(array![-2.0 * (theta[0] - 1.0), -4.0 * (theta[1] + 0.5)])
        }
    }

    #[test]
    // Purpose
    // -------
    // Both line searches locate the maximizer of a concave quadratic.
    //
    // Given
    // -----
    // - ShiftedBowl started at the origin.
    //
    // Expect
    // ------
    // - θ̂ ≈ (1, -0.5), ℓ(θ̂) ≈ 0 and a converged outcome.
    fn maximize_finds_quadratic_optimum_with_both_line_searches() {
        for ls in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Arrange
            let tols = Tolerances::new(Some(1e-8), None, Some(200)).unwrap();
            let opts = MLEOptions::new(tols, ls, false, None).unwrap();

            // Act
            let out = maximize(&ShiftedBowl, array![0.0, 0.0], &(), &opts).unwrap();

            // Assert
            assert!(out.converged, "{ls:?}: {}", out.status);
            assert_abs_diff_eq!(out.theta_hat[0], 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(out.theta_hat[1], -0.5, epsilon = 1e-5);
            assert_abs_diff_eq!(out.value, 0.0, epsilon = 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // `check` runs before the solver and its error is returned untouched.
    //
    // Given
    // -----
    // - A three-element start for a two-parameter objective.
    //
    // Expect
    // ------
    // - GradientDimMismatch from `check`.
    fn maximize_propagates_check_errors() {
        let out = maximize(&ShiftedBowl, array![0.0, 0.0, 0.0], &(), &MLEOptions::default());

        assert_eq!(out, Err(OptError::GradientDimMismatch { expected: 2, found: 3 }));
    }
}
