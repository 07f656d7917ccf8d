//! Heteroscedastic envelope model — fitting entry point and fitted results.
//!
//! Purpose
//! -------
//! Estimate the heteroscedastic envelope model
//! `Y | group i ~ N(μ + Γη_i, ΓΩ_iΓᵀ + Γ0Ω0Γ0ᵀ)` by maximum likelihood for a
//! given envelope dimension `u`, and attach closed-form asymptotic standard
//! errors for the group means and effects.
//!
//! Key behaviors
//! -------------
//! - [`HenvModel::fit`] validates all inputs before computing anything, then
//!   dispatches on `u`:
//!   - `u = 0`: closed form, `Σ_i = Σ_Y`, no mean-effect inference;
//!   - `u = r`: closed form, the unrestricted group-wise Gaussian fit;
//!   - `0 < u < r`: eigenvector-subset start, then the configured
//!     [`ManifoldOptimizer`] minimizes the profile objective over `Gr(r, u)`.
//! - Optimizer non-convergence is not an error: the best basis is used, a
//!   `warn!` is logged and [`OptimizerSummary::converged`] is `false`.
//!   [`HenvFit::require_converged`] turns it into an error for strict
//!   callers.
//!
//! Invariants & assumptions
//! ------------------------
//! - Returned fits satisfy `ΓᵀΓ = I`, `Γ0ᵀΓ0 = I`, `ΓᵀΓ0 = 0` and
//!   `Σ_i = ΓΩ_iΓᵀ + Γ0Ω0Γ0ᵀ`.
//! - `HenvOptions` are read, never modified.
//!
//! Conventions
//! -----------
//! - Matrices with one column per group (`mug`, `beta`, `eta`) follow the
//!   sorted group order of `GroupedData`; `fitted_values` and `residuals`
//!   follow the original row order.
//! - Asymptotic quantities are per observation (divide by `n`).
//!
//! Downstream usage
//! ----------------
//! - `HenvFit::predict` reuses the stored group rows and covariances.
//! - `selection` fits every `u` and compares `loglik` / `param_num`.
use crate::{
    envelope::{
        core::{
            data::GroupedData,
            init::eigen_subset_start,
            objective::HenvObjective,
            options::HenvOptions,
            subspace::EnvelopeSubspace,
            validation::{validate_dimension, validate_initial_basis, validate_observations},
        },
        errors::{EnvelopeError, EnvelopeResult},
        models::model_internals::{
            Assembled, assemble, fitted_values, loglik_empty, loglik_from_objective, loglik_full,
            param_count,
        },
    },
    inference::{
        AsymptoticCovariance, EnvelopeParams, envelope_asymptotics, fisher_information,
        full_model_asymptotics, reparameterization_jacobian,
    },
    linalg::orthonormalize,
    optimization::manifold::{ManifoldOptimizer, SubspaceObjective},
};
use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView2};

/// Solver label used for the closed-form boundary fits.
pub const CLOSED_FORM: &str = "closed-form";

/// Entry point for heteroscedastic envelope estimation.
#[derive(Debug, Clone, Copy, Default)]
pub struct HenvModel;

/// OptimizerSummary — diagnostics of the subspace optimization.
///
/// For `u = 0` and `u = r` no optimization runs: `solver` is
/// [`CLOSED_FORM`], `converged` is `true` and `iterations` is 0.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerSummary {
    pub solver: &'static str,
    pub converged: bool,
    pub iterations: usize,
    pub status: String,
    pub grad_norm: f64,
    /// Profile objective `F` at the returned basis.
    pub objective: f64,
}

/// HenvFit — immutable result of [`HenvModel::fit`].
///
/// Fields
/// ------
/// - `n`, `r`, `p`, `u`: sizes of the problem.
/// - `mu` (`r`): grand mean; `mug` (`r×p`): fitted group means;
///   `beta` (`r×p`): group effects `Γη_i`; `eta` (`u×p`).
/// - `gamma` (`r×u`), `gamma0` (`r×(r−u)`): envelope basis and complement.
/// - `sigma`: fitted group covariances; `omega`: `Ω_i` (`u×u`);
///   `omega0` (`(r−u)×(r−u)`).
/// - `loglik`, `param_num`: maximized log-likelihood and number of free
///   parameters.
/// - `fitted_values`, `residuals` (`n×r`), `group_index` (`n`): per
///   observation, in original row order.
/// - `groups` (`p×k`), `counts`, `sigma_y`: data summaries kept for
///   prediction.
/// - `optimizer`: [`OptimizerSummary`].
/// - `asymptotics`: covariance of `(μ, β_1..β_{p−1})`, standard errors and
///   efficiency ratios; `None` when `u = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct HenvFit {
    pub n: usize,
    pub r: usize,
    pub p: usize,
    pub u: usize,
    pub mu: Array1<f64>,
    pub mug: Array2<f64>,
    pub beta: Array2<f64>,
    pub eta: Array2<f64>,
    pub gamma: Array2<f64>,
    pub gamma0: Array2<f64>,
    pub sigma: Vec<Array2<f64>>,
    pub omega: Vec<Array2<f64>>,
    pub omega0: Array2<f64>,
    pub loglik: f64,
    pub param_num: usize,
    pub fitted_values: Array2<f64>,
    pub residuals: Array2<f64>,
    pub group_index: Vec<usize>,
    pub groups: Array2<f64>,
    pub counts: Vec<usize>,
    pub sigma_y: Array2<f64>,
    pub optimizer: OptimizerSummary,
    pub asymptotics: Option<AsymptoticCovariance>,
}

impl HenvModel {
    /// Fit the heteroscedastic envelope model of dimension `u`.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `n×k` group-indicator rows (any finite coding; equal rows form
    ///   a group).
    /// - `y`: `n×r` responses.
    /// - `u`: envelope dimension, `0 ≤ u ≤ r`.
    /// - `options`: validated [`HenvOptions`].
    ///
    /// Errors
    /// ------
    /// Checked in this order, before any statistic is computed:
    /// - `EnvelopeError::InvalidDimension` for `u > r`.
    /// - `EnvelopeError::EmptyData`, `DimensionMismatch` (row counts) or
    ///   `NonFiniteData`.
    /// - `EnvelopeError::DimensionMismatch` / `RankDeficientInitialization`
    ///   for a bad `options.initial_basis`.
    /// - `EnvelopeError::InsufficientGroupSize` when some `n_i < r`.
    ///
    /// Afterwards, decomposition failures surface as
    /// `EnvelopeError::NumericalInstability`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use envelope_models::envelope::{HenvModel, HenvOptions};
    /// let x = array![[0.0], [0.0], [0.0], [1.0], [1.0], [1.0]];
    /// let y = array![[1.0, 0.2], [2.0, -0.1], [1.5, 0.4], [4.0, 0.0], [5.0, 0.3], [4.4, -0.2]];
    /// let fit = HenvModel::fit(x.view(), y.view(), 2, &HenvOptions::default()).unwrap();
    /// assert_eq!(fit.param_num, 2 * 2 + 2 * 3);
    /// assert!(fit.asymptotics.is_some());
    /// ```
    pub fn fit(
        x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>, u: usize, options: &HenvOptions,
    ) -> EnvelopeResult<HenvFit> {
        let r = y.ncols();
        validate_dimension(u, r)?;
        validate_observations(x, y)?;
        if let Some(basis) = &options.initial_basis {
            validate_initial_basis(basis, r, u)?;
        }
        let data = GroupedData::new(x, y)?;
        debug!("henv fit: n = {}, r = {r}, p = {}, u = {u}", data.n, data.p);

        let (subspace, loglik, optimizer) = if u == 0 {
            debug!("henv fit: u = 0, closed form");
            (EnvelopeSubspace::empty(r), loglik_empty(&data), closed_form_summary(&data, 0)?)
        } else if u == r {
            debug!("henv fit: u = r, closed form");
            (EnvelopeSubspace::full(r), loglik_full(&data)?, closed_form_summary(&data, r)?)
        } else {
            optimize_subspace(&data, u, options)?
        };

        let Assembled { mu, eta, beta, mug, omega, omega0, sigma } = assemble(&data, &subspace);
        let asymptotics = if u == 0 {
            None
        } else {
            let j = fisher_information(&sigma, &data.fractions())?;
            let cov = if u == r {
                full_model_asymptotics(&j, r, data.p)?
            } else {
                let params = EnvelopeParams {
                    gamma: &subspace.gamma,
                    gamma0: &subspace.gamma0,
                    eta: &eta,
                    omegas: &omega,
                    omega0: &omega0,
                };
                envelope_asymptotics(&j, &reparameterization_jacobian(&params)?, r, data.p)?
            };
            Some(cov)
        };

        let fitted = fitted_values(&mug, &data.group_index);
        let residuals = &y - &fitted;
        Ok(HenvFit {
            n: data.n,
            r,
            p: data.p,
            u,
            mu,
            mug,
            beta,
            eta,
            gamma: subspace.gamma,
            gamma0: subspace.gamma0,
            sigma,
            omega,
            omega0,
            loglik,
            param_num: param_count(r, u, data.p),
            fitted_values: fitted,
            residuals,
            group_index: data.group_index,
            groups: data.groups,
            counts: data.counts,
            sigma_y: data.sigma_y,
            optimizer,
            asymptotics,
        })
    }
}

impl HenvFit {
    /// The fit itself if the optimizer converged.
    ///
    /// # Errors
    /// `EnvelopeError::OptimizerNonConvergence` with the iteration count and
    /// the optimizer's status message.
    pub fn require_converged(&self) -> EnvelopeResult<&Self> {
        if self.optimizer.converged {
            Ok(self)
        } else {
            Err(EnvelopeError::OptimizerNonConvergence {
                iterations: self.optimizer.iterations,
                status: self.optimizer.status.clone(),
            })
        }
    }

    /// Asymptotic standard errors divided by `√n`, when available.
    pub fn standard_errors(&self) -> Option<Array2<f64>> {
        let scale = (self.n as f64).sqrt();
        self.asymptotics.as_ref().map(|a| a.asy_se.mapv(|v| v / scale))
    }
}

// ---- Helper methods ----

fn closed_form_summary(data: &GroupedData, u: usize) -> EnvelopeResult<OptimizerSummary> {
    let basis = if u == 0 { Array2::zeros((data.r, 0)) } else { Array2::eye(data.r) };
    let objective = HenvObjective::new(data, u)?.value(&basis)?;
    Ok(OptimizerSummary {
        solver: CLOSED_FORM,
        converged: true,
        iterations: 0,
        status: "closed-form solution".to_string(),
        grad_norm: 0.0,
        objective,
    })
}

fn optimize_subspace(
    data: &GroupedData, u: usize, options: &HenvOptions,
) -> EnvelopeResult<(EnvelopeSubspace, f64, OptimizerSummary)> {
    let objective = HenvObjective::new(data, u)?;
    let start = match &options.initial_basis {
        Some(basis) => orthonormalize(basis)?,
        None => eigen_subset_start(data, &objective)?,
    };
    let optimizer: Box<dyn ManifoldOptimizer> = options.solver.build();
    if options.verbose {
        info!("henv fit: optimizing over Gr({}, {u}) with {}", data.r, optimizer.name());
    }
    let outcome = optimizer.minimize(&objective, start, &options.manifold_options())?;
    if !outcome.converged {
        warn!(
            "henv fit: {} did not converge after {} iterations ({}); using best basis",
            optimizer.name(),
            outcome.iterations,
            outcome.status
        );
    }
    debug!(
        "henv fit: objective {} after {} iterations, gradient norm {:e}",
        outcome.value, outcome.iterations, outcome.grad_norm
    );

    let subspace = EnvelopeSubspace::from_basis(&outcome.basis)?;
    let loglik = loglik_from_objective(data.n, data.r, outcome.value);
    let summary = OptimizerSummary {
        solver: optimizer.name(),
        converged: outcome.converged,
        iterations: outcome.iterations,
        status: outcome.status,
        grad_norm: outcome.grad_norm,
        objective: outcome.value,
    };
    Ok((subspace, loglik, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        envelope::core::test_support::grouped_sample,
        linalg::log_det_spd,
        optimization::manifold::SolverKind,
    };
    use approx::assert_abs_diff_eq;
    use ndarray::{array, concatenate, Axis};

    // ---- Scope ----
    // Precondition order, closed-form boundary fits, structural identities of
    // interior fits and the non-convergence contract. Recovery and
    // selection on simulated data live in the integration tests.

    fn assert_orthonormal_pair(fit: &HenvFit) {
        let full = concatenate![Axis(1), fit.gamma, fit.gamma0];
        let gram = full.t().dot(&full);
        for ((i, j), v) in gram.indexed_iter() {
            assert_abs_diff_eq!(*v, if i == j { 1.0 } else { 0.0 }, epsilon = 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // Preconditions fail in the documented order.
    //
    // Given
    // -----
    // - u > r together with mismatched rows; then mismatched rows with NaN;
    //   then a bad initial basis with an undersized group.
    //
    // Expect
    // ------
    // - InvalidDimension, then DimensionMismatch, then the basis error.
    fn preconditions_fail_in_order() {
        // Arrange
        let x = array![[0.0], [1.0], [1.0]];
        let y = array![[f64::NAN, 0.0], [1.0, 2.0]];
        let y3 = array![[0.0, 0.0], [1.0, 2.0], [0.5, 0.1]];
        let opts = HenvOptions::default().with_initial_basis(array![[1.0], [1.0], [0.0]]);

        // Act
        let too_big = HenvModel::fit(x.view(), y.view(), 3, &HenvOptions::default());
        let rows = HenvModel::fit(x.view(), y.view(), 1, &HenvOptions::default());
        let basis = HenvModel::fit(x.view(), y3.view(), 1, &opts);

        // Assert
        assert_eq!(too_big.unwrap_err(), EnvelopeError::InvalidDimension { u: 3, r: 2 });
        assert!(matches!(rows.unwrap_err(), EnvelopeError::DimensionMismatch { .. }));
        assert!(matches!(
            basis.unwrap_err(),
            EnvelopeError::DimensionMismatch { context: "initial basis rows", .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Small groups are rejected before any decomposition.
    //
    // Given
    // -----
    // - r = 3, one group of size 2 and degenerate (all-zero) responses.
    //
    // Expect
    // ------
    // - InsufficientGroupSize, never NumericalInstability.
    fn insufficient_group_size_is_reported_first() {
        let x = array![[0.0], [0.0], [1.0], [1.0], [1.0]];
        let y = Array2::<f64>::zeros((5, 3));

        let err = HenvModel::fit(x.view(), y.view(), 1, &HenvOptions::default()).unwrap_err();

        assert_eq!(err, EnvelopeError::InsufficientGroupSize { group: 0, size: 2, required: 3 });
    }

    #[test]
    // Purpose
    // -------
    // The boundary fits match their closed forms.
    //
    // Given
    // -----
    // - Seeded r = 3, p = 2 data, fitted with u = 0 and u = r.
    //
    // Expect
    // ------
    // - u = 0: Σ_i = Σ_Y, β = 0, no asymptotics, closed-form log-likelihood.
    // - u = r: Σ_i = sample Σ_i, ratio ≡ 1, l(u = r) ≥ l(u = 0).
    fn boundary_fits_match_closed_forms() {
        // Arrange
        let (x, y) = grouped_sample(21, 3, 2, 25, 2.5);
        let data = GroupedData::new(x.view(), y.view()).unwrap();
        let n = data.n as f64;
        let constant = -0.5 * n * 3.0 * (1.0 + (2.0 * std::f64::consts::PI).ln());

        // Act
        let empty = HenvModel::fit(x.view(), y.view(), 0, &HenvOptions::default()).unwrap();
        let full = HenvModel::fit(x.view(), y.view(), 3, &HenvOptions::default()).unwrap();

        // Assert
        assert!(empty.asymptotics.is_none());
        assert!(empty.beta.iter().all(|v| *v == 0.0));
        assert_abs_diff_eq!(empty.loglik, constant - 0.5 * n * data.log_det_sigma_y, epsilon = 1e-8);
        assert_eq!(empty.param_num, 3 + 6);
        assert_eq!(empty.optimizer.solver, CLOSED_FORM);

        let expected_full: f64 = constant
            - data
                .group_covs
                .iter()
                .zip(&data.counts)
                .map(|(c, &k)| 0.5 * k as f64 * log_det_spd(c, "test").unwrap())
                .sum::<f64>();
        assert_abs_diff_eq!(full.loglik, expected_full, epsilon = 1e-8);
        assert_eq!(full.param_num, 3 * 2 + 2 * 6);
        let ratio = &full.asymptotics.as_ref().unwrap().ratio;
        assert!(ratio.iter().all(|v| *v == 1.0));
        assert!(full.loglik >= empty.loglik);
        assert_orthonormal_pair(&empty);
        assert_orthonormal_pair(&full);
    }

    #[test]
    // Purpose
    // -------
    // Interior fits satisfy the structural identities and agree across
    // solvers.
    //
    // Given
    // -----
    // - Seeded r = 3, p = 2 data, u = 1, CG and chart L-BFGS.
    //
    // Expect
    // ------
    // - Orthonormal complementary bases, Σ_i = ΓΩ_iΓᵀ + Γ0Ω0Γ0ᵀ, residuals
    //   = Y − fitted, l(u=0) ≤ l(u=1) ≤ l(u=r), and matching log-likelihoods.
    fn interior_fit_identities() {
        // Arrange
        let (x, y) = grouped_sample(8, 3, 2, 30, 4.0);
        let lbfgs = HenvOptions::default().with_solver(SolverKind::ChartLbfgs(Default::default()));

        // Act
        let fit = HenvModel::fit(x.view(), y.view(), 1, &HenvOptions::default()).unwrap();
        let alt = HenvModel::fit(x.view(), y.view(), 1, &lbfgs).unwrap();
        let empty = HenvModel::fit(x.view(), y.view(), 0, &HenvOptions::default()).unwrap();
        let full = HenvModel::fit(x.view(), y.view(), 3, &HenvOptions::default()).unwrap();

        // Assert
        assert!(fit.optimizer.converged || fit.optimizer.grad_norm < 1e-4, "{}", fit.optimizer.status);
        assert_orthonormal_pair(&fit);
        for (g, sigma) in fit.sigma.iter().enumerate() {
            let rebuilt = fit.gamma.dot(&fit.omega[g]).dot(&fit.gamma.t())
                + fit.gamma0.dot(&fit.omega0).dot(&fit.gamma0.t());
            for (a, b) in sigma.iter().zip(rebuilt.iter()) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-10);
            }
        }
        let rebuilt_y = &fit.fitted_values + &fit.residuals;
        for (a, b) in rebuilt_y.iter().zip(y.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
        assert!(empty.loglik <= fit.loglik + 1e-8);
        assert!(fit.loglik <= full.loglik + 1e-8);
        assert_abs_diff_eq!(fit.loglik, alt.loglik, epsilon = 1e-5);
        assert_eq!(fit.asymptotics.as_ref().unwrap().asy_se.dim(), (3, 2));
    }

    #[test]
    // Purpose
    // -------
    // Running out of iterations is reported, not raised.
    //
    // Given
    // -----
    // - u = 1 with max_iter = 1 and a tight gradient tolerance, started
    //   away from the optimum.
    //
    // Expect
    // ------
    // - fit succeeds; if it did not converge, require_converged reports
    //   OptimizerNonConvergence with the iteration count.
    fn non_convergence_is_a_flag() {
        let (x, y) = grouped_sample(13, 3, 2, 30, 4.0);
        let opts = HenvOptions::new(1, 1e-16, 1e-14, false)
            .unwrap()
            .with_initial_basis(array![[0.0], [0.0], [1.0]]);

        let fit = HenvModel::fit(x.view(), y.view(), 1, &opts).unwrap();

        assert!(fit.optimizer.iterations <= 1);
        if !fit.optimizer.converged {
            assert!(matches!(
                fit.require_converged(),
                Err(EnvelopeError::OptimizerNonConvergence { .. })
            ));
        }
    }
}
