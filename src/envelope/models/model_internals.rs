//! Henv model internals — likelihood constants, parameter counts and the
//! assembly of fitted parameters from an envelope subspace.
//!
//! Purpose
//! -------
//! Keep the closed-form pieces of `HenvModel::fit` in one place so the
//! boundary dimensions (`u = 0`, `u = r`) and the interior case share the
//! same formulas.
//!
//! Key behaviors
//! -------------
//! - [`gaussian_constant`] and [`loglik_from_objective`] map the profile
//!   objective `F` to the maximized log-likelihood.
//! - [`loglik_empty`] / [`loglik_full`] are the closed forms at `u = 0` and
//!   `u = r`.
//! - [`param_count`] counts free parameters for any `0 ≤ u ≤ r`.
//! - [`assemble`] builds `η`, `β`, group means, `Ω_i`, `Ω0` and `Σ_i` from
//!   `(Γ, Γ0)`; with an empty `Γ` or `Γ0` it reduces to the boundary fits.
//!
//! Invariants & assumptions
//! ------------------------
//! - `(Γ, Γ0)` is an orthonormal complementary pair.
//! - Group statistics come from a validated `GroupedData`.
use crate::{
    envelope::{
        core::{data::GroupedData, subspace::EnvelopeSubspace},
        errors::EnvelopeResult,
    },
    linalg::{log_det_spd, matrix_calculus::vech_len},
    optimization::numerical_stability::symmetrize,
};
use ndarray::{Array1, Array2, Axis};
use std::f64::consts::PI;

/// `−(nr/2)(1 + log 2π)`.
pub fn gaussian_constant(n: usize, r: usize) -> f64 {
    -0.5 * (n * r) as f64 * (1.0 + (2.0 * PI).ln())
}

/// `l = −(nr/2)(1 + log 2π) − F/2`.
pub fn loglik_from_objective(n: usize, r: usize, objective: f64) -> f64 {
    gaussian_constant(n, r) - 0.5 * objective
}

/// `u = 0`: `−(nr/2)(1 + log 2π) − (n/2) log det Σ_Y`.
pub fn loglik_empty(data: &GroupedData) -> f64 {
    gaussian_constant(data.n, data.r) - 0.5 * data.n as f64 * data.log_det_sigma_y
}

/// `u = r`: `−(nr/2)(1 + log 2π) − Σ_i (n_i/2) log det Σ_i`.
///
/// # Errors
/// `EnvelopeError::NumericalInstability` when some `Σ_i` is singular.
pub fn loglik_full(data: &GroupedData) -> EnvelopeResult<f64> {
    let mut total = gaussian_constant(data.n, data.r);
    for (cov, &count) in data.group_covs.iter().zip(&data.counts) {
        total -= 0.5 * count as f64 * log_det_spd(cov, "group covariance")?;
    }
    Ok(total)
}

/// `(r−u) + u(r−u+p) + p·u(u+1)/2 + (r−u)(r−u+1)/2`.
///
/// Equals `r + r(r+1)/2` at `u = 0` and `rp + p·r(r+1)/2` at `u = r`.
pub fn param_count(r: usize, u: usize, p: usize) -> usize {
    let d = r - u;
    d + u * (d + p) + p * vech_len(u) + vech_len(d)
}

/// Parameters implied by an envelope subspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembled {
    pub mu: Array1<f64>,
    pub eta: Array2<f64>,
    pub beta: Array2<f64>,
    pub mug: Array2<f64>,
    pub omega: Vec<Array2<f64>>,
    pub omega0: Array2<f64>,
    pub sigma: Vec<Array2<f64>>,
}

/// Assemble fitted parameters for `subspace`:
/// `η_i = Γᵀ(ȳ_i − μ)`, `β_i = Γη_i`, `μ_i = μ + β_i`, `Ω_i = ΓᵀΣ_iΓ`,
/// `Ω0 = Γ0ᵀΣ_YΓ0` and `Σ_i = ΓΩ_iΓᵀ + Γ0Ω0Γ0ᵀ`.
pub fn assemble(data: &GroupedData, subspace: &EnvelopeSubspace) -> Assembled {
    let gamma = &subspace.gamma;
    let gamma0 = &subspace.gamma0;
    let mu = data.grand_mean.clone();

    let centered = &data.group_means - &mu.view().insert_axis(Axis(1));
    let eta = gamma.t().dot(&centered);
    let beta = gamma.dot(&eta);
    let mug = &beta + &mu.view().insert_axis(Axis(1));

    let omega0 = symmetrize(&gamma0.t().dot(&data.sigma_y).dot(gamma0));
    let immaterial = gamma0.dot(&omega0).dot(&gamma0.t());
    let omega: Vec<Array2<f64>> =
        data.group_covs.iter().map(|cov| symmetrize(&gamma.t().dot(cov).dot(gamma))).collect();
    let sigma = omega
        .iter()
        .map(|om| symmetrize(&(gamma.dot(om).dot(&gamma.t()) + &immaterial)))
        .collect();

    Assembled { mu, eta, beta, mug, omega, omega0, sigma }
}

/// Fitted mean of each original observation: row `obs` is column
/// `group_index[obs]` of `mug`.
pub fn fitted_values(mug: &Array2<f64>, group_index: &[usize]) -> Array2<f64> {
    let r = mug.nrows();
    Array2::from_shape_fn((group_index.len(), r), |(obs, k)| mug[[k, group_index[obs]]])
}
