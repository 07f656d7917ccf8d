//! Asymptotic covariance of the mean parameters.
//!
//! Purpose
//! -------
//! Turn a Fisher information `J` (and, for envelope fits, a
//! reparameterization Jacobian `H`) into asymptotic covariances and standard
//! errors for `(μ, β_1, …, β_{p−1})`, together with the efficiency ratio of
//! the envelope estimator relative to the unrestricted one.
//!
//! Key behaviors
//! -------------
//! - Envelope: `avar = H (HᵀJH)⁺ Hᵀ`, with the Moore–Penrose inverse taken
//!   through a symmetric eigendecomposition.
//! - Unrestricted: `avar = J⁻¹`.
//! - `cov_matrix` is the leading `rp × rp` block of `avar`; `asy_se` is the
//!   square root of its diagonal reshaped column-major to `r×p` (column 0 is
//!   `μ`, column `i` is `β_i`); `asy_se_full` is the same from `J⁻¹`.
//! - `ratio = asy_se_full / asy_se` element-wise, not clamped.
//!
//! Conventions
//! -----------
//! - Everything is on the per-observation scale: divide covariances by `n`
//!   (standard errors by `√n`) for finite-sample values.
use crate::{
    inference::errors::{InferenceError, InferenceResult},
    linalg::{matrix_calculus::unvec, pinv_sym, spd_inverse},
    optimization::numerical_stability::{GENERAL_TOL, symmetrize},
};
use ndarray::{Array1, Array2, s};

/// Asymptotic covariance summary for `(μ, β_1..β_{p−1})`.
#[derive(Debug, Clone, PartialEq)]
pub struct AsymptoticCovariance {
    /// Covariance of the whole unrestricted vector `h`.
    pub avar: Array2<f64>,
    /// Leading `rp × rp` block (means and effects).
    pub cov_matrix: Array2<f64>,
    /// `r×p` standard errors of the fitted model.
    pub asy_se: Array2<f64>,
    /// `r×p` standard errors of the unrestricted model.
    pub asy_se_full: Array2<f64>,
    /// `asy_se_full / asy_se`.
    pub ratio: Array2<f64>,
}

/// envelope_asymptotics — covariance of an envelope fit.
///
/// Parameters
/// ----------
/// - `j`: per-observation information for `h` (square).
/// - `h`: Jacobian `∂h/∂ψ` with `j.nrows()` rows.
/// - `r`, `p`: response dimension and number of groups.
///
/// Errors
/// ------
/// - [`InferenceError::DimensionMismatch`] for non-conforming inputs.
/// - [`InferenceError::Linalg`] when `J` is not positive definite.
/// - [`InferenceError::InvalidVariance`] for a clearly negative or
///   non-finite variance.
pub fn envelope_asymptotics(
    j: &Array2<f64>, h: &Array2<f64>, r: usize, p: usize,
) -> InferenceResult<AsymptoticCovariance> {
    check_information(j, r, p)?;
    if h.nrows() != j.nrows() {
        return Err(InferenceError::DimensionMismatch {
            context: "Jacobian rows",
            expected: j.nrows(),
            found: h.nrows(),
        });
    }
    let reduced = h.t().dot(j).dot(h);
    let avar = symmetrize(&h.dot(&pinv_sym(&reduced, "reduced information")?).dot(&h.t()));
    let j_inv = spd_inverse(j, "Fisher information")?;
    summarize(avar, &j_inv, r, p)
}

/// full_model_asymptotics — covariance when no reduction applies (`u = r`).
///
/// `avar = J⁻¹`, so `asy_se = asy_se_full` and the ratio is 1.
pub fn full_model_asymptotics(
    j: &Array2<f64>, r: usize, p: usize,
) -> InferenceResult<AsymptoticCovariance> {
    check_information(j, r, p)?;
    let j_inv = spd_inverse(j, "Fisher information")?;
    summarize(j_inv.clone(), &j_inv, r, p)
}

/// Standard errors `sqrt(diag(cov))` reshaped column-major to `r×p`.
///
/// Variances within `−GENERAL_TOL · max(1, max diag)` of zero are treated
/// as zero.
///
/// # Errors
/// [`InferenceError::InvalidVariance`] for negative or non-finite entries
/// beyond that tolerance.
pub fn standard_errors(cov: &Array2<f64>, r: usize, p: usize) -> InferenceResult<Array2<f64>> {
    let rp = r * p;
    if cov.nrows() < rp || cov.ncols() < rp {
        return Err(InferenceError::DimensionMismatch {
            context: "covariance block",
            expected: rp,
            found: cov.nrows().min(cov.ncols()),
        });
    }
    let diag = cov.diag();
    let scale = diag.iter().take(rp).fold(1.0_f64, |acc, v| acc.max(v.abs()));
    let mut se = Array1::<f64>::zeros(rp);
    for (index, (&value, out)) in diag.iter().zip(se.iter_mut()).enumerate() {
        if !value.is_finite() || value < -GENERAL_TOL * scale {
            return Err(InferenceError::InvalidVariance { index, value });
        }
        *out = value.max(0.0).sqrt();
    }
    Ok(unvec(&se.view(), r, p))
}

// ---- Helper methods ----

fn check_information(j: &Array2<f64>, r: usize, p: usize) -> InferenceResult<()> {
    if r == 0 || p == 0 {
        return Err(InferenceError::EmptyModel);
    }
    if j.nrows() != j.ncols() {
        return Err(InferenceError::DimensionMismatch {
            context: "information columns",
            expected: j.nrows(),
            found: j.ncols(),
        });
    }
    if j.nrows() < r * p {
        return Err(InferenceError::DimensionMismatch {
            context: "information rows",
            expected: r * p,
            found: j.nrows(),
        });
    }
    Ok(())
}

fn summarize(
    avar: Array2<f64>, j_inv: &Array2<f64>, r: usize, p: usize,
) -> InferenceResult<AsymptoticCovariance> {
    let rp = r * p;
    let cov_matrix = avar.slice(s![..rp, ..rp]).to_owned();
    let asy_se = standard_errors(&cov_matrix, r, p)?;
    let asy_se_full = standard_errors(j_inv, r, p)?;
    let ratio = &asy_se_full / &asy_se;
    Ok(AsymptoticCovariance { avar, cov_matrix, asy_se, asy_se_full, ratio })
}
