//! Fisher information of the unrestricted heteroscedastic model.
//!
//! Purpose
//! -------
//! Build the per-observation Fisher information `J` of the group-wise
//! Gaussian model in the parameterization
//! `h = (μ, β_1, …, β_{p−1}, vech Σ_1, …, vech Σ_p)`, where the last group
//! effect is implied by `Σ_i n_i β_i = 0`.
//!
//! Key behaviors
//! -------------
//! - Mean block: `Σ_i f_i D_iᵀ Σ_i⁻¹ D_i`, with `f_i = n_i/n` and `D_i` the
//!   derivative of the mean of group `i` with respect to `(μ, β)`
//!   (see [`mean_derivative`]).
//! - Covariance blocks: `f_i · ½ E_rᵀ(Σ_i⁻¹ ⊗ Σ_i⁻¹)E_r`, block diagonal.
//! - Means and covariances are orthogonal, so the off-diagonal blocks are 0.
//!
//! Conventions
//! -----------
//! - `J` is on the per-observation scale; covariances derived from it are
//!   divided by `n` by the caller.
use crate::{
    inference::errors::{InferenceError, InferenceResult},
    linalg::{
        matrix_calculus::{duplication, kron, vech_len},
        spd_inverse,
    },
};
use ndarray::{Array2, s};

/// Length of the `h` parameter vector for `p` groups in `R^r`.
pub fn unrestricted_dim(r: usize, p: usize) -> usize {
    r * p + p * vech_len(r)
}

/// `D_g`: derivative of the mean of group `g` with respect to
/// `(μ, β_1, …, β_{p−1})`, an `r × rp` matrix.
///
/// For `g < p − 1` this is `[I_r, 0, …, I_r (block g + 1), …, 0]`; for the
/// last group the effect blocks are `−(f_j / f_{p−1}) I_r`.
pub fn mean_derivative(r: usize, g: usize, fractions: &[f64]) -> InferenceResult<Array2<f64>> {
    let p = fractions.len();
    if g >= p {
        return Err(InferenceError::DimensionMismatch {
            context: "group label",
            expected: p,
            found: g + 1,
        });
    }
    let eye = Array2::<f64>::eye(r);
    let mut d = Array2::<f64>::zeros((r, r * p));
    d.slice_mut(s![.., ..r]).assign(&eye);
    if g + 1 < p {
        d.slice_mut(s![.., r * (g + 1)..r * (g + 2)]).assign(&eye);
    } else {
        let last = fractions[p - 1];
        for j in 0..p - 1 {
            d.slice_mut(s![.., r * (j + 1)..r * (j + 2)]).assign(&(&eye * (-fractions[j] / last)));
        }
    }
    Ok(d)
}

/// fisher_information — per-observation information `J` for `h`.
///
/// Parameters
/// ----------
/// - `sigmas`: group covariances `Σ_1, …, Σ_p` (each `r×r`, SPD).
/// - `fractions`: group fractions `f_i = n_i / n`.
///
/// Errors
/// ------
/// - [`InferenceError::EmptyModel`] for `p = 0` or `r = 0`.
/// - [`InferenceError::DimensionMismatch`] when the inputs disagree.
/// - [`InferenceError::Linalg`] when some `Σ_i` is not positive definite.
pub fn fisher_information(sigmas: &[Array2<f64>], fractions: &[f64]) -> InferenceResult<Array2<f64>> {
    let p = sigmas.len();
    let r = sigmas.first().map_or(0, |s| s.nrows());
    if p == 0 || r == 0 {
        return Err(InferenceError::EmptyModel);
    }
    if fractions.len() != p {
        return Err(InferenceError::DimensionMismatch {
            context: "group fractions",
            expected: p,
            found: fractions.len(),
        });
    }
    let v = vech_len(r);
    let mean_dim = r * p;
    let e = duplication(r);
    let mut j = Array2::<f64>::zeros((unrestricted_dim(r, p), unrestricted_dim(r, p)));

    for (g, (sigma, &f)) in sigmas.iter().zip(fractions).enumerate() {
        if sigma.dim() != (r, r) {
            return Err(InferenceError::DimensionMismatch {
                context: "group covariance",
                expected: r,
                found: sigma.nrows(),
            });
        }
        let precision = spd_inverse(sigma, "group covariance")?;
        let d = mean_derivative(r, g, fractions)?;
        let mean_term = d.t().dot(&precision).dot(&d);
        j.slice_mut(s![..mean_dim, ..mean_dim]).scaled_add(f, &mean_term);

        let cov_term = e.t().dot(&kron(&precision.view(), &precision.view())).dot(&e);
        let start = mean_dim + g * v;
        j.slice_mut(s![start..start + v, start..start + v]).assign(&(cov_term * (0.5 * f)));
    }
    Ok(j)
}
