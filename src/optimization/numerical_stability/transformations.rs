//! Numerical stability utilities.
//!
//! Shared tolerances and small guarded helpers used by the linear-algebra,
//! manifold-optimization and inference layers.
//!
//! # Provided items
//! - [`EIGEN_EPS`]: relative eigenvalue floor for pseudoinverses.
//! - [`RANK_TOL`]: relative singular-value floor for numerical rank.
//! - [`GENERAL_TOL`]: tolerance for structural checks (orthonormality,
//!   symmetry) on user-supplied matrices.
//! - [`symmetrize`]: `(A + Aᵀ) / 2`, used before every symmetric
//!   eigendecomposition.
//! - [`relative_change`]: scale-aware change between two objective values.

use ndarray::Array2;

/// Relative eigenvalue floor for Moore–Penrose pseudoinverses.
///
/// An eigenvalue `λ_k` of a symmetric PSD matrix is treated as zero when
/// `λ_k ≤ EIGEN_EPS · max(λ_max, 1)`. The information matrices assembled in
/// `inference` are singular along the rotational directions of the envelope
/// basis, so this floor decides which directions are discarded.
pub const EIGEN_EPS: f64 = 1e-10;

/// Relative singular-value floor used when computing numerical rank.
pub const RANK_TOL: f64 = 1e-10;

/// Absolute tolerance for structural checks on matrices.
pub const GENERAL_TOL: f64 = 1e-8;

/// Return the symmetric part `(A + Aᵀ) / 2` of a square matrix.
///
/// Eigendecompositions in this crate always run on the symmetric part so
/// that rounding asymmetry from products such as `Rᵀ Σ R` never leaks into
/// the spectrum.
pub fn symmetrize(a: &Array2<f64>) -> Array2<f64> {
    let at = a.t();
    (a + &at) * 0.5
}

/// Scale-aware change `|f_new − f_old| / max(1, |f_old|)`.
///
/// Objective values in this crate are sums over observations and can be
/// large in magnitude; the denominator keeps function tolerances
/// meaningful across sample sizes while staying absolute near zero.
pub fn relative_change(f_old: f64, f_new: f64) -> f64 {
    (f_new - f_old).abs() / f_old.abs().max(1.0)
}
