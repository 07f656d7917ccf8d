//! Dense decompositions on `ndarray` matrices, backed by `nalgebra`.
//!
//! Purpose
//! -------
//! Provide the handful of decompositions the envelope estimator needs
//! (sorted symmetric eigendecomposition, SPD log-determinants and inverses,
//! thin QR orthonormalization, numerical rank, orthogonal complements and
//! symmetric pseudoinverses) behind small fallible functions that speak
//! `ndarray`.
//!
//! Conventions
//! -----------
//! - Symmetric routines always decompose the symmetric part of their input
//!   (see [`symmetrize`]).
//! - Eigenvalues are returned in **descending** order with eigenvectors as
//!   the matching columns.
//! - Zero-sized matrices are valid inputs: `log det` of a `0×0` matrix is
//!   `0`, the complement of an `r×0` basis is `I_r`, and so on. The boundary
//!   envelope dimensions `u = 0` and `u = r` rely on this.
//! - Failures are reported as [`LinalgError`]; nothing here panics on
//!   well-shaped input.
use crate::{
    linalg::{
        bridge::{from_dmatrix, to_dmatrix},
        errors::{LinalgError, LinalgResult},
    },
    optimization::numerical_stability::{EIGEN_EPS, RANK_TOL, symmetrize},
};
use ndarray::{Array1, Array2};

/// Symmetric eigendecomposition with eigenvalues sorted in descending order.
#[derive(Debug, Clone, PartialEq)]
pub struct SymEigen {
    /// Eigenvalues, largest first.
    pub values: Array1<f64>,
    /// Orthonormal eigenvectors stored as columns, aligned with `values`.
    pub vectors: Array2<f64>,
}

impl SymEigen {
    /// Rebuild `V diag(f(λ)) Vᵀ` for a scalar spectral map `f`.
    pub fn map_spectrum<F: Fn(f64) -> f64>(&self, f: F) -> Array2<f64> {
        let scaled = &self.vectors * &self.values.mapv(f);
        scaled.dot(&self.vectors.t())
    }
}

/// sym_eigen — sorted symmetric eigendecomposition.
///
/// Parameters
/// ----------
/// - `a`: square matrix; only its symmetric part is decomposed.
/// - `context`: label used in error messages.
///
/// Returns
/// -------
/// [`SymEigen`] with eigenvalues in descending order. Ties keep the order
/// produced by the backend.
///
/// Errors
/// ------
/// - [`LinalgError::NotSquare`] for non-square input.
/// - [`LinalgError::NonFinite`] when the input or the spectrum is not finite.
pub fn sym_eigen(a: &Array2<f64>, context: &'static str) -> LinalgResult<SymEigen> {
    check_square(a)?;
    check_finite(a, context)?;
    let n = a.nrows();
    if n == 0 {
        return Ok(SymEigen { values: Array1::zeros(0), vectors: Array2::zeros((0, 0)) });
    }
    let eig = to_dmatrix(symmetrize(a).view()).symmetric_eigen();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| eig.eigenvalues[j].total_cmp(&eig.eigenvalues[i]));
    let values = Array1::from_iter(order.iter().map(|&k| eig.eigenvalues[k]));
    if values.iter().any(|v| !v.is_finite()) {
        return Err(LinalgError::NonFinite { context });
    }
    let vectors = Array2::from_shape_fn((n, n), |(i, c)| eig.eigenvectors[(i, order[c])]);
    Ok(SymEigen { values, vectors })
}

/// Eigendecomposition of a matrix that must be symmetric positive definite.
///
/// # Errors
/// [`LinalgError::NotPositiveDefinite`] carrying the smallest eigenvalue when
/// it is not strictly positive, plus everything [`sym_eigen`] can return.
pub fn spd_eigen(a: &Array2<f64>, context: &'static str) -> LinalgResult<SymEigen> {
    let eig = sym_eigen(a, context)?;
    if let Some(&smallest) = eig.values.iter().last() {
        if smallest <= 0.0 {
            return Err(LinalgError::NotPositiveDefinite { context, eigenvalue: smallest });
        }
    }
    Ok(eig)
}

/// `log det(A)` for symmetric positive definite `A`; `0` for a `0×0` matrix.
pub fn log_det_spd(a: &Array2<f64>, context: &'static str) -> LinalgResult<f64> {
    let eig = spd_eigen(a, context)?;
    Ok(eig.values.iter().map(|v| v.ln()).sum())
}

/// `A⁻¹` for symmetric positive definite `A`, computed spectrally.
pub fn spd_inverse(a: &Array2<f64>, context: &'static str) -> LinalgResult<Array2<f64>> {
    let eig = spd_eigen(a, context)?;
    Ok(eig.map_spectrum(|v| 1.0 / v))
}

/// `A^{-1/2}` for symmetric positive definite `A`.
pub fn spd_inv_sqrt(a: &Array2<f64>, context: &'static str) -> LinalgResult<Array2<f64>> {
    let eig = spd_eigen(a, context)?;
    Ok(eig.map_spectrum(|v| 1.0 / v.sqrt()))
}

/// Inverse of a general square matrix.
pub fn inverse(a: &Array2<f64>, context: &'static str) -> LinalgResult<Array2<f64>> {
    check_square(a)?;
    check_finite(a, context)?;
    if a.nrows() == 0 {
        return Ok(Array2::zeros((0, 0)));
    }
    to_dmatrix(a.view())
        .try_inverse()
        .map(|inv| from_dmatrix(&inv))
        .ok_or(LinalgError::Singular { context })
}

/// pinv_sym — Moore–Penrose pseudoinverse of a symmetric PSD matrix.
///
/// Eigenvalues `λ_k ≤ EIGEN_EPS · max(λ_max, 1)` are treated as zero, so
/// directions along which the matrix is (numerically) flat are dropped
/// rather than inverted.
pub fn pinv_sym(a: &Array2<f64>, context: &'static str) -> LinalgResult<Array2<f64>> {
    let eig = sym_eigen(a, context)?;
    let floor = EIGEN_EPS * eig.values.get(0).copied().unwrap_or(0.0).abs().max(1.0);
    Ok(eig.map_spectrum(|v| if v > floor { 1.0 / v } else { 0.0 }))
}

/// orthonormalize — thin-QR orthonormal basis of the column space of `a`.
///
/// The returned `n×k` matrix spans the same space as `a`, with column signs
/// chosen so that the implied triangular factor has a positive diagonal.
///
/// # Errors
/// [`LinalgError::RankDeficient`] when some column of `a` is numerically in
/// the span of the preceding ones (or `k > n`).
pub fn orthonormalize(a: &Array2<f64>) -> LinalgResult<Array2<f64>> {
    let (n, k) = a.dim();
    if k == 0 {
        return Ok(Array2::zeros((n, 0)));
    }
    if k > n {
        return Err(LinalgError::RankDeficient { rank: n, expected: k });
    }
    check_finite(a, "orthonormalization input")?;
    let qr = to_dmatrix(a.view()).qr();
    let r = qr.r();
    let scale = (0..k).map(|i| r[(i, i)].abs()).fold(0.0_f64, f64::max);
    let rank = (0..k).filter(|&i| r[(i, i)].abs() > RANK_TOL * scale.max(f64::MIN_POSITIVE)).count();
    if rank < k || scale == 0.0 {
        return Err(LinalgError::RankDeficient { rank, expected: k });
    }
    let mut q = from_dmatrix(&qr.q());
    for j in 0..k {
        if r[(j, j)] < 0.0 {
            q.column_mut(j).mapv_inplace(|v| -v);
        }
    }
    Ok(q)
}

/// Numerical column rank from singular values.
pub fn numerical_rank(a: &Array2<f64>) -> usize {
    let (n, k) = a.dim();
    if n == 0 || k == 0 || a.iter().any(|v| !v.is_finite()) {
        return 0;
    }
    let sv = to_dmatrix(a.view()).svd(false, false).singular_values;
    let largest = sv.iter().copied().fold(0.0_f64, f64::max);
    let floor = RANK_TOL * largest * n.max(k) as f64;
    sv.iter().filter(|&&s| s > floor).count()
}

/// orthogonal_complement — orthonormal basis of span(Γ)^⊥.
///
/// For an orthonormal `r×u` basis `Γ`, returns an `r×(r−u)` matrix `Γ0`
/// with `Γ0ᵀΓ0 = I` and `ΓᵀΓ0 = 0`, taken as the leading eigenvectors of the
/// projector `I − ΓΓᵀ`. Any complement basis is acceptable to callers; this
/// one is deterministic for a given `Γ`.
pub fn orthogonal_complement(gamma: &Array2<f64>) -> LinalgResult<Array2<f64>> {
    let (r, u) = gamma.dim();
    if u == 0 {
        return Ok(Array2::eye(r));
    }
    if u >= r {
        return Ok(Array2::zeros((r, 0)));
    }
    let projector = Array2::<f64>::eye(r) - gamma.dot(&gamma.t());
    let eig = sym_eigen(&projector, "complement projector")?;
    Ok(eig.vectors.slice(ndarray::s![.., ..r - u]).to_owned())
}

/// Principal angles (radians, ascending) between the column spaces of two
/// orthonormal bases with the same number of columns.
pub fn principal_angles(a: &Array2<f64>, b: &Array2<f64>) -> LinalgResult<Array1<f64>> {
    if a.dim() != b.dim() {
        return Err(LinalgError::ShapeMismatch {
            context: "principal angles",
            left: a.dim(),
            right: b.dim(),
        });
    }
    if a.ncols() == 0 {
        return Ok(Array1::zeros(0));
    }
    let cross = a.t().dot(b);
    let sv = to_dmatrix(cross.view()).svd(false, false).singular_values;
    let mut angles: Vec<f64> = sv.iter().map(|s| s.clamp(-1.0, 1.0).acos()).collect();
    angles.sort_by(f64::total_cmp);
    Ok(Array1::from(angles))
}

// ---- Helper methods ----

fn check_square(a: &Array2<f64>) -> LinalgResult<()> {
    if a.nrows() != a.ncols() {
        return Err(LinalgError::NotSquare { rows: a.nrows(), cols: a.ncols() });
    }
    Ok(())
}

fn check_finite(a: &Array2<f64>, context: &'static str) -> LinalgResult<()> {
    if a.iter().any(|v| !v.is_finite()) {
        return Err(LinalgError::NonFinite { context });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Ordering and reconstruction of the sorted symmetric eigendecomposition.
    // - SPD helpers (log det, inverse, inverse square root) and their failure
    //   on indefinite input.
    // - QR orthonormalization, rank detection, complements and pseudoinverse.
    //
    // They intentionally DO NOT cover:
    // - Backend accuracy of nalgebra beyond simple closed-form cases.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Eigenvalues come back largest first and reconstruct the input.
    //
    // Given
    // -----
    // - A symmetric 3×3 matrix with known spectrum {1, 2, 4}.
    //
    // Expect
    // ------
    // - values = [4, 2, 1] and V diag(λ) Vᵀ reproduces the matrix.
    fn sym_eigen_sorts_descending_and_reconstructs() {
        let a = array![[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 4.0]];

        let eig = sym_eigen(&a, "test").unwrap();

        assert_abs_diff_eq!(eig.values[0], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(eig.values[1], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(eig.values[2], 1.0, epsilon = 1e-12);
        let rebuilt = eig.map_spectrum(|v| v);
        for (x, y) in rebuilt.iter().zip(a.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // SPD helpers agree with closed forms and reject indefinite input.
    //
    // Given
    // -----
    // - A = [[4, 2], [2, 3]] (det 8) and an indefinite matrix.
    //
    // Expect
    // ------
    // - log det = ln 8, A·A⁻¹ = I, (A^{-1/2})² = A⁻¹.
    // - NotPositiveDefinite for the indefinite matrix.
    fn spd_helpers_match_closed_forms() {
        let a = array![[4.0, 2.0], [2.0, 3.0]];

        assert_abs_diff_eq!(log_det_spd(&a, "a").unwrap(), 8.0_f64.ln(), epsilon = 1e-12);
        let inv = spd_inverse(&a, "a").unwrap();
        let eye = a.dot(&inv);
        assert_abs_diff_eq!(eye[[0, 0]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(eye[[0, 1]], 0.0, epsilon = 1e-12);
        let isq = spd_inv_sqrt(&a, "a").unwrap();
        let sq = isq.dot(&isq);
        for (x, y) in sq.iter().zip(inv.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
        }

        let bad = array![[1.0, 2.0], [2.0, 1.0]];
        assert!(matches!(
            log_det_spd(&bad, "bad"),
            Err(LinalgError::NotPositiveDefinite { .. })
        ));
        assert_eq!(log_det_spd(&Array2::zeros((0, 0)), "empty").unwrap(), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // QR orthonormalization spans the input and flags dependent columns.
    //
    // Given
    // -----
    // - A full-rank 3×2 matrix and a matrix with two parallel columns.
    //
    // Expect
    // ------
    // - QᵀQ = I and Q Qᵀ a = a for the full-rank input.
    // - RankDeficient for the parallel columns.
    fn orthonormalize_spans_input_and_detects_rank_loss() {
        let a = array![[1.0, 1.0], [0.0, 1.0], [1.0, 0.0]];

        let q = orthonormalize(&a).unwrap();

        let qtq = q.t().dot(&q);
        assert_abs_diff_eq!(qtq[[0, 0]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(qtq[[0, 1]], 0.0, epsilon = 1e-12);
        let projected = q.dot(&q.t()).dot(&a);
        for (x, y) in projected.iter().zip(a.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
        }
        assert!(q[[0, 0]] > 0.0);

        let parallel = array![[1.0, 2.0], [1.0, 2.0], [0.0, 0.0]];
        assert!(matches!(orthonormalize(&parallel), Err(LinalgError::RankDeficient { .. })));
        assert_eq!(numerical_rank(&parallel), 1);
        assert_eq!(numerical_rank(&a), 2);
    }

    #[test]
    // Purpose
    // -------
    // The complement is orthonormal and orthogonal to the basis, including
    // the degenerate u = 0 and u = r cases.
    //
    // Given
    // -----
    // - Γ = normalized (1, 1, 0) in R³, an empty basis and I₃.
    //
    // Expect
    // ------
    // - Γ0 is 3×2 with Γ0ᵀΓ0 = I and ΓᵀΓ0 = 0; I₃ for u = 0; 3×0 for u = r.
    fn orthogonal_complement_is_orthonormal_and_complementary() {
        let s = 1.0 / 2.0_f64.sqrt();
        let gamma = array![[s], [s], [0.0]];

        let g0 = orthogonal_complement(&gamma).unwrap();

        assert_eq!(g0.dim(), (3, 2));
        let g0tg0 = g0.t().dot(&g0);
        assert_abs_diff_eq!(g0tg0[[0, 0]], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(g0tg0[[0, 1]], 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(g0tg0[[1, 1]], 1.0, epsilon = 1e-10);
        let cross = gamma.t().dot(&g0);
        assert!(cross.iter().all(|v| v.abs() < 1e-10));

        assert_eq!(orthogonal_complement(&Array2::zeros((3, 0))).unwrap(), Array2::eye(3));
        assert_eq!(orthogonal_complement(&Array2::eye(3)).unwrap().dim(), (3, 0));
    }

    #[test]
    // Purpose
    // -------
    // The symmetric pseudoinverse inverts the range and zeroes the kernel.
    //
    // Given
    // -----
    // - A = diag(2, 0) (rank one).
    //
    // Expect
    // ------
    // - A⁺ = diag(0.5, 0).
    fn pinv_sym_drops_null_directions() {
        let a = array![[2.0, 0.0], [0.0, 0.0]];

        let p = pinv_sym(&a, "a").unwrap();

        assert_abs_diff_eq!(p[[0, 0]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p[[1, 1]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p[[0, 1]], 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Principal angles recover a known rotation angle.
    //
    // Given
    // -----
    // - e₁ and (cos 30°, sin 30°, 0) in R³.
    //
    // Expect
    // ------
    // - A single principal angle of π/6.
    fn principal_angles_recover_rotation() {
        let t = std::f64::consts::PI / 6.0;
        let a = array![[1.0], [0.0], [0.0]];
        let b = array![[t.cos()], [t.sin()], [0.0]];

        let angles = principal_angles(&a, &b).unwrap();

        assert_eq!(angles.len(), 1);
        assert_abs_diff_eq!(angles[0], t, epsilon = 1e-10);
    }
}
