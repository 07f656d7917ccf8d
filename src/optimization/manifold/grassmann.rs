//! Grassmann-manifold geometry on orthonormal basis representatives.
//!
//! A point of `Gr(r, u)` is stored as an `r×u` matrix `X` with `XᵀX = I`.
//! Tangent (horizontal) vectors at `X` are `r×u` matrices `Z` with
//! `XᵀZ = 0`, and the metric is the Frobenius inner product.
//!
//! Provided here:
//! - [`project_horizontal`]: `(I − XXᵀ)V`, which maps Euclidean gradients to
//!   Riemannian gradients and doubles as vector transport.
//! - [`retract`]: the QR retraction `qf(X + Z)`.
//! - [`GraphChart`]: the local chart `A ↦ qf(G0 + G0⊥A)` used by the
//!   chart-based L-BFGS solver, with its gradient pullback.
use ndarray::Array2;

use crate::{
    linalg::{decomp::inverse, orthogonal_complement, orthonormalize},
    optimization::{
        errors::{OptError, OptResult},
        manifold::traits::SubspaceObjective,
    },
};

/// Frobenius inner product `⟨A, B⟩ = tr(AᵀB)`.
pub fn inner(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Frobenius norm.
pub fn norm(a: &Array2<f64>) -> f64 {
    inner(a, a).sqrt()
}

/// Horizontal projection `(I − XXᵀ)V` at `X`.
pub fn project_horizontal(x: &Array2<f64>, v: &Array2<f64>) -> Array2<f64> {
    v - &x.dot(&x.t().dot(v))
}

/// QR retraction `qf(X + Z)` with positive-diagonal sign convention.
///
/// # Errors
/// [`OptError::Linalg`] when `X + Z` loses rank (only possible for very
/// long steps).
pub fn retract(x: &Array2<f64>, z: &Array2<f64>) -> OptResult<Array2<f64>> {
    Ok(orthonormalize(&(x + z))?)
}

/// Check that `basis` has the shape an objective expects.
pub fn check_basis_shape(objective: &dyn SubspaceObjective, basis: &Array2<f64>) -> OptResult<()> {
    let expected = objective.dims();
    if basis.dim() != expected {
        return Err(OptError::BasisShapeMismatch { expected, found: basis.dim() });
    }
    Ok(())
}

/// Evaluate the Euclidean gradient and project it to the horizontal space.
///
/// # Errors
/// Objective errors and [`OptError::GradientShapeMismatch`].
pub fn riemannian_gradient(
    objective: &dyn SubspaceObjective, x: &Array2<f64>,
) -> OptResult<Array2<f64>> {
    let egrad = objective.gradient(x)?;
    if egrad.dim() != x.dim() {
        return Err(OptError::GradientShapeMismatch { expected: x.dim(), found: egrad.dim() });
    }
    Ok(project_horizontal(x, &egrad))
}

/// Graph chart of `Gr(r, u)` around a center subspace.
///
/// Coordinates are `(r−u)×u` matrices `A`; the chart point is
/// `Γ(A) = qf(G0 + G0⊥A)`. `A = 0` maps to the center. Every subspace whose
/// principal angles to the center are all below π/2 has coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphChart {
    center: Array2<f64>,
    normal: Array2<f64>,
}

impl GraphChart {
    /// Chart centered at the orthonormal basis `center`.
    pub fn new(center: Array2<f64>) -> OptResult<Self> {
        let normal = orthogonal_complement(&center)?;
        Ok(Self { center, normal })
    }

    pub fn center(&self) -> &Array2<f64> {
        &self.center
    }

    /// Shape `(r−u, u)` of the coordinate matrix.
    pub fn coord_dim(&self) -> (usize, usize) {
        (self.normal.ncols(), self.center.ncols())
    }

    /// Orthonormal basis `Γ(A)` and the triangular factor `T = ΓᵀM(A)`.
    pub fn point(&self, coords: &Array2<f64>) -> OptResult<(Array2<f64>, Array2<f64>)> {
        let m = &self.center + &self.normal.dot(coords);
        let gamma = orthonormalize(&m)?;
        let t = gamma.t().dot(&m);
        Ok((gamma, t))
    }

    /// Pull a Euclidean gradient at `Γ(A)` back to chart coordinates:
    /// `∂F/∂A = G0⊥ᵀ (I − ΓΓᵀ) ∇F T⁻ᵀ`.
    pub fn pullback(
        &self, gamma: &Array2<f64>, t: &Array2<f64>, egrad: &Array2<f64>,
    ) -> OptResult<Array2<f64>> {
        let t_inv = inverse(t, "chart triangular factor")?;
        let horizontal = project_horizontal(gamma, egrad);
        Ok(self.normal.t().dot(&horizontal).dot(&t_inv.t()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Projection removes the vertical component and retraction stays on the
    // manifold.
    //
    // Given
    // -----
    // - X = e₁ in R³ and V = (1, 2, 3)ᵀ.
    //
    // Expect
    // ------
    // - (I − XXᵀ)V = (0, 2, 3)ᵀ; retract(X, ·) has unit norm.
    fn projection_and_retraction_respect_the_manifold() {
        let x = array![[1.0], [0.0], [0.0]];
        let v = array![[1.0], [2.0], [3.0]];

        let h = project_horizontal(&x, &v);
        let y = retract(&x, &(&h * 0.1)).unwrap();

        assert_eq!(h, array![[0.0], [2.0], [3.0]]);
        assert_abs_diff_eq!(norm(&y), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(inner(&x, &h), 0.0, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // The chart maps zero to its center and its pullback matches a finite
    // difference of a subspace function.
    //
    // Given
    // -----
    // - Center e₁ in R³ and F(Γ) = ΓᵀSΓ for a fixed SPD S (u = 1).
    //
    // Expect
    // ------
    // - Γ(0) = e₁ and the pulled-back gradient agrees with central
    //   differences in chart coordinates.
    fn chart_pullback_matches_finite_differences() {
        let s = array![[3.0, 1.0, 0.5], [1.0, 2.0, 0.2], [0.5, 0.2, 1.0]];
        let chart = GraphChart::new(array![[1.0], [0.0], [0.0]]).unwrap();
        let f = |a: &Array2<f64>| {
            let (g, _) = chart.point(a).unwrap();
            g.t().dot(&s).dot(&g)[[0, 0]]
        };
        let a0 = array![[0.3], [-0.2]];

        let (g0, _) = chart.point(&Array2::zeros((2, 1))).unwrap();
        assert_abs_diff_eq!(g0[[0, 0]], 1.0, epsilon = 1e-12);

        let (gamma, t) = chart.point(&a0).unwrap();
        let egrad = s.dot(&gamma) * 2.0;
        let pulled = chart.pullback(&gamma, &t, &egrad).unwrap();

        let h = 1e-6;
        for k in 0..2 {
            let mut up = a0.clone();
            let mut dn = a0.clone();
            up[[k, 0]] += h;
            dn[[k, 0]] -= h;
            let fd = (f(&up) - f(&dn)) / (2.0 * h);
            assert_abs_diff_eq!(pulled[[k, 0]], fd, epsilon = 1e-6);
        }
    }
}
