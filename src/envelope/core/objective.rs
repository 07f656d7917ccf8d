//! Henv objective — the profile criterion minimized over `Gr(r, u)`.
//!
//! Purpose
//! -------
//! After profiling out means and covariances, the heteroscedastic envelope
//! log-likelihood depends on the data only through the group covariances
//! `Σ_i` and the marginal covariance `Σ_Y`, and on the parameters only
//! through the subspace spanned by an orthonormal `r×u` basis `R`:
//!
//! `F(R) = Σ_i n_i log det(RᵀΣ_iR) + n log det(R0ᵀΣ_YR0)`,
//!
//! with the maximized log-likelihood `l = −(nr/2)(1 + log 2π) − F/2`.
//!
//! Key behaviors
//! -------------
//! - The complement term uses
//!   `log det(R0ᵀΣ_YR0) = log det Σ_Y + log det(RᵀΣ_Y⁻¹R)`, so no
//!   complement basis is formed and `u = 0` / `u = r` need no special case.
//! - `Σ_Y^{-1/2}` is computed once at construction; `RᵀΣ_Y⁻¹R` is the Gram
//!   matrix of the whitened basis `Σ_Y^{-1/2}R`.
//! - The gradient is the exact Euclidean derivative
//!   `2 Σ_i n_i Σ_iR(RᵀΣ_iR)⁻¹ + 2n Σ_Y⁻¹R(RᵀΣ_Y⁻¹R)⁻¹`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `F(RQ) = F(R)` for orthogonal `Q`.
//! - Reduced covariances that are not positive definite surface as
//!   `OptError::Linalg`, which the estimator reports as numerical
//!   instability.
use crate::{
    envelope::{core::data::GroupedData, errors::EnvelopeResult},
    linalg::{log_det_spd, spd_eigen, spd_inv_sqrt, spd_inverse},
    optimization::{
        errors::{OptError, OptResult},
        manifold::SubspaceObjective,
    },
};
use ndarray::Array2;

/// Profile objective `F` for a fixed envelope dimension `u`.
#[derive(Debug, Clone)]
pub struct HenvObjective<'a> {
    data: &'a GroupedData,
    u: usize,
    whiten: Array2<f64>,
}

impl<'a> HenvObjective<'a> {
    /// Bind the objective to `data` for envelope dimension `u`.
    ///
    /// # Errors
    /// `EnvelopeError::NumericalInstability` when `Σ_Y` is not positive
    /// definite.
    pub fn new(data: &'a GroupedData, u: usize) -> EnvelopeResult<Self> {
        let whiten = spd_inv_sqrt(&data.sigma_y, "marginal response covariance")?;
        Ok(Self { data, u, whiten })
    }

    pub fn data(&self) -> &GroupedData {
        self.data
    }

    fn check(&self, basis: &Array2<f64>) -> OptResult<()> {
        let expected = self.dims();
        if basis.dim() != expected {
            return Err(OptError::BasisShapeMismatch { expected, found: basis.dim() });
        }
        Ok(())
    }
}

impl SubspaceObjective for HenvObjective<'_> {
    fn dims(&self) -> (usize, usize) {
        (self.data.r, self.u)
    }

    fn value(&self, basis: &Array2<f64>) -> OptResult<f64> {
        self.check(basis)?;
        let mut total = 0.0;
        for (cov, &count) in self.data.group_covs.iter().zip(&self.data.counts) {
            let reduced = basis.t().dot(cov).dot(basis);
            total += count as f64 * log_det_spd(&reduced, "projected group covariance")?;
        }
        let whitened = self.whiten.dot(basis);
        let gram = whitened.t().dot(&whitened);
        let complement =
            self.data.log_det_sigma_y + log_det_spd(&gram, "whitened basis Gram matrix")?;
        let value = total + self.data.n as f64 * complement;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value });
        }
        Ok(value)
    }

    fn gradient(&self, basis: &Array2<f64>) -> OptResult<Array2<f64>> {
        self.check(basis)?;
        let mut grad = Array2::<f64>::zeros(basis.dim());
        for (cov, &count) in self.data.group_covs.iter().zip(&self.data.counts) {
            let projected = cov.dot(basis);
            let reduced_inv =
                spd_inverse(&basis.t().dot(&projected), "projected group covariance")?;
            grad.scaled_add(2.0 * count as f64, &projected.dot(&reduced_inv));
        }
        let whitened = self.whiten.dot(basis);
        let gram = spd_eigen(&whitened.t().dot(&whitened), "whitened basis Gram matrix")?;
        let gram_inv = gram.map_spectrum(|v| 1.0 / v);
        let complement = self.whiten.dot(&whitened).dot(&gram_inv);
        grad.scaled_add(2.0 * self.data.n as f64, &complement);
        if let Some((index, &value)) = grad.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OptError::InvalidGradient { index, value, reason: "non-finite entry" });
        }
        Ok(grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        envelope::core::test_support::grouped_sample,
        linalg::{matrix_calculus::{unvec, vec}, orthonormalize},
    };
    use approx::assert_abs_diff_eq;
    use finitediff::FiniteDiff;
    use ndarray::{Array1, array};

    // ---- Scope ----
    // Rotation invariance, the closed-form boundary values and agreement of
    // the analytic gradient with central differences.

    fn sample() -> GroupedData {
        let (x, y) = grouped_sample(11, 3, 2, 30, 3.0);
        GroupedData::new(x.view(), y.view()).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // F depends on the basis only through its span.
    //
    // Given
    // -----
    // - r = 3, u = 2, a generic orthonormal R and a rotation Q.
    //
    // Expect
    // ------
    // - F(RQ) = F(R) to 1e-8.
    fn value_is_rotation_invariant() {
        // Arrange
        let data = sample();
        let objective = HenvObjective::new(&data, 2).unwrap();
        let basis = orthonormalize(&array![[1.0, 0.2], [0.3, 1.0], [0.5, -0.4]]).unwrap();
        let (c, s) = (0.7_f64.cos(), 0.7_f64.sin());
        let rotation = array![[c, -s], [s, c]];

        // Act
        let f = objective.value(&basis).unwrap();
        let f_rot = objective.value(&basis.dot(&rotation)).unwrap();

        // Assert
        assert_abs_diff_eq!(f, f_rot, epsilon = 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // The objective reproduces the closed-form values at u = 0 and u = r.
    //
    // Given
    // -----
    // - The empty basis and R = I₃.
    //
    // Expect
    // ------
    // - F = n log det Σ_Y at u = 0 and F = Σ n_i log det Σ_i at u = r.
    fn boundary_values_match_closed_forms() {
        // Arrange
        let data = sample();
        let empty = HenvObjective::new(&data, 0).unwrap();
        let full = HenvObjective::new(&data, 3).unwrap();

        // Act
        let f0 = empty.value(&Array2::zeros((3, 0))).unwrap();
        let fr = full.value(&Array2::eye(3)).unwrap();

        // Assert
        assert_abs_diff_eq!(f0, data.n as f64 * data.log_det_sigma_y, epsilon = 1e-8);
        let expected: f64 = data
            .group_covs
            .iter()
            .zip(&data.counts)
            .map(|(cov, &c)| c as f64 * log_det_spd(cov, "test").unwrap())
            .sum();
        assert_abs_diff_eq!(fr, expected, epsilon = 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // The analytic Euclidean gradient matches finite differences.
    //
    // Given
    // -----
    // - r = 3, u = 2 and a generic orthonormal R; the perturbed points leave
    //   the manifold, where F is defined by the same formula.
    //
    // Expect
    // ------
    // - Central differences agree entry-wise to 1e-5 relative to |F|.
    fn gradient_matches_finite_differences() {
        // Arrange
        let data = sample();
        let objective = HenvObjective::new(&data, 2).unwrap();
        let basis = orthonormalize(&array![[1.0, 0.1], [0.2, 1.0], [0.4, 0.3]]).unwrap();
        let theta: Array1<f64> = vec(&basis.view());

        // Act
        let analytic = vec(&objective.gradient(&basis).unwrap().view());
        let numeric = theta.central_diff(&|t: &Array1<f64>| {
            objective.value(&unvec(&t.view(), 3, 2)).unwrap()
        });

        // Assert
        let scale = objective.value(&basis).unwrap().abs().max(1.0);
        for (a, n) in analytic.iter().zip(numeric.iter()) {
            assert_abs_diff_eq!(*a, *n, epsilon = 1e-5 * scale);
        }
    }
}
