//! Small closed-form objectives shared by the manifold optimizer tests.
use ndarray::Array2;

use crate::optimization::{errors::OptResult, manifold::traits::SubspaceObjective};

/// `F(X) = tr(XᵀSX)`; minimized by the eigenvectors of the `u` smallest
/// eigenvalues of the symmetric matrix `S`.
pub struct RayleighQuotient {
    pub s: Array2<f64>,
    pub u: usize,
}

impl SubspaceObjective for RayleighQuotient {
    fn dims(&self) -> (usize, usize) {
        (self.s.nrows(), self.u)
    }

    fn value(&self, basis: &Array2<f64>) -> OptResult<f64> {
        Ok(basis.t().dot(&self.s).dot(basis).diag().sum())
    }

    fn gradient(&self, basis: &Array2<f64>) -> OptResult<Array2<f64>> {
        Ok(self.s.dot(basis) * 2.0)
    }
}
