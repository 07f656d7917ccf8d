//! Envelope subspace — an orthonormal basis with its complement.
//!
//! [`EnvelopeSubspace`] pairs `Γ` (`r×u`) with `Γ0` (`r×(r−u)`) such that
//! `[Γ, Γ0]` is orthogonal. The boundary cases are explicit: `u = 0` has an
//! empty `Γ` and `Γ0 = I_r`, `u = r` has `Γ = I_r` and an empty `Γ0`.
use crate::{
    envelope::errors::EnvelopeResult,
    linalg::{orthogonal_complement, orthonormalize, principal_angles},
};
use ndarray::Array2;

#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeSubspace {
    pub gamma: Array2<f64>,
    pub gamma0: Array2<f64>,
}

impl EnvelopeSubspace {
    /// Orthonormalize `basis` and attach the orthogonal complement.
    ///
    /// # Errors
    /// `EnvelopeError::NumericalInstability` when `basis` is rank deficient.
    pub fn from_basis(basis: &Array2<f64>) -> EnvelopeResult<Self> {
        let gamma = orthonormalize(basis)?;
        let gamma0 = orthogonal_complement(&gamma)?;
        Ok(Self { gamma, gamma0 })
    }

    /// `u = 0`: the zero subspace of `R^r`.
    pub fn empty(r: usize) -> Self {
        Self { gamma: Array2::zeros((r, 0)), gamma0: Array2::eye(r) }
    }

    /// `u = r`: the whole of `R^r`.
    pub fn full(r: usize) -> Self {
        Self { gamma: Array2::eye(r), gamma0: Array2::zeros((r, 0)) }
    }

    pub fn dim(&self) -> usize {
        self.gamma.ncols()
    }

    /// Orthogonal projection `ΓΓᵀ` onto the subspace.
    pub fn projection(&self) -> Array2<f64> {
        self.gamma.dot(&self.gamma.t())
    }

    /// Largest principal angle (radians) between this subspace and
    /// `span(other)`; `0` when both are trivial.
    pub fn max_angle_to(&self, other: &Array2<f64>) -> EnvelopeResult<f64> {
        let angles = principal_angles(&self.gamma, &orthonormalize(other)?)?;
        Ok(angles.iter().copied().fold(0.0, f64::max))
    }
}
