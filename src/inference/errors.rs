//! Error type for asymptotic inference.
//!
//! [`InferenceError`] covers the ways assembling the Fisher information,
//! the reparameterization Jacobian and the asymptotic covariance can fail:
//! inconsistent block dimensions, non-finite results, and decomposition
//! failures from [`crate::linalg`]. [`InferenceResult`] is the matching
//! alias.
use crate::linalg::LinalgError;

/// Unified error type for inference routines.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Structure ----
    /// Two blocks that must conform do not.
    DimensionMismatch { context: &'static str, expected: usize, found: usize },

    /// Inference needs at least one group and a positive response dimension.
    EmptyModel,

    // ---- Numerics ----
    /// A variance came out negative or non-finite.
    InvalidVariance { index: usize, value: f64 },

    /// Decomposition failure.
    Linalg(LinalgError),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Structure ----
            InferenceError::DimensionMismatch { context, expected, found } => write!(
                f,
                "Inference Error: dimension mismatch in {context} (expected {expected}, found {found})"
            ),
            InferenceError::EmptyModel => {
                write!(f, "Inference Error: model has no groups or no responses")
            }

            // ---- Numerics ----
            InferenceError::InvalidVariance { index, value } => {
                write!(f, "Inference Error: invalid variance {value} at index {index}")
            }
            InferenceError::Linalg(err) => write!(f, "Inference Error: {err}"),
        }
    }
}

impl From<LinalgError> for InferenceError {
    fn from(err: LinalgError) -> Self {
        InferenceError::Linalg(err)
    }
}
