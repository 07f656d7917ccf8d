//! Error type for the dense linear-algebra helpers.
//!
//! Every decomposition in [`crate::linalg`] reports failure through
//! [`LinalgError`]; the optimization, inference and envelope layers convert
//! it into their own error enums via `From`.

/// Result alias for linear-algebra helpers.
pub type LinalgResult<T> = Result<T, LinalgError>;

/// Failures raised by the dense linear-algebra helpers.
#[derive(Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Operation requires a square matrix.
    NotSquare { rows: usize, cols: usize },

    /// Matrix contains NaN or ±inf.
    NonFinite { context: &'static str },

    /// Symmetric matrix has a non-positive eigenvalue where positive
    /// definiteness is required.
    NotPositiveDefinite { context: &'static str, eigenvalue: f64 },

    /// General square matrix could not be inverted.
    Singular { context: &'static str },

    /// Column rank is smaller than required.
    RankDeficient { rank: usize, expected: usize },

    /// Operand shapes are not conformable.
    ShapeMismatch { context: &'static str, left: (usize, usize), right: (usize, usize) },
}

impl std::error::Error for LinalgError {}

impl std::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinalgError::NotSquare { rows, cols } => {
                write!(f, "Matrix must be square, got {rows}x{cols}")
            }
            LinalgError::NonFinite { context } => {
                write!(f, "Non-finite entries in {context}")
            }
            LinalgError::NotPositiveDefinite { context, eigenvalue } => {
                write!(f, "{context} is not positive definite (eigenvalue {eigenvalue:e})")
            }
            LinalgError::Singular { context } => {
                write!(f, "{context} is singular")
            }
            LinalgError::RankDeficient { rank, expected } => {
                write!(f, "Matrix has rank {rank}, expected {expected}")
            }
            LinalgError::ShapeMismatch { context, left, right } => {
                write!(f, "Shape mismatch in {context}: {left:?} vs {right:?}")
            }
        }
    }
}
