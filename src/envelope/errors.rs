//! Errors for heteroscedastic envelope estimation.
//!
//! [`EnvelopeError`] is the error surface of the public API
//! (`HenvModel::fit`, `HenvFit::predict`, dimension selection). Input
//! problems are reported with the offending sizes; failures from the
//! optimization, inference and linear-algebra layers arrive through `From`
//! conversions.
//!
//! ## Conventions
//! - Group and row indices are 0-based.
//! - Decomposition failures (non-positive-definite or singular matrices)
//!   surface as [`EnvelopeError::NumericalInstability`] carrying the
//!   original message.
use crate::{
    inference::errors::InferenceError, linalg::LinalgError, optimization::errors::OptError,
};

/// Result alias for envelope operations.
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    // ---- Input validation ----
    /// Envelope dimension exceeds the response dimension.
    InvalidDimension { u: usize, r: usize },

    /// Shapes that must agree do not.
    DimensionMismatch { context: &'static str, expected: usize, found: usize },

    /// No observations or no response columns.
    EmptyData,

    /// A predictor or response entry is NaN or ±inf.
    NonFiniteData { matrix: &'static str, row: usize, col: usize, value: f64 },

    /// Caller-supplied initial basis does not have full column rank.
    RankDeficientInitialization { rank: usize, expected: usize },

    /// A group has fewer observations than response dimensions.
    InsufficientGroupSize { group: usize, size: usize, required: usize },

    /// Significance level outside (0, 1).
    InvalidSignificance { alpha: f64 },

    // ---- Estimation ----
    /// The optimizer stopped before meeting its tolerances.
    OptimizerNonConvergence { iterations: usize, status: String },

    /// A decomposition or evaluation broke down.
    NumericalInstability { reason: String },

    // ---- Prediction ----
    /// Predictor row does not match any group seen during fitting.
    UnknownGroup,

    // ---- Wrapped layers ----
    Optimization(OptError),
    Inference(InferenceError),
}

impl std::error::Error for EnvelopeError {}

impl std::fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input validation ----
            EnvelopeError::InvalidDimension { u, r } => {
                write!(f, "Envelope dimension u = {u} must satisfy 0 <= u <= r = {r}")
            }
            EnvelopeError::DimensionMismatch { context, expected, found } => {
                write!(f, "Dimension mismatch in {context}: expected {expected}, found {found}")
            }
            EnvelopeError::EmptyData => write!(f, "Data must contain observations and responses"),
            EnvelopeError::NonFiniteData { matrix, row, col, value } => {
                write!(f, "Non-finite value {value} in {matrix} at ({row}, {col})")
            }
            EnvelopeError::RankDeficientInitialization { rank, expected } => {
                write!(f, "Initial basis has rank {rank}, expected {expected}")
            }
            EnvelopeError::InsufficientGroupSize { group, size, required } => {
                write!(f, "Group {group} has {size} observations, at least {required} required")
            }
            EnvelopeError::InvalidSignificance { alpha } => {
                write!(f, "Significance level {alpha} must lie strictly between 0 and 1")
            }

            // ---- Estimation ----
            EnvelopeError::OptimizerNonConvergence { iterations, status } => {
                write!(f, "Optimizer did not converge after {iterations} iterations: {status}")
            }
            EnvelopeError::NumericalInstability { reason } => {
                write!(f, "Numerical instability: {reason}")
            }

            // ---- Prediction ----
            EnvelopeError::UnknownGroup => {
                write!(f, "Predictor row does not match any fitted group")
            }

            // ---- Wrapped layers ----
            EnvelopeError::Optimization(err) => write!(f, "Optimization failed: {err}"),
            EnvelopeError::Inference(err) => write!(f, "{err}"),
        }
    }
}

impl From<LinalgError> for EnvelopeError {
    fn from(err: LinalgError) -> Self {
        EnvelopeError::NumericalInstability { reason: err.to_string() }
    }
}

impl From<OptError> for EnvelopeError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::Linalg(inner) => inner.into(),
            OptError::NonFiniteCost { value } => EnvelopeError::NumericalInstability {
                reason: format!("objective evaluated to {value}"),
            },
            other => EnvelopeError::Optimization(other),
        }
    }
}

impl From<InferenceError> for EnvelopeError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::Linalg(inner) => inner.into(),
            other => EnvelopeError::Inference(other),
        }
    }
}
