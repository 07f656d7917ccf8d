//! envelope — heteroscedastic envelope models for grouped multivariate
//! responses.
//!
//! Purpose
//! -------
//! Estimate `Y | group i ~ N(μ + Γη_i, ΓΩ_iΓᵀ + Γ0Ω0Γ0ᵀ)`, where the
//! u-dimensional envelope `span(Γ)` carries every difference between groups
//! in mean and in covariance, and `span(Γ0)` is immaterial. Restricting the
//! fit to the envelope lowers the variance of the estimated group means.
//!
//! Key behaviors
//! -------------
//! - [`core`]: grouped sufficient statistics, options, validation, the
//!   Grassmann objective, the envelope subspace type and initialization.
//! - [`models`]: [`HenvModel::fit`], [`HenvFit::predict`] and the fitted
//!   result types.
//! - [`errors`]: [`EnvelopeError`] / [`EnvelopeResult`], the error surface of
//!   the whole envelope stack.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every group has at least `r` observations, so each group covariance is
//!   (generically) positive definite.
//! - Groups are distinct indicator rows compared by exact equality and are
//!   ordered by a lexicographic sort of those rows.
//! - Fits are immutable once returned; options are never modified.
//!
//! Conventions
//! -----------
//! - Matrices are `ndarray` arrays with observations in rows (`X` is `n×k`,
//!   `Y` is `n×r`); per-group quantities are columns (`mug`, `beta`, `eta`)
//!   or `Vec` entries (`sigma`, `omega`) in group order.
//! - Diagnostics go through the `log` facade; the stack performs no I/O.
//!
//! Downstream usage
//! ----------------
//! - Build [`HenvOptions`] (or use the default), call
//!   `HenvModel::fit(x, y, u, &options)`, then read the fit, its
//!   `standard_errors()` or `predict` new rows.
//! - `crate::selection` compares fits over all `u`.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; `tests/` runs the full
//!   simulate → fit → select → predict pipeline.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{EnvelopeSubspace, GroupedData, HenvObjective, HenvOptions};

pub use self::errors::{EnvelopeError, EnvelopeResult};

pub use self::models::{HenvFit, HenvModel, HenvPrediction, OptimizerSummary};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use envelope_models::envelope::prelude::*;
//
// to import the main fitting surface in a single line.

pub mod prelude {
    pub use super::{
        EnvelopeError, EnvelopeResult, HenvFit, HenvModel, HenvOptions, HenvPrediction,
        OptimizerSummary,
    };
}
