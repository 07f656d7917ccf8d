//! Core building blocks for heteroscedastic envelope estimation.
//!
//! Purpose
//! -------
//! Collect the pieces `HenvModel::fit` is assembled from: grouped
//! sufficient statistics, options, precondition checks, the profile
//! objective, the envelope subspace type and the initializer.
//!
//! Key behaviors
//! -------------
//! - [`data`]: [`GroupedData`] groups observations by indicator row and
//!   computes group and pooled statistics.
//! - [`options`]: [`HenvOptions`], validated once and read-only afterwards.
//! - [`validation`]: eager precondition checks in a fixed order.
//! - [`objective`]: [`HenvObjective`], the `SubspaceObjective` minimized
//!   over the Grassmann manifold.
//! - [`subspace`]: [`EnvelopeSubspace`], a basis with its complement.
//! - [`init`]: eigenvector-subset starting bases.
//!
//! Downstream usage
//! ----------------
//! - `envelope::models` consumes these types; they are public so custom
//!   optimizers or diagnostics can evaluate the objective directly.

pub mod data;
pub mod init;
pub mod objective;
pub mod options;
pub mod subspace;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::{
    data::GroupedData, init::eigen_subset_start, objective::HenvObjective, options::HenvOptions,
    subspace::EnvelopeSubspace,
};
