//! selection — choosing the envelope dimension `u`.
//!
//! Purpose
//! -------
//! Fit the heteroscedastic envelope model for every `u = 0..=r` and pick a
//! dimension by a likelihood-ratio test ([`lrt_henv`]) or an information
//! criterion ([`aic_henv`], [`bic_henv`]).
//!
//! Conventions
//! -----------
//! - All selectors share the fitting options and return a
//!   [`DimensionSelection`] with per-`u` log-likelihoods, parameter counts
//!   and criterion values.
//! - A failed fit at any `u` aborts the selection with that error.

pub mod information_criteria;
pub mod lrt;
pub mod path;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::{
    information_criteria::{aic_henv, bic_henv},
    lrt::lrt_henv,
    path::{DimensionSelection, fit_all_dimensions},
};
