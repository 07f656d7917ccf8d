//! models — heteroscedastic envelope fitting and prediction.
//!
//! Purpose
//! -------
//! Wire `envelope::core` (grouped statistics, objective, initializer) to a
//! [`ManifoldOptimizer`](crate::optimization::manifold::ManifoldOptimizer)
//! and to `inference`, producing immutable [`HenvFit`] results.
//!
//! Key behaviors
//! -------------
//! - [`henv`]: [`HenvModel::fit`] for any `0 ≤ u ≤ r`, with closed forms at
//!   the boundaries and [`OptimizerSummary`] diagnostics.
//! - [`predict`]: [`HenvFit::predict`] for a new indicator row.
//! - [`model_internals`]: log-likelihood constants, parameter counts and the
//!   assembly of fitted parameters from a subspace.
//!
//! Testing notes
//! -------------
//! - Unit tests cover precondition order, boundary closed forms, structural
//!   identities of interior fits and prediction covariances; recovery on
//!   simulated data is covered by the integration tests.

pub mod henv;
pub mod model_internals;
pub mod predict;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::henv::{CLOSED_FORM, HenvFit, HenvModel, OptimizerSummary};
pub use self::model_internals::param_count;
pub use self::predict::HenvPrediction;

pub mod prelude {
    pub use super::{HenvFit, HenvModel, HenvPrediction, OptimizerSummary};
}
