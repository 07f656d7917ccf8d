//! loglik_optimizer — argmin-powered L-BFGS for log-likelihood maximization.
//!
//! Purpose
//! -------
//! Maximize a smooth objective `ℓ(θ)` over `θ ∈ R^d` with argmin's L-BFGS.
//! In this crate the objective is the envelope profile log-likelihood
//! expressed in local Grassmann chart coordinates (see
//! `optimization::manifold::chart`), but the layer is generic: implement
//! [`LogLikelihood`] and call [`maximize`].
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ` into the argmin cost `-ℓ`, with a
//!   `finitediff` fallback when no analytic gradient is provided.
//! - [`builders`] configure L-BFGS with More–Thuente or Hager–Zhang line
//!   search from [`MLEOptions`].
//! - [`run::run_lbfgs`] executes the solver and normalizes the final state
//!   into an [`OptimOutcome`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives report domain problems as [`OptError`](crate::optimization::errors::OptError)
//!   values; nothing in this layer panics on bad input.
//! - [`OptimOutcome::value`] is always on the `ℓ` scale.
//!
//! Testing notes
//! -------------
//! - Unit tests cover option validation, sign handling in the adapter,
//!   builder wiring, and end-to-end runs on quadratic objectives.
pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
