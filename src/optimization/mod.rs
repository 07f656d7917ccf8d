//! optimization — subspace optimizers, argmin L-BFGS, shared numerics.
//!
//! Purpose
//! -------
//! Provide everything the envelope estimator needs to optimize its profile
//! objective: Grassmann-manifold optimizers behind a strategy trait, the
//! argmin-backed Euclidean L-BFGS they can delegate to, shared tolerances,
//! and a single error surface.
//!
//! Key behaviors
//! -------------
//! - [`manifold`]: [`manifold::ManifoldOptimizer`] with the Riemannian CG and
//!   chart-based L-BFGS implementations.
//! - [`loglik_optimizer`]: log-likelihood maximization with argmin L-BFGS
//!   (More–Thuente or Hager–Zhang line search, `finitediff` fallback).
//! - [`numerical_stability`]: eigenvalue and rank floors, `symmetrize`,
//!   `relative_change`.
//! - [`errors`]: [`errors::OptError`] / [`errors::OptResult`], with `From`
//!   conversions from argmin and linear-algebra errors.
//!
//! Conventions
//! -----------
//! - Manifold optimizers **minimize** `F`; the Euclidean layer
//!   **maximizes** `ℓ`. The chart solver bridges the two with `ℓ = −F`.
//! - Library code logs through the `log` facade only; verbose runs may also
//!   attach argmin's slog observer when the `obs_slog` feature is enabled.

pub mod errors;
pub mod loglik_optimizer;
pub mod manifold;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::manifold::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
