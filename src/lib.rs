//! envelope_models — heteroscedastic envelope estimation for grouped
//! multivariate responses.
//!
//! Purpose
//! -------
//! Serve as the crate root. The crate estimates the heteroscedastic envelope
//! model by maximum likelihood over the Grassmann manifold, attaches
//! closed-form asymptotic standard errors, predicts group means for new
//! indicator rows and selects the envelope dimension.
//!
//! Key behaviors
//! -------------
//! - [`envelope`]: the user-facing surface (`HenvModel::fit`, `HenvFit`,
//!   `HenvFit::predict`, `HenvOptions`, `EnvelopeError`).
//! - [`selection`]: `lrt_henv`, `aic_henv` and `bic_henv`.
//! - [`inference`]: Fisher information, reparameterization Jacobian and
//!   asymptotic covariance.
//! - [`optimization`]: the `ManifoldOptimizer` trait with a Grassmann
//!   conjugate-gradient solver and an argmin L-BFGS chart solver, plus the
//!   Euclidean log-likelihood optimizer the latter is built on.
//! - [`linalg`]: the `ndarray`/`nalgebra` bridge, symmetric decompositions
//!   and matrix-calculus helpers.
//!
//! Invariants & assumptions
//! ------------------------
//! - All computation is synchronous and single-threaded; results depend only
//!   on the inputs and options.
//! - The library performs no I/O. Diagnostics go through the `log` facade;
//!   callers install a logger if they want to see them.
//!
//! Downstream usage
//! ----------------
//! - Most callers only need `envelope::prelude::*` and, for choosing `u`,
//!   `selection`.
//! - Custom solvers implement `optimization::manifold::ManifoldOptimizer`
//!   against `SubspaceObjective`.

pub mod envelope;
pub mod inference;
pub mod linalg;
pub mod optimization;
pub mod selection;
