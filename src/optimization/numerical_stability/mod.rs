//! numerical_stability — shared tolerances and guarded numeric helpers.
//!
//! Purpose
//! -------
//! Centralize the small numerical tolerances and helper routines that the
//! linear-algebra bridge, the manifold optimizers and the inference layer
//! must agree on, so that "numerically zero" means the same thing everywhere.
//!
//! Key behaviors
//! -------------
//! - Expose eigenvalue / rank floors (`EIGEN_EPS`, `RANK_TOL`) used by
//!   pseudoinverses and rank checks.
//! - Expose `GENERAL_TOL` for structural checks on caller-supplied matrices.
//! - Provide `symmetrize` and `relative_change` helpers.
//!
//! Conventions
//! -----------
//! - Floors are **relative** to the largest eigenvalue / singular value of
//!   the matrix being inspected unless documented otherwise.
//! - This module never logs, performs I/O, or touches global state.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover the helper functions; the
//!   tolerances themselves are exercised by the pseudoinverse and rank tests
//!   in `linalg::decomp`.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, GENERAL_TOL, RANK_TOL, relative_change, symmetrize,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use envelope_models::optimization::numerical_stability::prelude::*;
//
// to import the main numerical-stability surface in a single line.

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, GENERAL_TOL, RANK_TOL, relative_change, symmetrize,
    };
}
