//! linalg — dense linear algebra for envelope estimation.
//!
//! Purpose
//! -------
//! Gather the matrix machinery shared by the objective, the manifold
//! optimizers and the inference layer: an `ndarray` ↔ `nalgebra` bridge,
//! fallible decompositions, and the matrix-calculus operators used when
//! assembling Fisher information and Jacobians.
//!
//! Key behaviors
//! -------------
//! - [`decomp`] wraps nalgebra's symmetric eigen, QR and SVD routines and
//!   returns `ndarray` matrices.
//! - [`matrix_calculus`] builds `vec`/`vech`, Kronecker products and the
//!   commutation, duplication and contraction matrices.
//! - [`errors`] defines [`LinalgError`], converted into higher-level errors
//!   with `From`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All matrices are `f64` and dense.
//! - Zero-sized inputs are valid and produce the natural degenerate result.
//!
//! Downstream usage
//! ----------------
//! - `envelope::core::objective` uses the SPD helpers on every evaluation.
//! - `inference` uses the matrix-calculus operators and [`pinv_sym`].

pub mod bridge;
pub mod decomp;
pub mod errors;
pub mod matrix_calculus;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::{
    decomp::{
        SymEigen, inverse, log_det_spd, numerical_rank, orthogonal_complement, orthonormalize,
        pinv_sym, principal_angles, spd_eigen, spd_inv_sqrt, spd_inverse, sym_eigen,
    },
    errors::{LinalgError, LinalgResult},
};

pub mod prelude {
    pub use super::decomp::{
        SymEigen, log_det_spd, orthogonal_complement, orthonormalize, pinv_sym,
        principal_angles, sym_eigen,
    };
    pub use super::errors::{LinalgError, LinalgResult};
    pub use super::matrix_calculus::{commutation, contraction, duplication, kron, vec, vech};
}
