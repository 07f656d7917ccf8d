//! ndarray ↔ nalgebra bridge.
//!
//! Public matrices in this crate are `ndarray` arrays; decompositions run on
//! `nalgebra::DMatrix`. These two helpers are the only place where the two
//! representations meet. Both copy element-wise and never reorder, so
//! `from_dmatrix(&to_dmatrix(a.view())) == a` exactly.

use nalgebra::DMatrix;
use ndarray::{Array2, ArrayView2};

/// Copy an `ndarray` matrix into a freshly allocated `DMatrix`.
pub fn to_dmatrix(a: ArrayView2<'_, f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

/// Copy a `DMatrix` back into an `ndarray` matrix.
pub fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}
