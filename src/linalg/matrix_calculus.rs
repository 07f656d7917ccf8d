//! Matrix-calculus building blocks: `vec`, `vech`, Kronecker products and
//! the commutation / duplication / contraction matrices.
//!
//! Conventions
//! -----------
//! - `vec` stacks columns (column-major): entry `(i, j)` of an `m×n` matrix
//!   lands at index `i + j·m`.
//! - `vech` stacks the lower triangle column by column: entry `(i, j)` with
//!   `i ≥ j` of an `n×n` matrix lands at `j·n − j(j+1)/2 + i`.
//! - `K_{m,n}` satisfies `K_{m,n} vec(A) = vec(Aᵀ)` for `A` of shape `m×n`.
//! - `E_n` (duplication) satisfies `E_n vech(A) = vec(A)` for symmetric `A`.
//! - `C_n = (E_nᵀE_n)⁻¹E_nᵀ` (contraction) satisfies `C_n vec(A) = vech(A)`
//!   for symmetric `A`, and `C_n E_n = I`.
//!
//! These matrices are small (`r² × r(r+1)/2` at most) and are built densely.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Kronecker product `A ⊗ B`.
pub fn kron(a: &ArrayView2<'_, f64>, b: &ArrayView2<'_, f64>) -> Array2<f64> {
    let (m, n) = a.dim();
    let (p, q) = b.dim();
    let mut out = Array2::<f64>::zeros((m * p, n * q));
    for i in 0..m {
        for j in 0..n {
            let aij = a[[i, j]];
            if aij == 0.0 {
                continue;
            }
            let mut block = out.slice_mut(ndarray::s![i * p..(i + 1) * p, j * q..(j + 1) * q]);
            block.zip_mut_with(b, |o, &bv| *o = aij * bv);
        }
    }
    out
}

/// Column-major vectorization.
pub fn vec(a: &ArrayView2<'_, f64>) -> Array1<f64> {
    a.t().iter().copied().collect()
}

/// Inverse of [`vec`]: reshape a length `rows·cols` vector column-major.
///
/// # Panics
/// Panics if `v.len() != rows * cols`; callers size `v` from the same
/// dimensions.
pub fn unvec(v: &ArrayView1<'_, f64>, rows: usize, cols: usize) -> Array2<f64> {
    assert_eq!(v.len(), rows * cols, "unvec: length does not match shape");
    Array2::from_shape_fn((rows, cols), |(i, j)| v[i + j * rows])
}

/// Number of free entries of an `n×n` symmetric matrix.
pub const fn vech_len(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Position of entry `(i, j)` of an `n×n` symmetric matrix inside `vech`.
pub fn vech_index(i: usize, j: usize, n: usize) -> usize {
    let (hi, lo) = if i >= j { (i, j) } else { (j, i) };
    lo * n - lo * (lo + 1) / 2 + hi
}

/// Half-vectorization of the lower triangle.
pub fn vech(a: &ArrayView2<'_, f64>) -> Array1<f64> {
    let n = a.nrows();
    let mut out = Array1::zeros(vech_len(n));
    for j in 0..n {
        for i in j..n {
            out[vech_index(i, j, n)] = a[[i, j]];
        }
    }
    out
}

/// Inverse of [`vech`]: rebuild the symmetric `n×n` matrix.
pub fn unvech(v: &ArrayView1<'_, f64>, n: usize) -> Array2<f64> {
    Array2::from_shape_fn((n, n), |(i, j)| v[vech_index(i, j, n)])
}

/// Commutation matrix `K_{m,n}` of shape `mn × mn`.
pub fn commutation(m: usize, n: usize) -> Array2<f64> {
    let mut k = Array2::zeros((m * n, m * n));
    for i in 0..m {
        for j in 0..n {
            k[[j + i * n, i + j * m]] = 1.0;
        }
    }
    k
}

/// Duplication matrix `E_n` of shape `n² × n(n+1)/2`.
pub fn duplication(n: usize) -> Array2<f64> {
    let mut e = Array2::zeros((n * n, vech_len(n)));
    for j in 0..n {
        for i in 0..n {
            e[[i + j * n, vech_index(i, j, n)]] = 1.0;
        }
    }
    e
}

/// Contraction matrix `C_n = (E_nᵀE_n)⁻¹E_nᵀ` of shape `n(n+1)/2 × n²`.
pub fn contraction(n: usize) -> Array2<f64> {
    let mut c = Array2::zeros((vech_len(n), n * n));
    for j in 0..n {
        for i in 0..n {
            let weight = if i == j { 1.0 } else { 0.5 };
            c[[vech_index(i, j, n), i + j * n]] = weight;
        }
    }
    c
}
