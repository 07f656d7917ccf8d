//! Grouped sufficient statistics for heteroscedastic envelope models.
//!
//! Purpose
//! -------
//! Reduce raw observations `(X, Y)` to the statistics every `henv`
//! computation consumes: the group structure discovered from the indicator
//! rows of `X`, per-group means and covariances, and the pooled (marginal)
//! mean and covariance of `Y`.
//!
//! Key behaviors
//! -------------
//! - Groups are the distinct rows of `X` under exact floating-point
//!   equality, ordered by a lexicographic sort of those rows.
//! - The sort is stable, so observations keep their original relative order
//!   within a group; [`GroupedData::order`] lists original row indices in
//!   grouped order.
//! - Group sizes are checked before any decomposition is attempted.
//!
//! Invariants & assumptions
//! ------------------------
//! - `n ≥ 1`, `r ≥ 1`, every entry finite, and `n_i ≥ r` for every group.
//! - Covariances use the maximum-likelihood divisors (`n_i` for group
//!   covariances, `n` for the marginal covariance).
//! - `log_det_sigma_y` is finite, i.e. `Σ_Y` is positive definite.
//!
//! Conventions
//! -----------
//! - Group labels are 0-based positions in the sorted group order;
//!   `group_index[obs]` is the label of original row `obs`.
//! - Group means are stored as the columns of an `r×p` matrix.
//!
//! Downstream usage
//! ----------------
//! - `HenvObjective` reads `counts`, `group_covs` and `log_det_sigma_y`.
//! - `HenvModel::fit` builds fitted values from `group_index`.
//! - Prediction looks groups up with [`GroupedData::find_group`].
use crate::{
    envelope::{
        core::validation::{validate_group_sizes, validate_observations},
        errors::EnvelopeResult,
    },
    linalg::log_det_spd,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::cmp::Ordering;

/// `GroupedData` — validated group structure plus sufficient statistics.
///
/// Fields
/// ------
/// - `n`, `r`, `p`: observations, response dimension, number of groups.
/// - `groups`: `p×k` matrix whose rows are the distinct indicator rows.
/// - `counts`: group sizes `n_i`.
/// - `group_means`: `r×p`, column `i` is the mean response of group `i`.
/// - `group_covs`: `Σ_i` (divisor `n_i`), one `r×r` matrix per group.
/// - `grand_mean`, `sigma_y`, `log_det_sigma_y`: pooled statistics
///   (divisor `n`).
/// - `order`: original row indices arranged contiguously by group.
/// - `group_index`: group label of each original row.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedData {
    pub n: usize,
    pub r: usize,
    pub p: usize,
    pub groups: Array2<f64>,
    pub counts: Vec<usize>,
    pub group_means: Array2<f64>,
    pub group_covs: Vec<Array2<f64>>,
    pub grand_mean: Array1<f64>,
    pub sigma_y: Array2<f64>,
    pub log_det_sigma_y: f64,
    pub order: Vec<usize>,
    pub group_index: Vec<usize>,
}

impl GroupedData {
    /// Group the observations and compute sufficient statistics.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `n×k` group-indicator rows. Any finite encoding works; rows
    ///   that compare equal entry-wise belong to the same group.
    /// - `y`: `n×r` responses.
    ///
    /// Errors
    /// ------
    /// - `EnvelopeError::EmptyData`, `DimensionMismatch` or `NonFiniteData`
    ///   from [`validate_observations`].
    /// - `EnvelopeError::InsufficientGroupSize` when some `n_i < r`.
    /// - `EnvelopeError::NumericalInstability` when `Σ_Y` is not positive
    ///   definite.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use envelope_models::envelope::core::data::GroupedData;
    /// let x = array![[1.0], [0.0], [1.0], [0.0]];
    /// let y = array![[1.0], [-1.0], [3.0], [-3.0]];
    /// let data = GroupedData::new(x.view(), y.view()).unwrap();
    /// assert_eq!(data.p, 2);
    /// assert_eq!(data.group_index, vec![1, 0, 1, 0]);
    /// ```
    pub fn new(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> EnvelopeResult<Self> {
        validate_observations(x, y)?;
        let (n, r) = y.dim();

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| lexicographic(x.row(a), x.row(b)));

        let mut group_index = vec![0usize; n];
        let mut counts: Vec<usize> = Vec::new();
        let mut leaders: Vec<usize> = Vec::new();
        for &obs in &order {
            let same = leaders.last().is_some_and(|&lead| x.row(lead) == x.row(obs));
            if same {
                if let Some(last) = counts.last_mut() {
                    *last += 1;
                }
            } else {
                leaders.push(obs);
                counts.push(1);
            }
            group_index[obs] = counts.len() - 1;
        }
        validate_group_sizes(&counts, r)?;

        let p = counts.len();
        let groups = x.select(Axis(0), &leaders);
        let mut group_means = Array2::<f64>::zeros((r, p));
        for (obs, &g) in group_index.iter().enumerate() {
            let mut col = group_means.column_mut(g);
            col += &y.row(obs);
        }
        for (g, &count) in counts.iter().enumerate() {
            group_means.column_mut(g).mapv_inplace(|v| v / count as f64);
        }

        let mut group_covs = vec![Array2::<f64>::zeros((r, r)); p];
        for (obs, &g) in group_index.iter().enumerate() {
            let centered = &y.row(obs) - &group_means.column(g);
            add_outer(&mut group_covs[g], centered.view());
        }
        for (cov, &count) in group_covs.iter_mut().zip(&counts) {
            cov.mapv_inplace(|v| v / count as f64);
        }

        let grand_mean = y.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(r));
        let mut sigma_y = Array2::<f64>::zeros((r, r));
        for row in y.rows() {
            let centered = &row - &grand_mean;
            add_outer(&mut sigma_y, centered.view());
        }
        sigma_y.mapv_inplace(|v| v / n as f64);
        let log_det_sigma_y = log_det_spd(&sigma_y, "marginal response covariance")?;

        Ok(Self {
            n,
            r,
            p,
            groups,
            counts,
            group_means,
            group_covs,
            grand_mean,
            sigma_y,
            log_det_sigma_y,
            order,
            group_index,
        })
    }

    /// Group fractions `f_i = n_i / n`.
    pub fn fractions(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64 / self.n as f64).collect()
    }

    /// Label of the group whose indicator row equals `row`, if any.
    pub fn find_group(&self, row: ArrayView1<'_, f64>) -> Option<usize> {
        find_group(&self.groups, row)
    }
}

/// Label of the row of `groups` equal to `row` (exact comparison).
pub fn find_group(groups: &Array2<f64>, row: ArrayView1<'_, f64>) -> Option<usize> {
    if row.len() != groups.ncols() {
        return None;
    }
    groups.rows().into_iter().position(|g| g == row)
}

// ---- Helper methods ----

/// Lexicographic comparison of two finite rows.
fn lexicographic(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Ordering {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| x.partial_cmp(y).unwrap_or(Ordering::Equal))
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// `acc += v vᵀ`.
fn add_outer(acc: &mut Array2<f64>, v: ArrayView1<'_, f64>) {
    let r = v.len();
    for i in 0..r {
        for j in 0..r {
            acc[[i, j]] += v[i] * v[j];
        }
    }
}
