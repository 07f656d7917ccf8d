//! Henv initialization — starting bases from eigenvector subsets.
//!
//! Purpose
//! -------
//! Pick a starting basis for the manifold optimizer among the eigenvectors
//! of the pooled within-group covariance `T = Σ_i (n_i/n) Σ_i`. Each
//! candidate is a set of `u` eigenvector columns, scored with the profile
//! objective `F`.
//!
//! Key behaviors
//! -------------
//! - Eigenvectors are ordered by descending eigenvalue.
//! - When `C(r, u) ≤` [`EXHAUSTIVE_LIMIT`], every `u`-subset is scored in
//!   lexicographic order and the first minimizer wins.
//! - Otherwise a coordinate-exchange search starts from columns `0..u`:
//!   [`EXCHANGE_PASSES`] passes of `u + 3` inner iterations, each trying every
//!   unselected column in the active slot and keeping strict improvements;
//!   the active slot advances cyclically after every inner iteration.
//!
//! Invariants & assumptions
//! ------------------------
//! - Called only for `0 < u < r`; the boundary dimensions have closed forms.
//! - Candidates whose score cannot be evaluated are treated as `+∞`.
//!
//! Conventions
//! -----------
//! - The returned `r×u` matrix has orthonormal columns (a column subset of an
//!   orthogonal eigenvector matrix).
use crate::{
    envelope::{
        core::data::GroupedData,
        errors::{EnvelopeError, EnvelopeResult},
    },
    linalg::sym_eigen,
    optimization::manifold::SubspaceObjective,
};
use log::debug;
use ndarray::{Array2, Axis};

/// Largest number of subsets scored exhaustively.
pub const EXHAUSTIVE_LIMIT: u128 = 20;

/// Outer passes of the coordinate-exchange search.
pub const EXCHANGE_PASSES: usize = 3;

/// Starting basis for `objective` chosen among eigenvectors of the pooled
/// within-group covariance of `data`.
///
/// # Errors
/// - `EnvelopeError::NumericalInstability` if the pooled covariance cannot
///   be decomposed or no candidate yields a finite objective.
pub fn eigen_subset_start(
    data: &GroupedData, objective: &dyn SubspaceObjective,
) -> EnvelopeResult<Array2<f64>> {
    let (r, u) = objective.dims();
    let fractions = data.fractions();
    let mut pooled = Array2::<f64>::zeros((r, r));
    for (cov, f) in data.group_covs.iter().zip(fractions) {
        pooled.scaled_add(f, cov);
    }
    let vectors = sym_eigen(&pooled, "pooled within-group covariance")?.vectors;
    let score = |columns: &[usize]| -> f64 {
        objective.value(&vectors.select(Axis(1), columns)).unwrap_or(f64::INFINITY)
    };

    let (columns, best) = if binomial_capped(r, u) <= EXHAUSTIVE_LIMIT {
        exhaustive(r, u, score)
    } else {
        coordinate_exchange(r, u, score)
    };
    if !best.is_finite() {
        return Err(EnvelopeError::NumericalInstability {
            reason: "no eigenvector subset gives a finite objective".to_string(),
        });
    }
    debug!("henv start: eigenvector columns {columns:?}, objective {best}");
    Ok(vectors.select(Axis(1), &columns))
}

// ---- Helper methods ----

/// `C(r, u)`, saturating once it exceeds [`EXHAUSTIVE_LIMIT`].
fn binomial_capped(r: usize, u: usize) -> u128 {
    let k = u.min(r.saturating_sub(u));
    let mut c: u128 = 1;
    for i in 0..k {
        c = c * (r - i) as u128 / (i as u128 + 1);
        if c > EXHAUSTIVE_LIMIT {
            return c;
        }
    }
    c
}

fn exhaustive<F: Fn(&[usize]) -> f64>(r: usize, u: usize, score: F) -> (Vec<usize>, f64) {
    let mut current: Vec<usize> = (0..u).collect();
    let mut best = (current.clone(), score(&current));
    loop {
        let Some(i) = (0..u).rev().find(|&i| current[i] < r - u + i) else {
            break;
        };
        current[i] += 1;
        for j in i + 1..u {
            current[j] = current[j - 1] + 1;
        }
        let value = score(&current);
        if value < best.1 {
            best = (current.clone(), value);
        }
    }
    best
}

fn coordinate_exchange<F: Fn(&[usize]) -> f64>(r: usize, u: usize, score: F) -> (Vec<usize>, f64) {
    let mut selected: Vec<usize> = (0..u).collect();
    let mut best = score(&selected);
    let mut slot = 0usize;
    for _ in 0..EXCHANGE_PASSES {
        for _ in 0..u + 3 {
            for candidate in 0..r {
                if selected.contains(&candidate) {
                    continue;
                }
                let previous = selected[slot];
                selected[slot] = candidate;
                let value = score(&selected);
                if value < best {
                    best = value;
                } else {
                    selected[slot] = previous;
                }
            }
            slot = (slot + 1) % u;
        }
    }
    (selected, best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::core::{objective::HenvObjective, test_support::grouped_sample};
    use approx::assert_abs_diff_eq;

    // ---- Scope ----
    // Subset enumeration order, the exhaustive argmin and the exchange
    // search never returning something worse than its start.

    #[test]
    // Purpose
    // -------
    // Subsets are visited in lexicographic order and the first minimizer
    // wins ties.
    //
    // Given
    // -----
    // - r = 4, u = 2 with a score that records visits and is constant.
    //
    // Expect
    // ------
    // - Six visits in lexicographic order; the winner is [0, 1].
    fn exhaustive_visits_subsets_lexicographically() {
        // Arrange
        let visits = std::cell::RefCell::new(Vec::new());

        // Act
        let (winner, _) = exhaustive(4, 2, |c: &[usize]| {
            visits.borrow_mut().push(c.to_vec());
            1.0
        });

        // Assert
        assert_eq!(
            visits.into_inner(),
            vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]]
        );
        assert_eq!(winner, vec![0, 1]);
        assert_eq!(binomial_capped(4, 2), 6);
        assert!(binomial_capped(40, 20) > EXHAUSTIVE_LIMIT);
    }

    #[test]
    // Purpose
    // -------
    // For small r the start is the best eigenvector subset.
    //
    // Given
    // -----
    // - r = 3, u = 1 on seeded two-group data.
    //
    // Expect
    // ------
    // - The returned column scores no worse than every eigenvector.
    fn small_problems_pick_the_best_subset() {
        // Arrange
        let (x, y) = grouped_sample(5, 3, 2, 25, 4.0);
        let data = GroupedData::new(x.view(), y.view()).unwrap();
        let objective = HenvObjective::new(&data, 1).unwrap();

        // Act
        let start = eigen_subset_start(&data, &objective).unwrap();

        // Assert
        let f_start = objective.value(&start).unwrap();
        let mut pooled = Array2::<f64>::zeros((3, 3));
        for (cov, f) in data.group_covs.iter().zip(data.fractions()) {
            pooled.scaled_add(f, cov);
        }
        let vectors = sym_eigen(&pooled, "test").unwrap().vectors;
        for j in 0..3 {
            let f_j = objective.value(&vectors.select(Axis(1), &[j])).unwrap();
            assert!(f_start <= f_j + 1e-12);
        }
        assert_abs_diff_eq!(start.column(0).dot(&start.column(0)), 1.0, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Coordinate exchange runs for large C(r, u) and only accepts strict
    // improvements.
    //
    // Given
    // -----
    // - r = 7, u = 3 (C = 35) on seeded two-group data.
    //
    // Expect
    // ------
    // - An orthonormal 7×3 start scoring no worse than the leading three
    //   eigenvectors.
    fn exchange_improves_on_leading_columns() {
        // Arrange
        let (x, y) = grouped_sample(9, 7, 2, 20, 3.0);
        let data = GroupedData::new(x.view(), y.view()).unwrap();
        let objective = HenvObjective::new(&data, 3).unwrap();

        // Act
        let start = eigen_subset_start(&data, &objective).unwrap();

        // Assert
        let gram = start.t().dot(&start);
        for ((i, j), v) in gram.indexed_iter() {
            assert_abs_diff_eq!(*v, if i == j { 1.0 } else { 0.0 }, epsilon = 1e-10);
        }
        let mut pooled = Array2::<f64>::zeros((7, 7));
        for (cov, f) in data.group_covs.iter().zip(data.fractions()) {
            pooled.scaled_add(f, cov);
        }
        let leading = sym_eigen(&pooled, "test").unwrap().vectors.select(Axis(1), &[0, 1, 2]);
        assert!(objective.value(&start).unwrap() <= objective.value(&leading).unwrap() + 1e-12);
    }
}
