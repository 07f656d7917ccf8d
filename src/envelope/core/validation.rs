//! Envelope validation helpers — eager precondition checks for `henv` fits.
//!
//! Purpose
//! -------
//! Centralize the input checks run before any statistic is computed, so
//! `HenvModel::fit` fails fast with a structured [`EnvelopeError`] and the
//! numerical code downstream can assume clean inputs.
//!
//! Key behaviors
//! -------------
//! - [`validate_dimension`]: `0 ≤ u ≤ r`.
//! - [`validate_observations`]: non-empty responses, matching row counts and
//!   finite entries in both matrices.
//! - [`validate_initial_basis`]: shape `r×u` and full column rank.
//! - [`validate_group_sizes`]: every group has at least `r` observations.
//!
//! Conventions
//! -----------
//! - `HenvModel::fit` calls these in the order listed above; the first
//!   failing check determines the error.
//! - Non-finite entries are reported at their first occurrence in row-major
//!   order, predictors before responses.
use crate::{
    envelope::errors::{EnvelopeError, EnvelopeResult},
    linalg::numerical_rank,
};
use ndarray::{Array2, ArrayView2};

/// Check `u ≤ r`.
pub fn validate_dimension(u: usize, r: usize) -> EnvelopeResult<()> {
    if u > r {
        return Err(EnvelopeError::InvalidDimension { u, r });
    }
    Ok(())
}

/// Check the observation matrices before grouping.
///
/// # Errors
/// - [`EnvelopeError::EmptyData`] when `y` has no rows or no columns.
/// - [`EnvelopeError::DimensionMismatch`] when `x` and `y` disagree on `n`.
/// - [`EnvelopeError::NonFiniteData`] for the first NaN / ±∞ entry.
pub fn validate_observations(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> EnvelopeResult<()> {
    let (n, r) = y.dim();
    if n == 0 || r == 0 {
        return Err(EnvelopeError::EmptyData);
    }
    if x.nrows() != n {
        return Err(EnvelopeError::DimensionMismatch {
            context: "predictor rows",
            expected: n,
            found: x.nrows(),
        });
    }
    check_finite(x, "X")?;
    check_finite(y, "Y")
}

/// Check a caller-supplied starting basis.
///
/// # Errors
/// - [`EnvelopeError::DimensionMismatch`] when the basis is not `r×u`.
/// - [`EnvelopeError::NonFiniteData`] for non-finite entries.
/// - [`EnvelopeError::RankDeficientInitialization`] when its rank is below `u`.
pub fn validate_initial_basis(basis: &Array2<f64>, r: usize, u: usize) -> EnvelopeResult<()> {
    if basis.nrows() != r {
        return Err(EnvelopeError::DimensionMismatch {
            context: "initial basis rows",
            expected: r,
            found: basis.nrows(),
        });
    }
    if basis.ncols() != u {
        return Err(EnvelopeError::DimensionMismatch {
            context: "initial basis columns",
            expected: u,
            found: basis.ncols(),
        });
    }
    check_finite(basis.view(), "initial basis")?;
    let rank = numerical_rank(basis);
    if u > 0 && rank < u {
        return Err(EnvelopeError::RankDeficientInitialization { rank, expected: u });
    }
    Ok(())
}

/// Check `n_i ≥ r` for every group (in group order).
pub fn validate_group_sizes(counts: &[usize], r: usize) -> EnvelopeResult<()> {
    match counts.iter().enumerate().find(|(_, size)| **size < r) {
        Some((group, &size)) => {
            Err(EnvelopeError::InsufficientGroupSize { group, size, required: r })
        }
        None => Ok(()),
    }
}

// ---- Helper methods ----

fn check_finite(a: ArrayView2<'_, f64>, matrix: &'static str) -> EnvelopeResult<()> {
    match a.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => {
            Err(EnvelopeError::NonFiniteData { matrix, row, col, value })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // ---- Scope ----
    // Each helper accepts a representative valid input and rejects the
    // boundary failures with the documented variant and payload.

    #[test]
    // Purpose
    // -------
    // `validate_dimension` accepts the boundaries and rejects u > r.
    //
    // Given
    // -----
    // - r = 3 with u ∈ {0, 3, 4}.
    //
    // Expect
    // ------
    // - Ok for 0 and 3, InvalidDimension for 4.
    fn dimension_bounds() {
        assert!(validate_dimension(0, 3).is_ok());
        assert!(validate_dimension(3, 3).is_ok());
        assert_eq!(validate_dimension(4, 3), Err(EnvelopeError::InvalidDimension { u: 4, r: 3 }));
    }

    #[test]
    // Purpose
    // -------
    // Observation checks report row mismatches and the first non-finite entry.
    //
    // Given
    // -----
    // - A 2-row X against a 3-row Y, and a Y with NaN at (1, 0).
    //
    // Expect
    // ------
    // - DimensionMismatch, then NonFiniteData pointing at (1, 0) of Y.
    fn observation_checks() {
        // Arrange
        let x2 = array![[1.0], [0.0]];
        let x3 = array![[1.0], [0.0], [1.0]];
        let y = array![[1.0, 2.0], [f64::NAN, 0.0], [0.5, 0.5]];

        // Act
        let mismatch = validate_observations(x2.view(), y.view());
        let nonfinite = validate_observations(x3.view(), y.view());

        // Assert
        assert!(matches!(mismatch, Err(EnvelopeError::DimensionMismatch { expected: 3, found: 2, .. })));
        assert!(matches!(
            nonfinite,
            Err(EnvelopeError::NonFiniteData { matrix: "Y", row: 1, col: 0, .. })
        ));
        assert_eq!(
            validate_observations(x3.view(), Array2::<f64>::zeros((3, 0)).view()),
            Err(EnvelopeError::EmptyData)
        );
    }

    #[test]
    // Purpose
    // -------
    // Initial bases must have the right shape and full column rank.
    //
    // Given
    // -----
    // - r = 3, u = 2 with a 3×1 basis, a rank-1 3×2 basis and a valid one.
    //
    // Expect
    // ------
    // - DimensionMismatch, RankDeficientInitialization { rank: 1 }, Ok.
    fn initial_basis_checks() {
        let narrow = array![[1.0], [0.0], [0.0]];
        let collinear = array![[1.0, 2.0], [1.0, 2.0], [0.0, 0.0]];
        let good = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

        assert!(matches!(
            validate_initial_basis(&narrow, 3, 2),
            Err(EnvelopeError::DimensionMismatch { expected: 2, found: 1, .. })
        ));
        assert_eq!(
            validate_initial_basis(&collinear, 3, 2),
            Err(EnvelopeError::RankDeficientInitialization { rank: 1, expected: 2 })
        );
        assert!(validate_initial_basis(&good, 3, 2).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // The first undersized group is reported.
    //
    // Given
    // -----
    // - counts [5, 2, 1] with r = 3.
    //
    // Expect
    // ------
    // - InsufficientGroupSize for group 1 with size 2.
    fn group_size_check_reports_first_offender() {
        assert_eq!(
            validate_group_sizes(&[5, 2, 1], 3),
            Err(EnvelopeError::InsufficientGroupSize { group: 1, size: 2, required: 3 })
        );
        assert!(validate_group_sizes(&[3, 4], 3).is_ok());
    }
}
