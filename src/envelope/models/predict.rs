//! Prediction from a fitted heteroscedastic envelope model.
//!
//! The prediction for a new indicator row is the fitted mean of the group it
//! names. Its estimation covariance is `L · cov_matrix · Lᵀ / n`, where
//! `L = D_g` maps `(μ, β_1..β_{p−1})` to the group mean; adding `Σ_g` gives
//! the covariance of a new response drawn from that group. With `u = 0` the
//! group means all equal `μ` and the estimation covariance is `Σ_Y / n`.
use crate::{
    envelope::{
        core::data::find_group,
        errors::{EnvelopeError, EnvelopeResult},
        models::henv::HenvFit,
    },
    inference::mean_derivative,
};
use ndarray::{Array1, Array2, ArrayView1};

/// Result of [`HenvFit::predict`].
#[derive(Debug, Clone, PartialEq)]
pub struct HenvPrediction {
    /// Group label (column of `mug`).
    pub group: usize,
    /// Fitted mean of the group (`r`).
    pub value: Array1<f64>,
    /// Covariance of the estimated mean (`r×r`).
    pub cov_est: Array2<f64>,
    /// `sqrt(diag(cov_est))`.
    pub se_est: Array1<f64>,
    /// `cov_est + Σ_g`.
    pub cov_pred: Array2<f64>,
    /// `sqrt(diag(cov_pred))`.
    pub se_pred: Array1<f64>,
}

impl HenvFit {
    /// Predict the response mean for the group whose indicator row equals
    /// `x_new` exactly.
    ///
    /// # Errors
    /// - `EnvelopeError::DimensionMismatch` when `x_new` has the wrong length.
    /// - `EnvelopeError::UnknownGroup` when no fitted group matches.
    /// - `EnvelopeError::NumericalInstability` for a non-finite or clearly
    ///   negative variance.
    pub fn predict(&self, x_new: ArrayView1<'_, f64>) -> EnvelopeResult<HenvPrediction> {
        if x_new.len() != self.groups.ncols() {
            return Err(EnvelopeError::DimensionMismatch {
                context: "indicator length",
                expected: self.groups.ncols(),
                found: x_new.len(),
            });
        }
        let group = find_group(&self.groups, x_new).ok_or(EnvelopeError::UnknownGroup)?;
        let value = self.mug.column(group).to_owned();

        let cov_est = match &self.asymptotics {
            Some(asy) => {
                let total = self.n as f64;
                let fractions: Vec<f64> =
                    self.counts.iter().map(|&c| c as f64 / total).collect();
                let l = mean_derivative(self.r, group, &fractions)?;
                l.dot(&asy.cov_matrix).dot(&l.t()) / total
            }
            None => &self.sigma_y / self.n as f64,
        };
        let cov_pred = &cov_est + &self.sigma[group];
        let se_est = diag_sqrt(&cov_est)?;
        let se_pred = diag_sqrt(&cov_pred)?;
        Ok(HenvPrediction { group, value, cov_est, se_est, cov_pred, se_pred })
    }
}

// ---- Helper methods ----

fn diag_sqrt(cov: &Array2<f64>) -> EnvelopeResult<Array1<f64>> {
    let scale = cov.diag().iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
    cov.diag()
        .iter()
        .map(|&v| {
            if !v.is_finite() || v < -1e-12 * scale {
                Err(EnvelopeError::NumericalInstability {
                    reason: format!("prediction variance {v} is not a valid variance"),
                })
            } else {
                Ok(v.max(0.0).sqrt())
            }
        })
        .collect()
}
