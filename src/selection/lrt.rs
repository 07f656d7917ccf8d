//! Likelihood-ratio selection of the envelope dimension.
//!
//! For each `u < r` the envelope fit is tested against the unrestricted fit
//! (`u = r`) with `Λ_u = 2(l_r − l_u)` and `df = k_r − k_u` degrees of
//! freedom. The selected dimension is the smallest `u` that is not rejected
//! at level `alpha`, or `r` when every smaller dimension is rejected.
use crate::{
    envelope::{
        core::options::HenvOptions,
        errors::{EnvelopeError, EnvelopeResult},
    },
    selection::path::{DimensionSelection, fit_all_dimensions, summaries},
};
use log::debug;
use ndarray::ArrayView2;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// lrt_henv — choose `u` by sequential likelihood-ratio tests.
///
/// `criterion[u]` is the χ² p-value of the test at `u` (1 at `u = r`).
///
/// # Errors
/// - `EnvelopeError::InvalidSignificance` unless `0 < alpha < 1`; checked
///   before any fit.
/// - Any error of `HenvModel::fit` for some `u`.
pub fn lrt_henv(
    x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>, alpha: f64, options: &HenvOptions,
) -> EnvelopeResult<DimensionSelection> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(EnvelopeError::InvalidSignificance { alpha });
    }
    let fits = fit_all_dimensions(x, y, options)?;
    let (loglik, param_num) = summaries(&fits);
    let r = fits.len() - 1;

    let p_values = (0..=r)
        .map(|u| lr_p_value(loglik[r] - loglik[u], param_num[r].saturating_sub(param_num[u])))
        .collect::<EnvelopeResult<Vec<f64>>>()?;
    let u = p_values.iter().position(|&pv| pv > alpha).unwrap_or(r);
    debug!("lrt_henv: alpha = {alpha}, p-values = {p_values:?}, selected u = {u}");

    Ok(DimensionSelection { u, criterion: p_values, loglik, param_num })
}

/// Upper χ²(df) tail of `2·gap`; negative gaps count as 0 and `df = 0`
/// gives 1.
fn lr_p_value(gap: f64, df: usize) -> EnvelopeResult<f64> {
    if df == 0 {
        return Ok(1.0);
    }
    let stat = (2.0 * gap).max(0.0);
    let chi2 = ChiSquared::new(df as f64).map_err(|e| EnvelopeError::NumericalInstability {
        reason: format!("chi-squared with {df} degrees of freedom: {e}"),
    })?;
    Ok(chi2.sf(stat))
}
