//! AIC / BIC selection of the envelope dimension.
//!
//! `AIC(u) = −2 l_u + 2 k_u` and `BIC(u) = −2 l_u + log(n) k_u`; the
//! selected `u` is the first minimizer.
use crate::{
    envelope::{core::options::HenvOptions, errors::EnvelopeResult},
    selection::path::{DimensionSelection, fit_all_dimensions, summaries},
};
use log::debug;
use ndarray::ArrayView2;

/// aic_henv — choose `u` by Akaike's information criterion.
///
/// # Errors
/// Any error of `HenvModel::fit` for some `u`.
pub fn aic_henv(
    x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>, options: &HenvOptions,
) -> EnvelopeResult<DimensionSelection> {
    select_by_penalty(x, y, options, 2.0, "aic_henv")
}

/// bic_henv — choose `u` by the Bayesian information criterion.
///
/// # Errors
/// Any error of `HenvModel::fit` for some `u`.
pub fn bic_henv(
    x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>, options: &HenvOptions,
) -> EnvelopeResult<DimensionSelection> {
    let penalty = (y.nrows() as f64).ln();
    select_by_penalty(x, y, options, penalty, "bic_henv")
}

// ---- Helper methods ----

fn select_by_penalty(
    x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>, options: &HenvOptions, penalty: f64,
    label: &str,
) -> EnvelopeResult<DimensionSelection> {
    let fits = fit_all_dimensions(x, y, options)?;
    let (loglik, param_num) = summaries(&fits);
    let criterion: Vec<f64> = loglik
        .iter()
        .zip(&param_num)
        .map(|(l, &k)| -2.0 * l + penalty * k as f64)
        .collect();
    let u = first_argmin(&criterion);
    debug!("{label}: criterion = {criterion:?}, selected u = {u}");
    Ok(DimensionSelection { u, criterion, loglik, param_num })
}

fn first_argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best, min), (i, &v)| if v < min { (i, v) } else { (best, min) })
        .0
}
