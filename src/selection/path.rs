//! Fits of every envelope dimension and the selection result type.
use crate::envelope::{
    core::options::HenvOptions,
    errors::EnvelopeResult,
    models::henv::{HenvFit, HenvModel},
};
use log::debug;
use ndarray::ArrayView2;

/// DimensionSelection — outcome of choosing `u` by a criterion.
///
/// Vectors are indexed by `u = 0..=r`. `criterion` holds the score that was
/// compared: a p-value for the likelihood-ratio test, `−2l + penalty` for the
/// information criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionSelection {
    pub u: usize,
    pub criterion: Vec<f64>,
    pub loglik: Vec<f64>,
    pub param_num: Vec<usize>,
}

/// Fit `u = 0..=r` with shared options.
///
/// # Errors
/// The first error returned by [`HenvModel::fit`].
pub fn fit_all_dimensions(
    x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>, options: &HenvOptions,
) -> EnvelopeResult<Vec<HenvFit>> {
    let r = y.ncols();
    (0..=r)
        .map(|u| {
            let fit = HenvModel::fit(x, y, u, options)?;
            debug!("dimension path: u = {u}, loglik = {}, params = {}", fit.loglik, fit.param_num);
            Ok(fit)
        })
        .collect()
}

/// Log-likelihoods and parameter counts of a dimension path.
pub(crate) fn summaries(fits: &[HenvFit]) -> (Vec<f64>, Vec<usize>) {
    (fits.iter().map(|f| f.loglik).collect(), fits.iter().map(|f| f.param_num).collect())
}
