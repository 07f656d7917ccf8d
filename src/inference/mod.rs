//! inference — asymptotic covariance for heteroscedastic envelope fits.
//!
//! Purpose
//! -------
//! Provide closed-form asymptotic standard errors for the group means and
//! effects of a fitted model, for both the envelope estimator and the
//! unrestricted (`u = r`) estimator it is compared against.
//!
//! Key behaviors
//! -------------
//! - [`information`]: block Fisher information `J` of the unrestricted
//!   group-wise Gaussian model.
//! - [`jacobian`]: the Jacobian `H` of the map from envelope parameters to
//!   unrestricted parameters.
//! - [`asymptotic`]: `avar = H (HᵀJH)⁺ Hᵀ`, standard errors and efficiency
//!   ratios.
//! - [`errors`]: [`InferenceError`] / [`InferenceResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Group covariances are positive definite.
//! - Results are per observation; the caller scales by `1/n`.
//!
//! Conventions
//! -----------
//! - Parameter vectors stack `μ` first, then `β_1..β_{p−1}`, then the
//!   half-vectorized covariances group by group.
//! - All functions are pure: no logging, no global state.
//!
//! Testing notes
//! -------------
//! - `J` is checked against hand-computed small cases; `H` against central
//!   differences of the explicit parameter map; the covariance assembly
//!   against identity Jacobians and coordinate restrictions.

pub mod asymptotic;
pub mod errors;
pub mod information;
pub mod jacobian;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::{
    asymptotic::{
        AsymptoticCovariance, envelope_asymptotics, full_model_asymptotics, standard_errors,
    },
    errors::{InferenceError, InferenceResult},
    information::{fisher_information, mean_derivative},
    jacobian::{EnvelopeParams, reparameterization_jacobian},
};

pub mod prelude {
    pub use super::{
        AsymptoticCovariance, EnvelopeParams, InferenceError, InferenceResult,
        envelope_asymptotics, fisher_information, full_model_asymptotics,
        reparameterization_jacobian,
    };
}
