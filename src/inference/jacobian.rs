//! Reparameterization Jacobian `H = ∂h/∂ψ` of the heteroscedastic envelope.
//!
//! Purpose
//! -------
//! Express the unrestricted parameters
//! `h = (μ, β_1..β_{p−1}, vech Σ_1..vech Σ_p)` as functions of the envelope
//! parameters `ψ = (μ, vec η, vec Γ, vech Ω_1..vech Ω_p, vech Ω0)` through
//! `β_i = Γη_i` and `Σ_i = ΓΩ_iΓᵀ + Γ0Ω0Γ0ᵀ`, and differentiate.
//!
//! Key behaviors
//! -------------
//! - `∂vec β/∂vec η = I_{p−1} ⊗ Γ` and `∂vec β/∂vec Γ = ηᵀ ⊗ I_r`.
//! - `∂vech Σ_i/∂vec Γ = C_r[(ΓΩ_i ⊗ I_r) + (I_r ⊗ ΓΩ_i)K_{r,u}
//!   − (Γ ⊗ M) − (M ⊗ Γ)K_{r,u}]` with `M = Γ0Ω0Γ0ᵀ`; the last two terms come
//!   from `Γ0` rotating with `Γ` so that `Γ0ᵀΓ = 0` is preserved.
//! - `∂vech Σ_i/∂vech Ω_i = C_r(Γ ⊗ Γ)E_u` and
//!   `∂vech Σ_i/∂vech Ω0 = C_r(Γ0 ⊗ Γ0)E_{r−u}`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `H` is rank deficient by construction (`vec Γ` is over-parameterized by
//!   `u²` rotations); the asymptotic covariance uses a pseudoinverse.
use crate::{
    inference::{
        errors::{InferenceError, InferenceResult},
        information::unrestricted_dim,
    },
    linalg::matrix_calculus::{commutation, contraction, duplication, kron, vech_len},
};
use ndarray::{Array2, s};

/// Envelope parameters at which `H` is evaluated.
///
/// - `gamma`: `r×u`, `gamma0`: `r×(r−u)`, both orthonormal.
/// - `eta`: `u×p` coordinates of the group effects; only the first `p − 1`
///   columns enter `ψ`.
/// - `omegas`: `Ω_1..Ω_p` (`u×u`), `omega0`: `Ω0` (`(r−u)×(r−u)`).
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeParams<'a> {
    pub gamma: &'a Array2<f64>,
    pub gamma0: &'a Array2<f64>,
    pub eta: &'a Array2<f64>,
    pub omegas: &'a [Array2<f64>],
    pub omega0: &'a Array2<f64>,
}

/// Length of `ψ` for `p` groups in `R^r` with envelope dimension `u`.
pub fn envelope_dim(r: usize, u: usize, p: usize) -> usize {
    r + u * p.saturating_sub(1) + r * u + p * vech_len(u) + vech_len(r - u)
}

/// reparameterization_jacobian — `H = ∂h/∂ψ`, of shape
/// `(rp + p·r(r+1)/2) × dim ψ`.
///
/// # Errors
/// [`InferenceError::EmptyModel`] for `p = 0` and
/// [`InferenceError::DimensionMismatch`] for inconsistent shapes.
pub fn reparameterization_jacobian(params: &EnvelopeParams<'_>) -> InferenceResult<Array2<f64>> {
    let (r, u) = params.gamma.dim();
    let p = params.omegas.len();
    check_shapes(params, r, u, p)?;

    let vr = vech_len(r);
    let vu = vech_len(u);
    let col_eta = r;
    let col_gamma = col_eta + u * (p - 1);
    let col_omega = col_gamma + r * u;
    let col_omega0 = col_omega + p * vu;
    let row_sigma = r * p;
    let mut h = Array2::<f64>::zeros((unrestricted_dim(r, p), envelope_dim(r, u, p)));

    // μ
    h.slice_mut(s![..r, ..r]).assign(&Array2::eye(r));

    // β_1..β_{p−1}
    let gamma = params.gamma.view();
    let eta_free = params.eta.slice(s![.., ..p - 1]);
    h.slice_mut(s![r..row_sigma, col_eta..col_gamma])
        .assign(&kron(&Array2::<f64>::eye(p - 1).view(), &gamma));
    h.slice_mut(s![r..row_sigma, col_gamma..col_omega])
        .assign(&kron(&eta_free.t(), &Array2::<f64>::eye(r).view()));

    // vech Σ_i
    let c = contraction(r);
    let k = commutation(r, u);
    let eye_r = Array2::<f64>::eye(r);
    let gamma0 = params.gamma0.view();
    let m = params.gamma0.dot(params.omega0).dot(&params.gamma0.t());
    let rotation = kron(&gamma, &m.view()) + kron(&m.view(), &gamma).dot(&k);
    let d_omega = c.dot(&kron(&gamma, &gamma)).dot(&duplication(u));
    let d_omega0 = c.dot(&kron(&gamma0, &gamma0)).dot(&duplication(r - u));
    for (i, omega) in params.omegas.iter().enumerate() {
        let g_omega = params.gamma.dot(omega);
        let spread = kron(&g_omega.view(), &eye_r.view())
            + kron(&eye_r.view(), &g_omega.view()).dot(&k);
        let rows = row_sigma + i * vr..row_sigma + (i + 1) * vr;
        h.slice_mut(s![rows.clone(), col_gamma..col_omega]).assign(&c.dot(&(spread - &rotation)));
        h.slice_mut(s![rows.clone(), col_omega + i * vu..col_omega + (i + 1) * vu]).assign(&d_omega);
        h.slice_mut(s![rows, col_omega0..]).assign(&d_omega0);
    }
    Ok(h)
}

// ---- Helper methods ----

fn check_shapes(params: &EnvelopeParams<'_>, r: usize, u: usize, p: usize) -> InferenceResult<()> {
    if p == 0 || r == 0 {
        return Err(InferenceError::EmptyModel);
    }
    let mismatch = |context, expected, found| {
        Err(InferenceError::DimensionMismatch { context, expected, found })
    };
    if u > r {
        return mismatch("envelope dimension", r, u);
    }
    if params.gamma0.dim() != (r, r - u) {
        return mismatch("complement basis columns", r - u, params.gamma0.ncols());
    }
    if params.eta.dim() != (u, p) {
        return mismatch("eta columns", p, params.eta.ncols());
    }
    if let Some(bad) = params.omegas.iter().find(|o| o.dim() != (u, u)) {
        return mismatch("material covariance", u, bad.nrows());
    }
    if params.omega0.dim() != (r - u, r - u) {
        return mismatch("immaterial covariance", r - u, params.omega0.nrows());
    }
    Ok(())
}
