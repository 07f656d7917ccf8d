//! Adapter exposing a [`LogLikelihood`] as an argmin minimization problem.
//!
//! The cost is `c(θ) = -ℓ(θ)`. Analytic gradients are negated; when the
//! objective has none, the cost closure is differentiated numerically with
//! `finitediff` (central differences, falling back to forward differences
//! when a central probe fails or yields non-finite entries).
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges `(objective, data)` to argmin's `CostFunction` + `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// `c(θ) = -ℓ(θ)`; a non-finite `ℓ` is [`OptError::NonFiniteCost`].
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let value = self.f.value(theta, self.data)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value }.into());
        }
        Ok(-value)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// `∇c(θ)`: the negated analytic gradient, or a finite-difference
    /// gradient of the cost when [`LogLikelihood::grad`] is not implemented.
    ///
    /// # Errors
    /// User errors other than `GradientNotImplemented`, errors from cost
    /// probes, and gradient validation failures.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                // finitediff closures return plain f64, so the first probe
                // failure is parked here and NaN is returned in its place.
                let probe_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost = |t: &Theta| -> f64 {
                    self.cost(t).unwrap_or_else(|e| {
                        probe_err.borrow_mut().get_or_insert(e);
                        f64::NAN
                    })
                };
                let central = theta.central_diff(&cost);
                if probe_err.borrow().is_none() && validate_grad(&central, dim).is_ok() {
                    return Ok(central);
                }
                forward_diff_checked(theta, &cost, &probe_err)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Forward-difference gradient of `cost`, surfacing any parked probe error.
fn forward_diff_checked<G: Fn(&Theta) -> f64>(
    theta: &Theta, cost: &G, probe_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    probe_err.replace(None);
    let grad = theta.forward_diff(cost);
    if let Some(err) = probe_err.take() {
        return Err(err);
    }
    validate_grad(&grad, theta.len())?;
    Ok(grad)
}
