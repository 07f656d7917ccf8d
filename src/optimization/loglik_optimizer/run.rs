//! Runner that executes an argmin solver on an [`ArgMinAdapter`] and
//! normalizes the final state into an [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        traits::{LogLikelihood, MLEOptions, OptimOutcome},
        types::{Grad, Theta},
    },
};
use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin_math::ArgminL2Norm;
use log::{debug, info};

/// run_lbfgs — shared executor wiring for both line-search variants.
///
/// Parameters
/// ----------
/// - `theta0`: starting point, consumed into the solver state.
/// - `opts`: `tols.max_iter` caps the run; `verbose` logs the starting
///   objective at `info` level and, with the `obs_slog` feature, attaches a
///   terminal slog observer for per-iteration output.
/// - `problem`: the adapted objective.
/// - `solver`: a solver from [`builders`](super::builders).
///
/// Returns
/// -------
/// [`OptimOutcome`] with the best parameter, `ℓ(θ̂)` (sign restored), the
/// termination status, counters and the last gradient norm.
///
/// Errors
/// ------
/// argmin runtime errors (line-search failures, callback errors) mapped to
/// `OptError`, and outcome validation failures.
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver).configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }
    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    debug!("L-BFGS finished after {iterations} iterations: {termination:?}");
    let grad = result.take_gradient();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}

// ---- Helper methods ----

fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let g0 = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    match g0 {
        Some(norm) => info!("L-BFGS start: loglik = {ll0:.6}, |grad| = {norm:.6}"),
        None => info!("L-BFGS start: loglik = {ll0:.6}"),
    }
    Ok(())
}
