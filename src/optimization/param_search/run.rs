//! Execution helper that runs the simplex solver on a search problem and
//! returns a crate-friendly [`SearchOutcome`].
use std::cell::RefCell;

use crate::{
    fixed_point::{VarFunc, VarHatFunc},
    optimization::{
        errors::OptResult,
        param_search::{
            adapter::{ArgMinAdapter, SearchSpace},
            traits::{SearchOptions, SearchOutcome, SearchProblem},
            types::{SimplexSolver, Theta},
        },
    },
};
use argmin::core::{Executor, State};

/// Run Nelder–Mead from `theta0` on `problem` over `space`.
///
/// Wires the adapter, the solver and `max_iters`, and attaches a terminal
/// slog observer when `opts.verbose` is set and the `obs_slog` feature is
/// enabled.
///
/// # Errors
/// - The first error raised by a trial evaluation, as the original
///   [`OptError`](crate::optimization::errors::OptError) (a failed
///   fixed-point solve stays `OptError::FixedPoint`).
/// - argmin runtime errors are mapped through `From<argmin::core::Error>`.
/// - Validation errors from [`SearchOutcome::new`].
pub fn run_nelder_mead<V, H>(
    theta0: &Theta, problem: &SearchProblem<'_, V, H>, space: SearchSpace,
    solver: SimplexSolver, opts: &SearchOptions,
) -> OptResult<SearchOutcome>
where
    V: VarFunc + ?Sized,
    H: VarHatFunc + ?Sized,
{
    log::trace!("simplex search from theta0 = {theta0}");
    let failure = RefCell::new(None);
    let adapter = ArgMinAdapter::new(problem, space, &failure);
    let mut optimizer = Executor::new(adapter, solver);
    optimizer = optimizer.configure(|state| state.max_iters(opts.tols.max_iter as u64));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }

    let run = optimizer.run();
    if let Some(err) = failure.take() {
        return Err(err);
    }
    let mut result = run?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    SearchOutcome::new(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
    )
}
