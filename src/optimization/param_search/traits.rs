//! Public API surface for the inner hyperparameter search.
//!
//! - [`ParamSearch`]: the pluggable "find optimal parameter" collaborator
//!   the optimal-lambda sweeps delegate to.
//! - [`SearchProblem`]: everything one inner search needs besides the
//!   parameter guesses and floors.
//! - [`SearchOptions`] and [`Tolerances`]: configuration for the default
//!   simplex implementation.
//! - [`OptimalPoint`] / [`SearchOutcome`]: what a search reports.
//!
//! Convention: the objective observable is *minimized* as is. Every trial
//! parameter value costs one fixed-point solve.
use crate::{
    fixed_point::{FixedPointSolver, GridPoint, OrderParams, VarFunc, VarHatFunc},
    observables::{ObservableEntry, ObservableSpec},
    optimization::{
        errors::OptResult,
        param_search::{
            types::{
                Cost, DEFAULT_INITIAL_STEP, DEFAULT_SD_TOLERANCE, DEFAULT_SEARCH_MAX_ITER,
                FnEvalMap, Theta,
            },
            validation::{
                validate_theta_hat, validate_value, verify_initial_step, verify_max_iter,
                verify_sd_tolerance,
            },
        },
    },
};
use argmin::core::TerminationStatus;

/// Minimizer of an observable over one or two hyperparameters.
///
/// Implementations must call the fixed-point solver through `problem` for
/// every trial value and must treat a failed solve as fatal (return `Err`).
pub trait ParamSearch {
    /// Minimize the objective over `reg_param > min_reg_param`.
    fn minimize_reg_param<V, H>(
        &self, problem: &SearchProblem<'_, V, H>, initial_guess: f64, min_reg_param: f64,
    ) -> OptResult<OptimalPoint>
    where
        V: VarFunc + ?Sized,
        H: VarHatFunc + ?Sized;

    /// Minimize the objective jointly over `reg_param > min_reg_param` and
    /// `huber_param > min_huber_param`. Guesses are `(reg_param, huber_param)`.
    fn minimize_reg_and_huber_param<V, H>(
        &self, problem: &SearchProblem<'_, V, H>, initial_guess: (f64, f64),
        min_reg_param: f64, min_huber_param: f64,
    ) -> OptResult<OptimalPoint>
    where
        V: VarFunc + ?Sized,
        H: VarHatFunc + ?Sized;
}

/// One inner search, fully specified apart from guesses and floors.
///
/// `point` carries `alpha` and the previous optimum(s); the search overrides
/// the searched field(s) per trial. `initial_state` is the warm start of
/// every trial solve.
pub struct SearchProblem<'a, V: ?Sized, H: ?Sized> {
    pub var: &'a V,
    pub var_hat: &'a H,
    pub solver: &'a FixedPointSolver,
    pub point: GridPoint,
    pub initial_state: OrderParams,
    pub observables: &'a ObservableSpec,
    pub objective: &'a ObservableEntry,
}

impl<'a, V, H> SearchProblem<'a, V, H>
where
    V: VarFunc + ?Sized,
    H: VarHatFunc + ?Sized,
{
    /// Solve at `point` from the warm start and evaluate the objective.
    pub fn objective_at(&self, point: &GridPoint) -> OptResult<(OrderParams, Cost)> {
        let report =
            self.solver.solve(self.var, self.var_hat, self.initial_state, point).into_result()?;
        let value = self.objective.evaluate(&report.state)?;
        validate_value(value)?;
        Ok((report.state, value))
    }

    /// Re-solve at the optimum and assemble the full report.
    pub fn report_at(&self, point: GridPoint) -> OptResult<OptimalPoint> {
        let (state, objective) = self.objective_at(&point)?;
        let observables = self.observables.evaluate(&state)?;
        Ok(OptimalPoint {
            objective,
            reg_param: point.reg_param,
            huber_param: point.huber_param,
            state,
            observables,
        })
    }
}

/// Result of one inner search.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalPoint {
    /// Minimized objective value.
    pub objective: f64,
    pub reg_param: f64,
    /// Present for the two-parameter search only.
    pub huber_param: Option<f64>,
    /// Fixed point at the optimum.
    pub state: OrderParams,
    /// Requested observables at the optimum, in spec order.
    pub observables: Vec<f64>,
}

/// Search-level configuration.
///
/// Default:
/// - `tols`: `sd_tolerance = 1e-10`, `max_iter = 1000`
/// - `initial_step`: `0.5`
/// - `verbose`: `false`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub tols: Tolerances,
    /// Edge length of the initial simplex in θ-space.
    pub initial_step: f64,
    /// Attach the slog observer (requires the `obs_slog` feature).
    pub verbose: bool,
}

impl SearchOptions {
    pub fn new(tols: Tolerances, initial_step: f64, verbose: bool) -> OptResult<Self> {
        verify_initial_step(initial_step)?;
        Ok(Self { tols, initial_step, verbose })
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { tols: Tolerances::default(), initial_step: DEFAULT_INITIAL_STEP, verbose: false }
    }
}

/// Simplex stopping rules.
///
/// - `sd_tolerance`: stop when the standard deviation of the objective over
///   the simplex vertices falls below this threshold.
/// - `max_iter`: hard cap on simplex iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub sd_tolerance: f64,
    pub max_iter: usize,
}

impl Tolerances {
    /// # Errors
    /// - [`OptError::InvalidSdTolerance`](crate::optimization::errors::OptError::InvalidSdTolerance)
    ///   for non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`](crate::optimization::errors::OptError::InvalidMaxIter)
    ///   if `max_iter == 0`.
    pub fn new(sd_tolerance: f64, max_iter: usize) -> OptResult<Self> {
        verify_sd_tolerance(sd_tolerance)?;
        verify_max_iter(max_iter)?;
        Ok(Self { sd_tolerance, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { sd_tolerance: DEFAULT_SD_TOLERANCE, max_iter: DEFAULT_SEARCH_MAX_ITER }
    }
}

/// Raw outcome of a simplex run, in θ-space.
///
/// - `converged`: `true` if the solver reported a terminating status other
///   than `NotTerminated`.
/// - `fn_evals`: argmin's counters, e.g. `cost_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl SearchOutcome {
    /// Build a validated [`SearchOutcome`] from raw solver state.
    ///
    /// # Errors
    /// Propagates validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus,
        iterations: u64, fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            other => (true, format!("{other:?}")),
        };
        Ok(Self { theta_hat, value, converged, status, iterations: iterations as usize, fn_evals })
    }
}
