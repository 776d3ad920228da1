//! Sweeps with an inner minimization over the regularization strength (and
//! optionally the Huber parameter) at every alpha.
//!
//! Both the fixed-point warm start and the parameter guess are carried from
//! one alpha's optimum to the next. Any failure inside the inner search is
//! fatal to the sweep.
use ndarray::Array1;

use crate::{
    fixed_point::{
        GridPoint, OrderParams, SMALLEST_HUBER_PARAM, SMALLEST_REG_PARAM, VarFunc, VarHatFunc,
    },
    observables::ObservableEntry,
    optimization::param_search::{OptimalPoint, ParamSearch, SearchProblem},
    sweeps::{
        context::SweepContext,
        errors::SweepResult,
        grid::{AlphaRange, SweepOrder},
    },
};

/// What the inner search minimizes, and the floors it respects.
///
/// Default floors are [`SMALLEST_REG_PARAM`] and [`SMALLEST_HUBER_PARAM`].
#[derive(Debug, Clone, Copy)]
pub struct SearchTarget<'a> {
    pub objective: &'a ObservableEntry,
    pub min_reg_param: f64,
    pub min_huber_param: f64,
}

impl<'a> SearchTarget<'a> {
    pub fn new(objective: &'a ObservableEntry) -> Self {
        Self {
            objective,
            min_reg_param: SMALLEST_REG_PARAM,
            min_huber_param: SMALLEST_HUBER_PARAM,
        }
    }

    pub fn with_min_reg_param(self, min_reg_param: f64) -> Self {
        Self { min_reg_param, ..self }
    }

    pub fn with_min_huber_param(self, min_huber_param: f64) -> Self {
        Self { min_huber_param, ..self }
    }
}

/// Output of the optimal-parameter sweeps, one entry per alpha.
///
/// `huber_params` is `Some` only for [`sweep_alpha_optimal_lambda_huber`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalLambdaSweep {
    pub alphas: Array1<f64>,
    /// Minimized objective.
    pub f_min: Array1<f64>,
    pub reg_params: Array1<f64>,
    pub huber_params: Option<Array1<f64>>,
    /// Fixed point at each optimum.
    pub states: Vec<OrderParams>,
    /// `observables[k][i]`: k-th observable at the optimum of `alphas[i]`.
    pub observables: Vec<Array1<f64>>,
}

impl OptimalLambdaSweep {
    fn assemble(
        grid: Array1<f64>, optima: Vec<OptimalPoint>, n_obs: usize, with_huber: bool,
        order: SweepOrder,
    ) -> Self {
        let column = |f: &dyn Fn(&OptimalPoint) -> f64| -> Array1<f64> {
            order.arrange(optima.iter().map(f).collect())
        };
        let f_min = column(&|p| p.objective);
        let reg_params = column(&|p| p.reg_param);
        let huber_params = with_huber.then(|| column(&|p| p.huber_param.unwrap_or(f64::NAN)));
        let observables = (0..n_obs).map(|k| column(&|p| p.observables[k])).collect();
        let mut states: Vec<OrderParams> = optima.iter().map(|p| p.state).collect();
        if order == SweepOrder::Decreasing {
            states.reverse();
        }
        Self { alphas: order.arrange(grid), f_min, reg_params, huber_params, states, observables }
    }
}

/// At every alpha, find the `reg_param > target.min_reg_param` minimizing
/// `target.objective` at the fixed point.
///
/// Per alpha, the search sees `ctx.base` with `alpha` set and `reg_param`
/// set to the previous optimum (`initial_guess` for the first alpha), and
/// starts its trial solves from the previous optimum's state.
///
/// # Errors
/// - [`SweepError::Search`](crate::sweeps::errors::SweepError::Search) for
///   any failure inside the inner search, including failed solves.
pub fn sweep_alpha_optimal_lambda<V, H, S>(
    ctx: &SweepContext<'_, V, H>, alphas: &AlphaRange, search: &S, target: &SearchTarget<'_>,
    initial_guess: f64, order: SweepOrder,
) -> SweepResult<OptimalLambdaSweep>
where
    V: VarFunc + ?Sized,
    H: VarHatFunc + ?Sized,
    S: ParamSearch,
{
    let grid = alphas.grid();
    let (_, _, optima) = grid.iter().try_fold(
        (ctx.initial, initial_guess, Vec::with_capacity(grid.len())),
        |(state, guess, mut optima), &alpha| -> SweepResult<_> {
            let point = ctx.base.with_alpha(alpha).with_reg_param(guess);
            let problem = search_problem(ctx, target, point, state);
            let opt = search.minimize_reg_param(&problem, guess, target.min_reg_param)?;
            log::debug!(
                "alpha={alpha}: optimal reg_param={} objective={}",
                opt.reg_param,
                opt.objective
            );
            let next = (opt.state, opt.reg_param);
            optima.push(opt);
            Ok((next.0, next.1, optima))
        },
    )?;
    Ok(OptimalLambdaSweep::assemble(grid, optima, ctx.observables.len(), false, order))
}

/// Two-parameter analogue of [`sweep_alpha_optimal_lambda`]: jointly
/// minimize over `reg_param` and `huber_param`, both warm-started from the
/// previous alpha's optimum. `initial_guess` is `(reg_param, huber_param)`.
///
/// # Errors
/// As [`sweep_alpha_optimal_lambda`].
pub fn sweep_alpha_optimal_lambda_huber<V, H, S>(
    ctx: &SweepContext<'_, V, H>, alphas: &AlphaRange, search: &S, target: &SearchTarget<'_>,
    initial_guess: (f64, f64), order: SweepOrder,
) -> SweepResult<OptimalLambdaSweep>
where
    V: VarFunc + ?Sized,
    H: VarHatFunc + ?Sized,
    S: ParamSearch,
{
    let grid = alphas.grid();
    let (_, _, optima) = grid.iter().try_fold(
        (ctx.initial, initial_guess, Vec::with_capacity(grid.len())),
        |(state, (reg_guess, huber_guess), mut optima), &alpha| -> SweepResult<_> {
            let point = ctx
                .base
                .with_alpha(alpha)
                .with_reg_param(reg_guess)
                .with_huber_param(huber_guess);
            let problem = search_problem(ctx, target, point, state);
            let opt = search.minimize_reg_and_huber_param(
                &problem,
                (reg_guess, huber_guess),
                target.min_reg_param,
                target.min_huber_param,
            )?;
            let huber_opt = opt.huber_param.unwrap_or(huber_guess);
            log::debug!(
                "alpha={alpha}: optimal reg_param={} huber_param={huber_opt} objective={}",
                opt.reg_param,
                opt.objective
            );
            let next = (opt.state, (opt.reg_param, huber_opt));
            optima.push(opt);
            Ok((next.0, next.1, optima))
        },
    )?;
    Ok(OptimalLambdaSweep::assemble(grid, optima, ctx.observables.len(), true, order))
}

fn search_problem<'a, V, H>(
    ctx: &'a SweepContext<'_, V, H>, target: &'a SearchTarget<'_>, point: GridPoint,
    initial_state: OrderParams,
) -> SearchProblem<'a, V, H>
where
    V: VarFunc + ?Sized,
    H: VarHatFunc + ?Sized,
{
    SearchProblem {
        var: ctx.var,
        var_hat: ctx.var_hat,
        solver: &ctx.solver,
        point,
        initial_state,
        observables: ctx.observables,
        objective: target.objective,
    }
}
