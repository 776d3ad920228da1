//! High-level entry point: [`NelderMeadSearch`], the default
//! [`ParamSearch`] implementation.
use crate::{
    fixed_point::{VarFunc, VarHatFunc},
    optimization::{
        errors::OptResult,
        param_search::{
            adapter::SearchSpace,
            builders::build_nelder_mead,
            run::run_nelder_mead,
            traits::{OptimalPoint, ParamSearch, SearchOptions, SearchProblem},
        },
    },
};

/// Derivative-free simplex search over floored hyperparameters.
///
/// Each coordinate is searched as `floor + softplus(θ)`, so every trial is
/// admissible. After the simplex stops, the best point is solved once more
/// to report its state and observables.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NelderMeadSearch {
    opts: SearchOptions,
}

impl NelderMeadSearch {
    pub fn new(opts: SearchOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.opts
    }

    fn search<V, H>(
        &self, problem: &SearchProblem<'_, V, H>, space: SearchSpace, guess: &[f64],
    ) -> OptResult<OptimalPoint>
    where
        V: VarFunc + ?Sized,
        H: VarHatFunc + ?Sized,
    {
        let theta0 = space.theta_from_guess(guess)?;
        let solver = build_nelder_mead(&theta0, &self.opts)?;
        let outcome = run_nelder_mead(&theta0, problem, space, solver, &self.opts)?;
        let cost_count = outcome.fn_evals.get("cost_count").copied().unwrap_or_default();
        if !outcome.converged {
            log::debug!(
                "simplex search stopped without terminating after {} iterations",
                outcome.iterations
            );
        }
        log::trace!(
            "simplex best cost {} after {} iterations and {} fixed-point solves",
            outcome.value,
            outcome.iterations,
            cost_count
        );
        let point = space.point_at(&problem.point, &outcome.theta_hat)?;
        let optimum = problem.report_at(point)?;
        log::debug!(
            "inner optimum at alpha={}: objective={} reg_param={} huber_param={:?} ({})",
            point.alpha,
            optimum.objective,
            optimum.reg_param,
            optimum.huber_param,
            outcome.status
        );
        Ok(optimum)
    }
}

impl ParamSearch for NelderMeadSearch {
    fn minimize_reg_param<V, H>(
        &self, problem: &SearchProblem<'_, V, H>, initial_guess: f64, min_reg_param: f64,
    ) -> OptResult<OptimalPoint>
    where
        V: VarFunc + ?Sized,
        H: VarHatFunc + ?Sized,
    {
        let space = SearchSpace::reg_param(min_reg_param)?;
        self.search(problem, space, &[initial_guess])
    }

    fn minimize_reg_and_huber_param<V, H>(
        &self, problem: &SearchProblem<'_, V, H>, initial_guess: (f64, f64),
        min_reg_param: f64, min_huber_param: f64,
    ) -> OptResult<OptimalPoint>
    where
        V: VarFunc + ?Sized,
        H: VarHatFunc + ?Sized,
    {
        let space = SearchSpace::reg_and_huber(min_reg_param, min_huber_param)?;
        self.search(problem, space, &[initial_guess.0, initial_guess.1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixed_point::{
            FPResult, FixedPointError, FixedPointSolver, GridPoint, HatParams, OrderParams,
            SolverOptions,
        },
        observables::{GenError, ObservableEntry, ObservableSpec, Overlap},
        optimization::{errors::OptError, param_search::traits::Tolerances},
    };
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Toy equations whose fixed point is
    // m = 1 / (1 + (λ − 0.3)² + (a − 1)²), q = m², σ = 1 (a defaults to 1).
    // With ρ = 1 the generalization error 1 + q − 2m = (1 − m)² vanishes at
    // the interior optimum (λ, a) = (0.3, 1.0).
    // -------------------------------------------------------------------------

    fn toy_var_hat(s: &OrderParams, _: &GridPoint) -> FPResult<HatParams> {
        Ok(HatParams::new(s.m, s.q, s.sigma))
    }

    fn shifted_var(_: &HatParams, p: &GridPoint) -> FPResult<OrderParams> {
        let a = p.huber_param.unwrap_or(1.0);
        let m = 1.0 / (1.0 + (p.reg_param - 0.3).powi(2) + (a - 1.0).powi(2));
        Ok(OrderParams::new(m, m * m, 1.0))
    }

    fn solver() -> FixedPointSolver {
        FixedPointSolver::new(SolverOptions::new(1e-12, 1, 1_000, 1.0, None).unwrap())
    }

    // The objective is quartic in the distance to the optimum, so the simplex
    // needs a tight spread tolerance to localize it to ~1e-4.
    fn tight_search() -> NelderMeadSearch {
        let tols = Tolerances::new(1e-16, 2_000).unwrap();
        NelderMeadSearch::new(SearchOptions::new(tols, 0.5, false).unwrap())
    }

    #[test]
    // Purpose
    // -------
    // One-parameter search finds an interior minimum and reports the state
    // and observables at it.
    //
    // Given
    // -----
    // - `shifted_var` with no Huber parameter (a = 1): optimum at λ = 0.3.
    // - Warm-start guess λ = 1.0, floor 1e-7.
    //
    // Expect
    // ------
    // - reg_param ≈ 0.3, objective ≈ 0, state.m ≈ 1, observables = [m].
    fn minimize_reg_param_finds_interior_optimum() {
        // Arrange
        let solver = solver();
        let observables = ObservableSpec::new().with(Overlap, vec![]);
        let objective = ObservableEntry::new(GenError, vec![]);
        let problem = SearchProblem {
            var: &shifted_var,
            var_hat: &toy_var_hat,
            solver: &solver,
            point: GridPoint::new(1.0, 1.0),
            initial_state: OrderParams::default(),
            observables: &observables,
            objective: &objective,
        };

        // Act
        let opt = tight_search().minimize_reg_param(&problem, 1.0, 1e-7).unwrap();

        // Assert
        assert_relative_eq!(opt.reg_param, 0.3, epsilon = 1e-3);
        assert!(opt.objective < 1e-10);
        assert!(opt.huber_param.is_none());
        assert_relative_eq!(opt.state.m, 1.0, epsilon = 1e-5);
        assert_eq!(opt.observables, vec![opt.state.m]);
    }

    #[test]
    // Purpose
    // -------
    // Two-parameter search moves both coordinates to the interior optimum.
    fn minimize_reg_and_huber_param_finds_joint_optimum() {
        let solver = solver();
        let observables = ObservableSpec::new();
        let objective = ObservableEntry::new(GenError, vec![]);
        let problem = SearchProblem {
            var: &shifted_var,
            var_hat: &toy_var_hat,
            solver: &solver,
            point: GridPoint::new(1.0, 1.0).with_huber_param(2.0),
            initial_state: OrderParams::default(),
            observables: &observables,
            objective: &objective,
        };

        let opt = tight_search()
            .minimize_reg_and_huber_param(&problem, (1.0, 2.0), 1e-7, 1e-7)
            .unwrap();

        assert_relative_eq!(opt.reg_param, 0.3, epsilon = 1e-3);
        assert_relative_eq!(opt.huber_param.unwrap(), 1.0, epsilon = 1e-3);
        assert!(opt.observables.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // A failed fixed-point solve aborts the search with the solver's error.
    fn failed_solve_is_fatal() {
        let solver = solver();
        let failing_var = |_: &HatParams, _: &GridPoint| -> FPResult<OrderParams> {
            Err(FixedPointError::DomainViolation { reason: "negative variance".into() })
        };
        let observables = ObservableSpec::new();
        let objective = ObservableEntry::new(GenError, vec![]);
        let problem = SearchProblem {
            var: &failing_var,
            var_hat: &toy_var_hat,
            solver: &solver,
            point: GridPoint::new(1.0, 1.0),
            initial_state: OrderParams::default(),
            observables: &observables,
            objective: &objective,
        };

        let err = NelderMeadSearch::default().minimize_reg_param(&problem, 1.0, 1e-7).unwrap_err();

        assert!(matches!(err, OptError::FixedPoint(FixedPointError::DomainViolation { .. })));
    }
}
