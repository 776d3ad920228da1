//! fixed_point::solver — damped iteration of the replica equations.
//!
//! Purpose
//! -------
//! Iterate `state ← blend · var(var_hat(state)) + (1 − blend) · state` until
//! the update settles, and report the result as a tagged
//! [`ConvergenceOutcome`] rather than through control flow. This is the single
//! point of truth for what "converged" and "failed" mean; every sweep branches
//! on the tag according to its own propagate/record policy.
//!
//! Key behaviors
//! -------------
//! - Convergence: sup-norm displacement `‖new − state‖∞ < abs_tol` after at
//!   least `min_iter` sweeps.
//! - Non-convergence: `max_iter` sweeps (or the optional deadline) exhausted.
//! - Invalid state: a non-finite hat/order parameter, or an `Err` returned by
//!   a pluggable update function. The error is captured, never propagated by
//!   `solve` itself.
//!
//! Invariants & assumptions
//! ------------------------
//! - Given identical inputs the iteration is deterministic; the only
//!   sensitivity is to the initial condition when several fixed points exist.
//! - The reported state is the damped iterate, i.e. the value that would be
//!   fed into the next sweep.
use std::time::Instant;

use crate::fixed_point::{
    errors::{FPResult, FixedPointError},
    options::SolverOptions,
    state::{GridPoint, OrderParams},
    traits::{VarFunc, VarHatFunc},
};

/// Successful solve: the settled state plus iteration diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPointReport {
    pub state: OrderParams,
    pub iterations: usize,
    pub residual: f64,
}

/// Tagged result of one solver invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvergenceOutcome {
    Converged(FixedPointReport),
    NotConverged { iterations: usize, residual: f64 },
    InvalidState { iteration: usize, error: FixedPointError },
}

impl ConvergenceOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, ConvergenceOutcome::Converged(_))
    }

    /// Settled state, if the solve converged.
    pub fn state(&self) -> Option<OrderParams> {
        match self {
            ConvergenceOutcome::Converged(report) => Some(report.state),
            _ => None,
        }
    }

    /// The captured error when it must abort every sweep, i.e. when it is
    /// not a solve failure (see [`FixedPointError::is_solve_failure`]).
    pub fn aborted(&self) -> Option<&FixedPointError> {
        match self {
            ConvergenceOutcome::InvalidState { error, .. } if !error.is_solve_failure() => {
                Some(error)
            }
            _ => None,
        }
    }

    /// Convert into a `Result` for callers whose policy is to propagate.
    ///
    /// # Errors
    /// - [`FixedPointError::NotConverged`] for an exhausted budget.
    /// - The captured error for an invalid state.
    pub fn into_result(self) -> FPResult<FixedPointReport> {
        match self {
            ConvergenceOutcome::Converged(report) => Ok(report),
            ConvergenceOutcome::NotConverged { iterations, residual } => {
                Err(FixedPointError::NotConverged { iterations, residual })
            }
            ConvergenceOutcome::InvalidState { error, .. } => Err(error),
        }
    }
}

/// FixedPointSolver — owns the iteration policy and runs solves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedPointSolver {
    opts: SolverOptions,
}

impl FixedPointSolver {
    pub fn new(opts: SolverOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.opts
    }

    /// Solve the fixed-point equations at `point`, starting from `initial`.
    ///
    /// Parameters
    /// ----------
    /// - `var`, `var_hat`: the two halves of the update.
    /// - `initial`: warm start. A non-finite initial state is reported as
    ///   `InvalidState` at iteration 0 without calling either function.
    /// - `point`: control parameters handed unchanged to both functions.
    ///
    /// Returns
    /// -------
    /// A [`ConvergenceOutcome`]; this function never returns `Err` and never
    /// panics on numerical trouble.
    pub fn solve<V, H>(
        &self, var: &V, var_hat: &H, initial: OrderParams, point: &GridPoint,
    ) -> ConvergenceOutcome
    where
        V: VarFunc + ?Sized,
        H: VarHatFunc + ?Sized,
    {
        let outcome = self.iterate(var, var_hat, initial, point);
        match &outcome {
            ConvergenceOutcome::Converged(r) => log::trace!(
                "fixed point at alpha={} reg_param={}: {:?} after {} iterations",
                point.alpha,
                point.reg_param,
                r.state,
                r.iterations
            ),
            ConvergenceOutcome::NotConverged { iterations, residual } => log::trace!(
                "no convergence at alpha={} reg_param={} after {iterations} iterations \
                 (residual {residual:e})",
                point.alpha,
                point.reg_param
            ),
            ConvergenceOutcome::InvalidState { iteration, error } => log::trace!(
                "invalid state at alpha={} reg_param={} iteration {iteration}: {error}",
                point.alpha,
                point.reg_param
            ),
        }
        outcome
    }

    fn iterate<V, H>(
        &self, var: &V, var_hat: &H, initial: OrderParams, point: &GridPoint,
    ) -> ConvergenceOutcome
    where
        V: VarFunc + ?Sized,
        H: VarHatFunc + ?Sized,
    {
        let opts = &self.opts;
        let started = opts.deadline.map(|budget| (Instant::now(), budget));

        if let Some((component, value)) = initial.first_non_finite() {
            return ConvergenceOutcome::InvalidState {
                iteration: 0,
                error: FixedPointError::NonFiniteState { iteration: 0, component, value },
            };
        }

        let mut state = initial;
        let mut residual = f64::INFINITY;
        let mut iteration = 0;
        loop {
            if iteration >= opts.max_iter {
                return ConvergenceOutcome::NotConverged { iterations: iteration, residual };
            }
            if let Some((t0, budget)) = started {
                if t0.elapsed() > budget {
                    return ConvergenceOutcome::NotConverged { iterations: iteration, residual };
                }
            }

            let hat = match var_hat.var_hat(&state, point) {
                Ok(hat) => hat,
                Err(error) => return ConvergenceOutcome::InvalidState { iteration, error },
            };
            if let Some((component, value)) = hat.first_non_finite() {
                return ConvergenceOutcome::InvalidState {
                    iteration,
                    error: FixedPointError::NonFiniteHat { iteration, component, value },
                };
            }

            let updated = match var.var(&hat, point) {
                Ok(updated) => updated,
                Err(error) => return ConvergenceOutcome::InvalidState { iteration, error },
            };
            if let Some((component, value)) = updated.first_non_finite() {
                return ConvergenceOutcome::InvalidState {
                    iteration,
                    error: FixedPointError::NonFiniteState { iteration, component, value },
                };
            }

            residual = updated.max_abs_diff(&state);
            state = state.damped_towards(&updated, opts.blend);
            iteration += 1;

            if residual < opts.abs_tol && iteration >= opts.min_iter {
                return ConvergenceOutcome::Converged(FixedPointReport {
                    state,
                    iterations: iteration,
                    residual,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_point::{options::DEFAULT_MIN_ITER, state::HatParams};
    use approx::assert_relative_eq;
    use std::cell::Cell;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Convergence on a contraction with a closed-form fixed point.
    // - The three failure routes: budget exhaustion, non-finite blow-up,
    //   and pluggable-function errors.
    // - Determinism and the `into_result` mapping.
    // -------------------------------------------------------------------------

    // Contraction with fixed point (m, q, σ) = (0.5, 1.0, 2 · reg_param).
    fn contraction_hat(s: &OrderParams, _: &GridPoint) -> FPResult<HatParams> {
        Ok(HatParams::new(0.5 * s.m, 0.5 * s.q, 0.5 * s.sigma))
    }

    fn contraction_var(h: &HatParams, p: &GridPoint) -> FPResult<OrderParams> {
        Ok(OrderParams::new(h.m_hat + 0.25, h.q_hat + 0.5, h.sigma_hat + p.reg_param))
    }

    #[test]
    // Purpose
    // -------
    // A contraction converges to its analytic fixed point.
    //
    // Given
    // -----
    // - Default options, reg_param = 0.3, cold start.
    //
    // Expect
    // ------
    // - `Converged` with state (0.5, 1.0, 0.6) within 1e-7 and at least
    //   `min_iter` iterations.
    fn solve_converges_to_analytic_fixed_point() {
        // Arrange
        let solver = FixedPointSolver::default();
        let point = GridPoint::new(1.0, 0.3);

        // Act
        let outcome =
            solver.solve(&contraction_var, &contraction_hat, OrderParams::default(), &point);

        // Assert
        let report = outcome.into_result().expect("contraction should converge");
        assert_relative_eq!(report.state.m, 0.5, epsilon = 1e-7);
        assert_relative_eq!(report.state.q, 1.0, epsilon = 1e-7);
        assert_relative_eq!(report.state.sigma, 0.6, epsilon = 1e-7);
        assert!(report.iterations >= DEFAULT_MIN_ITER);
        assert!(report.residual < 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // An undamped oscillation never settles and exhausts the budget.
    //
    // Expect
    // ------
    // - `NotConverged { iterations: max_iter, .. }` with a positive residual.
    fn solve_reports_not_converged_when_budget_exhausted() {
        // Arrange
        let opts = SolverOptions::new(1e-10, 0, 50, 1.0, None).unwrap();
        let solver = FixedPointSolver::new(opts);
        let flip_hat = |s: &OrderParams, _: &GridPoint| -> FPResult<HatParams> {
            Ok(HatParams::new(-s.m, s.q, s.sigma))
        };
        let shift = |h: &HatParams, _: &GridPoint| -> FPResult<OrderParams> {
            Ok(OrderParams::new(h.m_hat + 1.0, h.q_hat, h.sigma_hat))
        };

        // Act
        let outcome =
            solver.solve(&shift, &flip_hat, OrderParams::new(0.1, 0.2, 0.3), &GridPoint::new(1.0, 1.0));

        // Assert
        match outcome {
            ConvergenceOutcome::NotConverged { iterations, residual } => {
                assert_eq!(iterations, 50);
                assert_relative_eq!(residual, 0.8, epsilon = 1e-12);
            }
            other => panic!("expected NotConverged, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Running past the wall-clock deadline ends the solve as NotConverged
    // long before the iteration budget.
    //
    // Given
    // -----
    // - The undamped oscillation, which never converges.
    // - A `var_hat` that sleeps 5 ms per call, a 1 ms deadline and an
    //   iteration budget of one million.
    //
    // Expect
    // ------
    // - `NotConverged` after at least one and far fewer than `max_iter`
    //   iterations.
    fn solve_reports_not_converged_past_deadline() {
        use std::time::Duration;

        // Arrange
        let max_iter = 1_000_000;
        let opts =
            SolverOptions::new(1e-10, 0, max_iter, 1.0, Some(Duration::from_millis(1))).unwrap();
        let solver = FixedPointSolver::new(opts);
        let slow_flip_hat = |s: &OrderParams, _: &GridPoint| -> FPResult<HatParams> {
            std::thread::sleep(Duration::from_millis(5));
            Ok(HatParams::new(-s.m, s.q, s.sigma))
        };
        let shift = |h: &HatParams, _: &GridPoint| -> FPResult<OrderParams> {
            Ok(OrderParams::new(h.m_hat + 1.0, h.q_hat, h.sigma_hat))
        };

        // Act
        let outcome = solver.solve(
            &shift,
            &slow_flip_hat,
            OrderParams::new(0.1, 0.2, 0.3),
            &GridPoint::new(1.0, 1.0),
        );

        // Assert
        match outcome {
            ConvergenceOutcome::NotConverged { iterations, .. } => {
                assert!(iterations >= 1);
                assert!(iterations < 10);
            }
            other => panic!("expected NotConverged, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // An expanding map overflows; the blow-up is reported as InvalidState
    // rather than a panic or a non-finite "solution".
    fn solve_reports_invalid_state_on_blow_up() {
        let solver = FixedPointSolver::default();
        let expand_hat = |s: &OrderParams, _: &GridPoint| -> FPResult<HatParams> {
            Ok(HatParams::new(2.0 * s.m, s.q, s.sigma))
        };
        let expand_var = |h: &HatParams, _: &GridPoint| -> FPResult<OrderParams> {
            Ok(OrderParams::new(h.m_hat + 1.0, h.q_hat, h.sigma_hat))
        };

        let outcome =
            solver.solve(&expand_var, &expand_hat, OrderParams::default(), &GridPoint::new(1.0, 1.0));

        match outcome {
            ConvergenceOutcome::InvalidState { error, .. } => assert!(matches!(
                error,
                FixedPointError::NonFiniteState { .. } | FixedPointError::NonFiniteHat { .. }
            )),
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Errors raised by a pluggable function are captured and reclassified.
    //
    // Given
    // -----
    // - A `var` that rejects any call after the third.
    //
    // Expect
    // ------
    // - `InvalidState` at iteration 3 carrying the DomainViolation, and
    //   `into_result` returns that same error.
    fn solve_captures_update_function_errors() {
        let calls = Cell::new(0usize);
        let picky_var = |h: &HatParams, p: &GridPoint| -> FPResult<OrderParams> {
            calls.set(calls.get() + 1);
            if calls.get() > 3 {
                return Err(FixedPointError::DomainViolation { reason: "q_hat out of range".into() });
            }
            contraction_var(h, p)
        };

        let outcome = FixedPointSolver::default().solve(
            &picky_var,
            &contraction_hat,
            OrderParams::default(),
            &GridPoint::new(1.0, 0.1),
        );

        assert!(matches!(outcome, ConvergenceOutcome::InvalidState { iteration: 3, .. }));
        assert!(outcome.aborted().is_none());
        assert!(matches!(outcome.into_result(), Err(FixedPointError::DomainViolation { .. })));
    }

    #[test]
    // Purpose
    // -------
    // A non-finite warm start is rejected before any function call.
    fn solve_rejects_non_finite_initial_state_without_calling_functions() {
        let calls = Cell::new(0usize);
        let counting_hat = |s: &OrderParams, p: &GridPoint| -> FPResult<HatParams> {
            calls.set(calls.get() + 1);
            contraction_hat(s, p)
        };

        let outcome = FixedPointSolver::default().solve(
            &contraction_var,
            &counting_hat,
            OrderParams::new(f64::NAN, 0.0, 1.0),
            &GridPoint::new(1.0, 0.1),
        );

        assert!(matches!(outcome, ConvergenceOutcome::InvalidState { iteration: 0, .. }));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    // Purpose
    // -------
    // Identical inputs give bit-identical outputs.
    fn solve_is_deterministic() {
        let solver = FixedPointSolver::default();
        let point = GridPoint::new(2.0, 0.7);
        let a = solver.solve(&contraction_var, &contraction_hat, OrderParams::default(), &point);
        let b = solver.solve(&contraction_var, &contraction_hat, OrderParams::default(), &point);
        assert_eq!(a, b);
        assert!(a.is_converged());
        assert_eq!(a.state(), b.state());
    }
}
