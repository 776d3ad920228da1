//! Warm-start accumulator threaded through a sweep.
//!
//! Sweeps fold over their grid carrying a [`WarmStart`]: each solve starts
//! from the carried state, and a converged solve replaces it. Failed solves
//! leave it untouched.
use crate::{
    fixed_point::{ConvergenceOutcome, GridPoint, OrderParams, VarFunc, VarHatFunc},
    sweeps::context::SweepContext,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarmStart {
    state: OrderParams,
}

impl WarmStart {
    pub fn new(state: OrderParams) -> Self {
        Self { state }
    }

    pub fn state(&self) -> OrderParams {
        self.state
    }

    /// Solve at `point` from the carried state.
    ///
    /// Returns the next accumulator together with the outcome.
    pub fn solve<V, H>(
        self, ctx: &SweepContext<'_, V, H>, point: &GridPoint,
    ) -> (WarmStart, ConvergenceOutcome)
    where
        V: VarFunc + ?Sized,
        H: VarHatFunc + ?Sized,
    {
        let outcome = ctx.solver.solve(ctx.var, ctx.var_hat, self.state, point);
        let next = outcome.state().map_or(self, WarmStart::new);
        (next, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixed_point::{FPResult, FixedPointError, HatParams},
        observables::ObservableSpec,
    };
    use approx::assert_relative_eq;

    fn var_hat(s: &OrderParams, _: &GridPoint) -> FPResult<HatParams> {
        Ok(HatParams::new(s.m, s.q, s.sigma))
    }

    #[test]
    // Purpose
    // -------
    // Converged solves advance the carried state; failed ones keep it.
    //
    // Given
    // -----
    // - A `var` whose fixed point is (1/α, 1, 1) for reg_param ≥ 0 and which
    //   fails for reg_param < 0.
    //
    // Expect
    // ------
    // - After α = 2 the carried m is 0.5.
    // - A failing point returns a non-converged outcome and the same state.
    fn warm_start_advances_only_on_convergence() {
        // Arrange
        let var = |_: &HatParams, p: &GridPoint| -> FPResult<OrderParams> {
            if p.reg_param < 0.0 {
                return Err(FixedPointError::DomainViolation { reason: "negative".into() });
            }
            Ok(OrderParams::new(1.0 / p.alpha, 1.0, 1.0))
        };
        let obs = ObservableSpec::new();
        let ctx = SweepContext::new(&var, &var_hat, GridPoint::new(1.0, 0.5), &obs);
        let start = WarmStart::new(ctx.initial);

        // Act
        let (after_ok, ok) = start.solve(&ctx, &GridPoint::new(2.0, 0.5));
        let (after_fail, fail) = after_ok.solve(&ctx, &GridPoint::new(2.0, -1.0));

        // Assert
        assert!(ok.is_converged());
        assert_relative_eq!(after_ok.state().m, 0.5, epsilon = 1e-7);
        assert!(!fail.is_converged());
        assert_eq!(after_fail, after_ok);
    }
}
