//! Shared inputs of every sweep.
use crate::{
    fixed_point::{FixedPointSolver, GridPoint, OrderParams, VarFunc, VarHatFunc},
    observables::ObservableSpec,
};

/// The equations, solver policy and observables a sweep runs with.
///
/// `base` plays the role of the keyword-argument maps: sweeps derive each
/// grid point from it with `with_alpha` / `with_reg_param` /
/// `with_huber_param` and never mutate it. `initial` is the warm start of the
/// first solve.
pub struct SweepContext<'a, V: ?Sized, H: ?Sized> {
    pub var: &'a V,
    pub var_hat: &'a H,
    pub solver: FixedPointSolver,
    pub base: GridPoint,
    pub initial: OrderParams,
    pub observables: &'a ObservableSpec,
}

impl<'a, V, H> SweepContext<'a, V, H>
where
    V: VarFunc + ?Sized,
    H: VarHatFunc + ?Sized,
{
    /// Context with the default solver policy and initial condition
    /// `(0.6, 0.01, 0.9)`.
    pub fn new(
        var: &'a V, var_hat: &'a H, base: GridPoint, observables: &'a ObservableSpec,
    ) -> Self {
        Self {
            var,
            var_hat,
            solver: FixedPointSolver::default(),
            base,
            initial: OrderParams::default(),
            observables,
        }
    }

    pub fn with_solver(self, solver: FixedPointSolver) -> Self {
        Self { solver, ..self }
    }

    pub fn with_initial(self, initial: OrderParams) -> Self {
        Self { initial, ..self }
    }
}
