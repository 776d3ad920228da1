//! Adapter that exposes a [`SearchProblem`] as an `argmin` problem.
//!
//! The simplex works on an unconstrained `θ`; [`SearchSpace`] maps each
//! coordinate to `floor + softplus(θ_i)` and writes the result into the grid
//! point handed to the fixed-point solver. The cost of `θ` is the objective
//! observable at the resulting fixed point.
//!
//! argmin unwraps costs while initializing the simplex, so [`ArgMinAdapter`]
//! never hands it an error: the first failure is recorded in the adapter's
//! failure slot, every later trial costs `+∞` without solving, and the
//! runner returns the recorded error once the executor stops.
use std::cell::RefCell;

use crate::{
    fixed_point::{GridPoint, VarFunc, VarHatFunc},
    optimization::{
        errors::{OptError, OptResult},
        numerical_stability::{floored_softplus, floored_softplus_inv},
        param_search::{
            traits::SearchProblem,
            types::{Cost, Theta},
            validation::{verify_floor, verify_guess},
        },
    },
};
use argmin::core::{CostFunction, Error};

/// Which hyperparameters a search varies, with their floors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchSpace {
    RegParam { floor: f64 },
    RegAndHuber { reg_floor: f64, huber_floor: f64 },
}

impl SearchSpace {
    /// Build a validated one-parameter space.
    pub fn reg_param(floor: f64) -> OptResult<Self> {
        verify_floor("reg_param", floor)?;
        Ok(SearchSpace::RegParam { floor })
    }

    /// Build a validated two-parameter space.
    pub fn reg_and_huber(reg_floor: f64, huber_floor: f64) -> OptResult<Self> {
        verify_floor("reg_param", reg_floor)?;
        verify_floor("huber_param", huber_floor)?;
        Ok(SearchSpace::RegAndHuber { reg_floor, huber_floor })
    }

    pub fn dim(&self) -> usize {
        match self {
            SearchSpace::RegParam { .. } => 1,
            SearchSpace::RegAndHuber { .. } => 2,
        }
    }

    fn floors(&self) -> Vec<(&'static str, f64)> {
        match *self {
            SearchSpace::RegParam { floor } => vec![("reg_param", floor)],
            SearchSpace::RegAndHuber { reg_floor, huber_floor } => {
                vec![("reg_param", reg_floor), ("huber_param", huber_floor)]
            }
        }
    }

    /// Map parameter-space guesses (one per coordinate) to `θ₀`.
    ///
    /// Guesses at or below their floor start just above it.
    ///
    /// # Errors
    /// - [`OptError::ThetaLengthMismatch`] if `guess.len() != self.dim()`.
    /// - [`OptError::InvalidInitialGuess`] for non-finite guesses.
    pub fn theta_from_guess(&self, guess: &[f64]) -> OptResult<Theta> {
        let floors = self.floors();
        if guess.len() != floors.len() {
            return Err(OptError::ThetaLengthMismatch {
                expected: floors.len(),
                actual: guess.len(),
            });
        }
        floors
            .iter()
            .zip(guess)
            .map(|(&(name, floor), &g)| {
                verify_guess(name, g)?;
                Ok(floored_softplus_inv(g, floor))
            })
            .collect::<OptResult<Vec<f64>>>()
            .map(Theta::from)
    }

    /// Grid point obtained by writing the parameters encoded by `theta` into
    /// `base`.
    ///
    /// # Errors
    /// [`OptError::ThetaLengthMismatch`] if `theta.len() != self.dim()`.
    pub fn point_at(&self, base: &GridPoint, theta: &Theta) -> OptResult<GridPoint> {
        if theta.len() != self.dim() {
            return Err(OptError::ThetaLengthMismatch { expected: self.dim(), actual: theta.len() });
        }
        Ok(match *self {
            SearchSpace::RegParam { floor } => {
                base.with_reg_param(floored_softplus(theta[0], floor))
            }
            SearchSpace::RegAndHuber { reg_floor, huber_floor } => base
                .with_reg_param(floored_softplus(theta[0], reg_floor))
                .with_huber_param(floored_softplus(theta[1], huber_floor)),
        })
    }
}

/// Bridges a [`SearchProblem`] to `argmin`'s `CostFunction`.
pub struct ArgMinAdapter<'a, V: ?Sized, H: ?Sized> {
    pub problem: &'a SearchProblem<'a, V, H>,
    pub space: SearchSpace,
    failure: &'a RefCell<Option<OptError>>,
}

impl<'a, V, H> ArgMinAdapter<'a, V, H>
where
    V: VarFunc + ?Sized,
    H: VarHatFunc + ?Sized,
{
    /// `failure` receives the first error raised by a trial evaluation.
    pub fn new(
        problem: &'a SearchProblem<'a, V, H>, space: SearchSpace,
        failure: &'a RefCell<Option<OptError>>,
    ) -> Self {
        Self { problem, space, failure }
    }

    fn evaluate(&self, theta: &Theta) -> OptResult<Cost> {
        let point = self.space.point_at(&self.problem.point, theta)?;
        let (_, value) = self.problem.objective_at(&point)?;
        Ok(value)
    }
}

impl<'a, V, H> CostFunction for ArgMinAdapter<'a, V, H>
where
    V: VarFunc + ?Sized,
    H: VarHatFunc + ?Sized,
{
    type Param = Theta;
    type Output = Cost;

    /// Solve the fixed point at the trial parameters and return the
    /// objective there.
    ///
    /// A failed solve, a failing objective or a non-finite objective value
    /// is stored in the failure slot and costs `+∞`. Once a failure is
    /// stored no further solves run.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        if self.failure.borrow().is_some() {
            return Ok(f64::INFINITY);
        }
        match self.evaluate(theta) {
            Ok(value) => Ok(value),
            Err(err) => {
                log::debug!("simplex trial failed, aborting search: {err}");
                *self.failure.borrow_mut() = Some(err);
                Ok(f64::INFINITY)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Guesses above the floor survive the θ round-trip into the grid point.
    //
    // Given
    // -----
    // - Two-parameter space with floors (1e-7, 1e-7).
    // - Guesses (0.3, 1.5).
    //
    // Expect
    // ------
    // - `point_at(theta_from_guess(..))` has reg_param 0.3, huber_param 1.5
    //   and keeps alpha from the base point.
    fn guess_round_trips_through_theta() {
        // Arrange
        let space = SearchSpace::reg_and_huber(1e-7, 1e-7).unwrap();
        let base = GridPoint::new(2.0, 0.0);

        // Act
        let theta = space.theta_from_guess(&[0.3, 1.5]).unwrap();
        let point = space.point_at(&base, &theta).unwrap();

        // Assert
        assert_relative_eq!(point.reg_param, 0.3, epsilon = 1e-12);
        assert_relative_eq!(point.huber_param.unwrap(), 1.5, epsilon = 1e-12);
        assert_eq!(point.alpha, 2.0);
    }

    #[test]
    // Purpose
    // -------
    // Every θ lands strictly above the floor, however far the simplex walks
    // towards −∞, and dimensions are checked.
    fn point_at_respects_floor_and_dimension() {
        let space = SearchSpace::reg_param(-0.5).unwrap();
        let base = GridPoint::new(1.0, 0.0);
        for theta in [-50.0, -800.0, f64::MIN] {
            let point = space.point_at(&base, &Theta::from(vec![theta])).unwrap();
            assert!(point.reg_param > -0.5);
        }

        let err = space.point_at(&base, &Theta::from(vec![0.0, 0.0])).unwrap_err();
        assert_eq!(err, OptError::ThetaLengthMismatch { expected: 1, actual: 2 });
        assert!(space.theta_from_guess(&[f64::NAN]).is_err());
    }

    #[test]
    // Purpose
    // -------
    // A failing trial is recorded instead of being returned to argmin, and
    // later trials skip the solver.
    //
    // Given
    // -----
    // - A `var` that always fails with `DomainViolation` and counts calls.
    //
    // Expect
    // ------
    // - Both costs are `+∞` and neither is an `Err`.
    // - The failure slot holds the solver's error.
    // - `var` ran during the first trial only.
    fn failed_trial_is_recorded_and_short_circuits() {
        use crate::{
            fixed_point::{
                FPResult, FixedPointError, FixedPointSolver, HatParams, OrderParams,
            },
            observables::{GenError, ObservableEntry, ObservableSpec},
        };
        use std::cell::Cell;

        // Arrange
        let calls = Cell::new(0usize);
        let failing_var = |_: &HatParams, _: &GridPoint| -> FPResult<OrderParams> {
            calls.set(calls.get() + 1);
            Err(FixedPointError::DomainViolation { reason: "negative variance".into() })
        };
        let var_hat = |s: &OrderParams, _: &GridPoint| -> FPResult<HatParams> {
            Ok(HatParams::new(s.m, s.q, s.sigma))
        };
        let solver = FixedPointSolver::default();
        let observables = ObservableSpec::new();
        let objective = ObservableEntry::new(GenError, vec![]);
        let problem = SearchProblem {
            var: &failing_var,
            var_hat: &var_hat,
            solver: &solver,
            point: GridPoint::new(1.0, 1.0),
            initial_state: OrderParams::default(),
            observables: &observables,
            objective: &objective,
        };
        let failure = RefCell::new(None);
        let adapter = ArgMinAdapter::new(&problem, SearchSpace::reg_param(0.0).unwrap(), &failure);

        // Act
        let first = adapter.cost(&Theta::from(vec![0.0])).unwrap();
        let calls_after_first = calls.get();
        let second = adapter.cost(&Theta::from(vec![1.0])).unwrap();

        // Assert
        assert_eq!(first, f64::INFINITY);
        assert_eq!(second, f64::INFINITY);
        assert!(matches!(
            failure.borrow().as_ref(),
            Some(OptError::FixedPoint(FixedPointError::DomainViolation { .. }))
        ));
        assert!(calls_after_first > 0);
        assert_eq!(calls.get(), calls_after_first);
    }
}
