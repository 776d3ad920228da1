//! fixed_point — self-consistent solutions of the replica equations.
//!
//! Purpose
//! -------
//! Find the order parameters `(m, q, σ)` that are left unchanged by one
//! application of the two-sided update `var ∘ var_hat`, for a given grid point
//! `(alpha, reg_param[, huber_param])`. Everything above this layer (observable
//! evaluation, inner hyperparameter searches, the alpha sweeps) calls
//! [`FixedPointSolver::solve`] and branches on its [`ConvergenceOutcome`].
//!
//! Key behaviors
//! -------------
//! - Define the value types of the iteration: [`OrderParams`], [`HatParams`]
//!   and the immutable [`GridPoint`] that replaces keyword-argument maps.
//! - Define the pluggable update contracts [`VarFunc`] and [`VarHatFunc`].
//! - Own the iteration policy ([`SolverOptions`]) and the failure taxonomy
//!   ([`FixedPointError`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - The solver never panics on numerical trouble. Non-finite values and
//!   errors raised by the update functions become `InvalidState`.
//! - Solves are deterministic; warm starts are the caller's responsibility.
//!
//! Conventions
//! -----------
//! - The closed-form mathematics of specific loss/prior pairs lives outside
//!   this crate: callers implement the two traits (closures work too).
//!
//! Downstream usage
//! ----------------
//! - Sweeps construct one [`FixedPointSolver`] per call and feed each grid
//!   point's converged state to the next as its initial condition.
//!
//! Testing notes
//! -------------
//! - Unit tests use linear contractions with analytic fixed points, plus
//!   expanding/oscillating maps and failing closures to cover every outcome.

pub mod errors;
pub mod options;
pub mod solver;
pub mod state;
pub mod traits;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{FPResult, FixedPointError};
pub use self::options::SolverOptions;
pub use self::solver::{ConvergenceOutcome, FixedPointReport, FixedPointSolver};
pub use self::state::{
    GridPoint, HatParams, OrderParams, SMALLEST_HUBER_PARAM, SMALLEST_REG_PARAM,
};
pub use self::traits::{VarFunc, VarHatFunc};

pub mod prelude {
    pub use super::errors::{FPResult, FixedPointError};
    pub use super::options::SolverOptions;
    pub use super::solver::{ConvergenceOutcome, FixedPointSolver};
    pub use super::state::{GridPoint, HatParams, OrderParams};
    pub use super::traits::{VarFunc, VarHatFunc};
}
