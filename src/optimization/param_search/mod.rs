//! param_search — inner minimization of an observable over hyperparameters.
//!
//! Purpose
//! -------
//! Find, at a fixed `alpha`, the regularization strength (and optionally the
//! Huber parameter) that minimizes a chosen observable of the fixed point.
//! Every trial value costs one fixed-point solve, so the search is
//! derivative-free.
//!
//! Key behaviors
//! -------------
//! - [`ParamSearch`] is the seam the optimal-lambda sweeps depend on; any
//!   implementor (grid scans, golden-section, test stubs) can be plugged in.
//! - [`NelderMeadSearch`] runs argmin's Nelder–Mead on an unconstrained `θ`
//!   with `param = floor + softplus(θ)`, starting from the warm-start guess.
//! - After the simplex stops, the optimum is solved again to report its
//!   state and the requested observables.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every trial parameter is strictly above its floor.
//! - Trial solves all start from the same warm-start state, so the cost is a
//!   deterministic function of `θ`.
//! - A failed solve is fatal to the search (`OptError::FixedPoint`).
//!
//! Conventions
//! -----------
//! - argmin errors never leak: they are normalised into [`OptError`]
//!   through `From<argmin::core::Error>`, which also recovers crate errors
//!   raised inside cost evaluations.
//!
//! Downstream usage
//! ----------------
//! - `sweeps::optimal` builds one [`SearchProblem`] per alpha and calls
//!   [`ParamSearch::minimize_reg_param`] or
//!   [`ParamSearch::minimize_reg_and_huber_param`].
//!
//! Testing notes
//! -------------
//! - Unit tests use toy equations whose objective has a known interior
//!   minimizer, plus a failing update to check fatal propagation.
//!
//! [`OptError`]: crate::optimization::errors::OptError

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::adapter::{ArgMinAdapter, SearchSpace};
pub use self::api::NelderMeadSearch;
pub use self::traits::{
    OptimalPoint, ParamSearch, SearchOptions, SearchOutcome, SearchProblem, Tolerances,
};
pub use self::types::{Cost, FnEvalMap, SimplexSolver, Theta};

pub mod prelude {
    pub use super::api::NelderMeadSearch;
    pub use super::traits::{OptimalPoint, ParamSearch, SearchOptions, SearchProblem, Tolerances};
}
