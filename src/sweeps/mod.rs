//! sweeps — phase-diagram drivers over the sample complexity `alpha`.
//!
//! Purpose
//! -------
//! Trace observables of the replica fixed point across a logarithmic grid of
//! `alpha`, reusing each converged state as the initial condition of the
//! next grid point.
//!
//! Key behaviors
//! -------------
//! - [`sweep_alpha_fixed_point`]: plain sweep; any failure is fatal.
//! - [`sweep_alpha_optimal_lambda`] / [`sweep_alpha_optimal_lambda_huber`]:
//!   an inner [`ParamSearch`] per alpha, warm-starting both the state and
//!   the parameter guess from the previous optimum.
//! - [`sweep_alpha_descend_lambda`]: 2D grid walked from large to small
//!   regularization; a failed cell breaks its column with NaN.
//! - [`sweep_alpha_minimal_stable_reg_param`]: per-alpha downward scan for
//!   the first unstable or unsolvable regularization.
//!
//! Invariants & assumptions
//! ------------------------
//! - Grids are validated before any solve; a precondition error means the
//!   update functions were never called.
//! - Solves always run in ascending `alpha`. [`SweepOrder::Decreasing`]
//!   reverses the returned arrays only, so both orders produce the same
//!   values.
//! - A sweep holds no state between calls.
//!
//! Conventions
//! -----------
//! - Grid points are derived from `SweepContext::base` with the
//!   `with_*` builders of [`GridPoint`](crate::fixed_point::GridPoint).
//! - Errors are reported as [`SweepError`], wrapping solver, observable and
//!   inner-search errors.
//!
//! Downstream usage
//! ----------------
//! - Rust callers build a [`SweepContext`] around their `VarFunc` /
//!   `VarHatFunc` pair; the Python layer does the same around callables.
//!
//! Testing notes
//! -------------
//! - Unit tests use toy equations with closed-form fixed points, recording
//!   closures to check warm-start threading, and failing updates to check
//!   NaN propagation and fatal paths.
//!
//! [`ParamSearch`]: crate::optimization::param_search::ParamSearch

pub mod alpha;
pub mod context;
pub mod descend;
pub mod errors;
pub mod grid;
pub mod optimal;
pub mod stability;
pub mod validation;
pub mod warm_start;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::alpha::{AlphaSweep, sweep_alpha_fixed_point};
pub use self::context::SweepContext;
pub use self::descend::{DescendLambdaSweep, sweep_alpha_descend_lambda};
pub use self::errors::{SweepError, SweepResult};
pub use self::grid::{AlphaRange, RegParamRange, StabilitySearch, SweepOrder};
pub use self::optimal::{
    OptimalLambdaSweep, SearchTarget, sweep_alpha_optimal_lambda,
    sweep_alpha_optimal_lambda_huber,
};
pub use self::stability::{
    BoundaryKind, StabilityBoundarySweep, StabilityCondition, sweep_alpha_minimal_stable_reg_param,
};
pub use self::warm_start::WarmStart;

pub mod prelude {
    pub use super::alpha::sweep_alpha_fixed_point;
    pub use super::context::SweepContext;
    pub use super::descend::sweep_alpha_descend_lambda;
    pub use super::errors::{SweepError, SweepResult};
    pub use super::grid::{AlphaRange, RegParamRange, StabilitySearch, SweepOrder};
    pub use super::optimal::{
        SearchTarget, sweep_alpha_optimal_lambda, sweep_alpha_optimal_lambda_huber,
    };
    pub use super::stability::{StabilityCondition, sweep_alpha_minimal_stable_reg_param};
}
