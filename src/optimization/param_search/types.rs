//! param_search::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and the Nelder–Mead alias used by the
//! hyperparameter search so the rest of the module stays agnostic to
//! `ndarray` and argmin generics.
//!
//! Conventions
//! -----------
//! - `Theta` lives in the unconstrained space; the search space maps it back
//!   to `reg_param` / `huber_param` above their floors.
//! - `Cost` is the objective observable itself (already a quantity to
//!   minimize, no sign flip).
use argmin::solver::neldermead::NelderMead;
use ndarray::Array1;
use std::collections::HashMap;

/// Unconstrained parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Scalar objective value (the minimized observable).
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
pub type FnEvalMap = HashMap<String, u64>;

/// Nelder–Mead simplex solver specialized to this crate's numeric types.
pub type SimplexSolver = NelderMead<Theta, Cost>;

/// Default simplex standard-deviation tolerance on the objective.
pub const DEFAULT_SD_TOLERANCE: f64 = 1e-10;

/// Default cap on simplex iterations per inner search.
pub const DEFAULT_SEARCH_MAX_ITER: usize = 1_000;

/// Default initial simplex edge length in θ-space.
pub const DEFAULT_INITIAL_STEP: f64 = 0.5;
