//! fixed_point::options — iteration policy of the fixed-point solver.
//!
//! Purpose
//! -------
//! Own the tolerance/step-count policy that the sweeps only observe through
//! the solver's convergence contract.
//!
//! Key behaviors
//! -------------
//! - Validate tolerances, iteration caps and damping on construction so the
//!   solver loop can assume a consistent policy.
//! - Provide defaults matching the usual damped iteration for replica
//!   equations: `abs_tol = 1e-8`, `min_iter = 100`, `max_iter = 10 000`,
//!   `blend = 0.75`, no wall-clock deadline.
//!
//! Conventions
//! -----------
//! - `min_iter` forces a minimum number of sweeps before the residual test
//!   is allowed to stop the loop; plateaus early in the iteration are common
//!   for warm starts close to a bifurcation.
//! - `deadline` bounds the wall-clock time of a single solve. Running out of
//!   time is reported exactly like running out of iterations.
use std::time::Duration;

use crate::fixed_point::{
    errors::FPResult,
    validation::{verify_abs_tol, verify_blend, verify_iteration_budget},
};

pub const DEFAULT_ABS_TOL: f64 = 1e-8;
pub const DEFAULT_MIN_ITER: usize = 100;
pub const DEFAULT_MAX_ITER: usize = 10_000;
pub const DEFAULT_BLEND: f64 = 0.75;

/// SolverOptions — validated iteration policy.
///
/// Fields
/// ------
/// - `abs_tol`: stop once the sup-norm displacement of `(m, q, σ)` drops
///   below this value (and `min_iter` is reached).
/// - `min_iter` / `max_iter`: lower and upper bounds on the number of
///   update sweeps.
/// - `blend`: damping factor of the update, in `(0, 1]`.
/// - `deadline`: optional wall-clock budget for one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub abs_tol: f64,
    pub min_iter: usize,
    pub max_iter: usize,
    pub blend: f64,
    pub deadline: Option<Duration>,
}

impl SolverOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - `InvalidTolerance` when `abs_tol` is non-finite or ≤ 0.
    /// - `InvalidIterationBudget` when `max_iter == 0` or `min_iter > max_iter`.
    /// - `InvalidBlend` when `blend ∉ (0, 1]`.
    pub fn new(
        abs_tol: f64, min_iter: usize, max_iter: usize, blend: f64, deadline: Option<Duration>,
    ) -> FPResult<Self> {
        verify_abs_tol(abs_tol)?;
        verify_iteration_budget(min_iter, max_iter)?;
        verify_blend(blend)?;
        Ok(Self { abs_tol, min_iter, max_iter, blend, deadline })
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            abs_tol: DEFAULT_ABS_TOL,
            min_iter: DEFAULT_MIN_ITER,
            max_iter: DEFAULT_MAX_ITER,
            blend: DEFAULT_BLEND,
            deadline: None,
        }
    }
}
