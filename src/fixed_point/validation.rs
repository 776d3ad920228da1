//! Validation helpers for [`SolverOptions`](crate::fixed_point::options::SolverOptions).
//!
//! Each helper maps a violated constraint onto a dedicated
//! [`FixedPointError`] variant so option errors never look like solve
//! failures to the sweeps.
use crate::fixed_point::errors::{FPResult, FixedPointError};

/// Absolute tolerance must be finite and strictly positive.
///
/// # Errors
/// [`FixedPointError::InvalidTolerance`] otherwise.
pub fn verify_abs_tol(tol: f64) -> FPResult<()> {
    if !tol.is_finite() {
        return Err(FixedPointError::InvalidTolerance { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(FixedPointError::InvalidTolerance {
            tol,
            reason: "Tolerance must be positive.",
        });
    }
    Ok(())
}

/// Iteration caps: `max_iter > 0` and `min_iter <= max_iter`.
///
/// # Errors
/// [`FixedPointError::InvalidIterationBudget`] otherwise.
pub fn verify_iteration_budget(min_iter: usize, max_iter: usize) -> FPResult<()> {
    if max_iter == 0 {
        return Err(FixedPointError::InvalidIterationBudget {
            min_iter,
            max_iter,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    if min_iter > max_iter {
        return Err(FixedPointError::InvalidIterationBudget {
            min_iter,
            max_iter,
            reason: "Minimum iterations cannot exceed maximum iterations.",
        });
    }
    Ok(())
}

/// Damping factor must lie in `(0, 1]`.
///
/// # Errors
/// [`FixedPointError::InvalidBlend`] otherwise.
pub fn verify_blend(blend: f64) -> FPResult<()> {
    if !blend.is_finite() || blend <= 0.0 || blend > 1.0 {
        return Err(FixedPointError::InvalidBlend {
            blend,
            reason: "Blend factor must lie in the interval (0, 1].",
        });
    }
    Ok(())
}
