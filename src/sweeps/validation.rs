//! Precondition checks shared by every sweep.
//!
//! All checks run when the grid/option values are built, i.e. before any
//! pluggable function is invoked.
use crate::sweeps::errors::{SweepError, SweepResult};

fn verify_finite(name: &'static str, value: f64) -> SweepResult<()> {
    if !value.is_finite() {
        return Err(SweepError::NonFiniteBound { name, value });
    }
    Ok(())
}

/// Validate `0 < alpha_min ≤ alpha_max`.
///
/// # Errors
/// - [`SweepError::NonFiniteBound`] for non-finite bounds.
/// - [`SweepError::InvalidAlphaBounds`] if `alpha_min > alpha_max`.
/// - [`SweepError::NonPositiveAlphaMin`] if `alpha_min ≤ 0`.
pub fn verify_alpha_bounds(alpha_min: f64, alpha_max: f64) -> SweepResult<()> {
    verify_finite("alpha_min", alpha_min)?;
    verify_finite("alpha_max", alpha_max)?;
    if alpha_min > alpha_max {
        return Err(SweepError::InvalidAlphaBounds { alpha_min, alpha_max });
    }
    if alpha_min <= 0.0 {
        return Err(SweepError::NonPositiveAlphaMin { alpha_min });
    }
    Ok(())
}

/// Validate `lambda_min ≤ lambda_max`.
///
/// # Errors
/// - [`SweepError::NonFiniteBound`] for non-finite bounds.
/// - [`SweepError::InvalidLambdaBounds`] if `lambda_min > lambda_max`.
pub fn verify_lambda_bounds(lambda_min: f64, lambda_max: f64) -> SweepResult<()> {
    verify_finite("lambda_min", lambda_min)?;
    verify_finite("lambda_max", lambda_max)?;
    if lambda_min > lambda_max {
        return Err(SweepError::InvalidLambdaBounds { lambda_min, lambda_max });
    }
    Ok(())
}

/// Validate stability search bounds: `lower < upper` and `upper > 0`.
///
/// # Errors
/// - [`SweepError::NonFiniteBound`] for non-finite bounds.
/// - [`SweepError::InvalidSearchBounds`] if `lower ≥ upper`.
/// - [`SweepError::NonPositiveSearchUpper`] if `upper ≤ 0`.
pub fn verify_search_bounds(lower: f64, upper: f64) -> SweepResult<()> {
    verify_finite("search lower bound", lower)?;
    verify_finite("search upper bound", upper)?;
    if lower >= upper {
        return Err(SweepError::InvalidSearchBounds { lower, upper });
    }
    if upper <= 0.0 {
        return Err(SweepError::NonPositiveSearchUpper { upper });
    }
    Ok(())
}

/// Validate that a grid has at least `min` points.
///
/// # Errors
/// [`SweepError::InvalidPointCount`] otherwise.
pub fn verify_point_count(name: &'static str, n_pts: usize, min: usize) -> SweepResult<()> {
    if n_pts < min {
        return Err(SweepError::InvalidPointCount { name, n_pts, min });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Alpha bounds: equal bounds are fine, inverted or non-positive are not.
    fn verify_alpha_bounds_cases() {
        assert!(verify_alpha_bounds(0.1, 10.0).is_ok());
        assert!(verify_alpha_bounds(1.0, 1.0).is_ok());
        assert_eq!(
            verify_alpha_bounds(2.0, 1.0),
            Err(SweepError::InvalidAlphaBounds { alpha_min: 2.0, alpha_max: 1.0 })
        );
        assert_eq!(
            verify_alpha_bounds(0.0, 1.0),
            Err(SweepError::NonPositiveAlphaMin { alpha_min: 0.0 })
        );
        assert!(matches!(
            verify_alpha_bounds(f64::NAN, 1.0),
            Err(SweepError::NonFiniteBound { name: "alpha_min", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Search bounds are strict, and the upper bound must be positive;
    // lambda bounds allow equality and negative values.
    fn verify_search_and_lambda_bounds_cases() {
        assert!(verify_search_bounds(-10.0, 0.01).is_ok());
        assert!(matches!(
            verify_search_bounds(0.5, 0.5),
            Err(SweepError::InvalidSearchBounds { .. })
        ));
        assert!(matches!(
            verify_search_bounds(-2.0, -1.0),
            Err(SweepError::NonPositiveSearchUpper { .. })
        ));
        assert!(verify_lambda_bounds(-1.0, -1.0).is_ok());
        assert!(verify_lambda_bounds(1.0, 0.0).is_err());
        assert!(verify_point_count("grid", 0, 1).is_err());
        assert!(verify_point_count("grid", 2, 2).is_ok());
    }
}
