//! Validation helpers for the hyperparameter search.
//!
//! - **Option checks**: [`verify_sd_tolerance`], [`verify_max_iter`],
//!   [`verify_initial_step`].
//! - **Problem checks**: [`verify_floor`], [`verify_guess`].
//! - **Outcome checks**: [`validate_theta_hat`], [`validate_value`].
//!
//! Each returns a domain-specific [`OptError`] so callers can report the
//! offending quantity precisely.
use crate::optimization::{
    errors::{OptError, OptResult},
    param_search::types::Theta,
};

/// Validate the simplex standard-deviation tolerance.
///
/// # Errors
/// [`OptError::InvalidSdTolerance`] if non-finite or ≤ 0.0.
pub fn verify_sd_tolerance(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidSdTolerance { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidSdTolerance { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// Validate the simplex iteration cap.
///
/// # Errors
/// [`OptError::InvalidMaxIter`] if zero.
pub fn verify_max_iter(max_iter: usize) -> OptResult<()> {
    if max_iter == 0 {
        return Err(OptError::InvalidMaxIter {
            max_iter,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate the initial simplex edge length.
///
/// # Errors
/// [`OptError::InvalidInitialStep`] if non-finite or ≤ 0.0.
pub fn verify_initial_step(step: f64) -> OptResult<()> {
    if !step.is_finite() {
        return Err(OptError::InvalidInitialStep { step, reason: "Step must be finite." });
    }
    if step <= 0.0 {
        return Err(OptError::InvalidInitialStep { step, reason: "Step must be positive." });
    }
    Ok(())
}

/// Validate a parameter floor.
///
/// # Errors
/// [`OptError::InvalidFloor`] if non-finite.
pub fn verify_floor(name: &'static str, value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidFloor { name, value, reason: "Lower bound must be finite." });
    }
    Ok(())
}

/// Validate a warm-start guess. Guesses below their floor are accepted and
/// clamped by the transform; only non-finite values are rejected.
///
/// # Errors
/// [`OptError::InvalidInitialGuess`] if non-finite.
pub fn verify_guess(name: &'static str, value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidInitialGuess {
            name,
            value,
            reason: "Initial guess must be finite.",
        });
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that an objective value is finite.
///
/// # Errors
/// [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Option validators accept sane values and reject the rest.
    fn option_validators_enforce_positivity_and_finiteness() {
        assert!(verify_sd_tolerance(1e-8).is_ok());
        assert!(verify_sd_tolerance(0.0).is_err());
        assert!(verify_sd_tolerance(f64::NAN).is_err());
        assert!(verify_max_iter(1).is_ok());
        assert!(matches!(verify_max_iter(0), Err(OptError::InvalidMaxIter { .. })));
        assert!(verify_initial_step(0.5).is_ok());
        assert!(verify_initial_step(-0.5).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Negative floors are legal (only finiteness is required), and guesses
    // below a floor are left to the transform.
    fn floors_and_guesses_only_require_finiteness() {
        assert!(verify_floor("reg_param", -1.0).is_ok());
        assert!(verify_floor("reg_param", f64::NEG_INFINITY).is_err());
        assert!(verify_guess("huber_param", -3.0).is_ok());
        assert!(matches!(
            verify_guess("huber_param", f64::NAN),
            Err(OptError::InvalidInitialGuess { name: "huber_param", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // theta_hat must exist and be finite.
    fn validate_theta_hat_rejects_missing_and_non_finite() {
        assert!(matches!(validate_theta_hat(None), Err(OptError::MissingThetaHat)));
        assert!(matches!(
            validate_theta_hat(Some(array![0.0, f64::NAN])),
            Err(OptError::InvalidThetaHat { index: 1, .. })
        ));
        assert!(validate_theta_hat(Some(array![0.0, 1.0])).is_ok());
        assert!(validate_value(f64::INFINITY).is_err());
    }
}
