use argmin::core::{ArgminError, Error};

use crate::{fixed_point::errors::FixedPointError, observables::errors::ObsError};

/// Crate-wide result alias for hyperparameter-search operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- SearchOptions ----
    /// Simplex standard-deviation tolerance needs to be positive and finite.
    InvalidSdTolerance { tol: f64, reason: &'static str },

    /// Maximum iterations needs to be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// Initial simplex step needs to be positive and finite.
    InvalidInitialStep { step: f64, reason: &'static str },

    // ---- Search problem ----
    /// Parameter floors must be finite.
    InvalidFloor { name: &'static str, value: f64, reason: &'static str },

    /// Warm-start guesses must be finite.
    InvalidInitialGuess { name: &'static str, value: f64, reason: &'static str },

    /// Unconstrained vector has the wrong dimension for the search space.
    ThetaLengthMismatch { expected: usize, actual: usize },

    // ---- Cost function ----
    /// Objective returned a non-finite value.
    NonFiniteCost { value: f64 },

    /// The fixed point could not be found at a trial parameter.
    FixedPoint(FixedPointError),

    /// An observable (objective or reported) failed at the optimum.
    Observable(ObsError),

    // ---- Search outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Theta hat is missing
    MissingThetaHat,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError { text: String },
    /// Wrapper for other argmin::Error types
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- SearchOptions ----
            OptError::InvalidSdTolerance { tol, reason } => {
                write!(f, "Invalid simplex tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::InvalidInitialStep { step, reason } => {
                write!(f, "Invalid initial simplex step {step}: {reason}")
            }

            // ---- Search problem ----
            OptError::InvalidFloor { name, value, reason } => {
                write!(f, "Invalid lower bound for {name}: {value}: {reason}")
            }
            OptError::InvalidInitialGuess { name, value, reason } => {
                write!(f, "Invalid initial guess for {name}: {value}: {reason}")
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite objective value: {value}")
            }
            OptError::FixedPoint(err) => {
                write!(f, "Fixed point failed during search: {err}")
            }
            OptError::Observable(err) => {
                write!(f, "Observable failed during search: {err}")
            }

            // ---- Search outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    /// Recover crate errors raised inside cost evaluations first, then map
    /// argmin's own error kinds.
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(own) => return own,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<FixedPointError> for OptError {
    fn from(err: FixedPointError) -> Self {
        OptError::FixedPoint(err)
    }
}

impl From<ObsError> for OptError {
    fn from(err: ObsError) -> Self {
        OptError::Observable(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Round-tripping crate errors through `argmin::core::Error`.
    // - Mapping of argmin's own error kinds.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A fixed-point failure raised inside a cost evaluation must come back
    // out of the executor as the same `OptError`, not as opaque text.
    fn from_argmin_error_recovers_crate_errors() {
        let original =
            OptError::FixedPoint(FixedPointError::NotConverged { iterations: 5, residual: 1.0 });
        let wrapped: Error = original.clone().into();

        assert_eq!(OptError::from(wrapped), original);
    }

    #[test]
    // Purpose
    // -------
    // argmin's error kinds map onto the matching wrapper variants.
    fn from_argmin_error_maps_argmin_kinds() {
        let wrapped: Error = ArgminError::InvalidParameter { text: "tol".into() }.into();
        assert_eq!(OptError::from(wrapped), OptError::InvalidParameter { text: "tol".into() });
    }
}
