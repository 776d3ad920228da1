//! sweeps::errors — error types for sweep orchestration.
//!
//! Purpose
//! -------
//! Collect every way a sweep call can fail into one enum: malformed
//! arguments detected up front, and solve/observable/search failures that
//! a propagating sweep lets through.
//!
//! Key behaviors
//! -------------
//! - Precondition variants are raised before any pluggable function runs;
//!   [`SweepError::is_precondition`] tells them apart.
//! - Failures from lower layers are wrapped, not flattened, so callers can
//!   match on the original [`FixedPointError`], [`ObsError`] or [`OptError`].
//! - With `python-bindings`, every variant maps to `ValueError`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover message formatting and the precondition classifier.
//!   The `PyErr` conversion is left to Python-level tests.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::{
    fixed_point::errors::FixedPointError, observables::errors::ObsError,
    optimization::errors::OptError,
};

pub type SweepResult<T> = Result<T, SweepError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SweepError {
    // ---- Preconditions ----
    /// `alpha_min > alpha_max`.
    InvalidAlphaBounds { alpha_min: f64, alpha_max: f64 },
    /// `alpha_min ≤ 0` (log-spacing needs a positive start).
    NonPositiveAlphaMin { alpha_min: f64 },
    /// `lambda_min > lambda_max`.
    InvalidLambdaBounds { lambda_min: f64, lambda_max: f64 },
    /// Stability search bounds with `lower ≥ upper`.
    InvalidSearchBounds { lower: f64, upper: f64 },
    /// Stability search upper bound `≤ 0`.
    NonPositiveSearchUpper { upper: f64 },
    /// A grid needs at least `min` points.
    InvalidPointCount { name: &'static str, n_pts: usize, min: usize },
    /// Grid bounds must be finite.
    NonFiniteBound { name: &'static str, value: f64 },

    // ---- Propagated failures ----
    Solver(FixedPointError),
    Observable(ObsError),
    Search(OptError),
}

impl SweepError {
    /// `true` for malformed arguments rejected before any solving, including
    /// an observable list whose functions and argument lists differ in length.
    pub fn is_precondition(&self) -> bool {
        match self {
            SweepError::Solver(_) | SweepError::Search(_) => false,
            SweepError::Observable(err) => matches!(err, ObsError::ArgsLengthMismatch { .. }),
            _ => true,
        }
    }
}

impl std::error::Error for SweepError {}

impl std::fmt::Display for SweepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepError::InvalidAlphaBounds { alpha_min, alpha_max } => write!(
                f,
                "alpha_min should be smaller than alpha_max, got {alpha_min} and {alpha_max}"
            ),
            SweepError::NonPositiveAlphaMin { alpha_min } => {
                write!(f, "alpha_min should be positive, got {alpha_min}")
            }
            SweepError::InvalidLambdaBounds { lambda_min, lambda_max } => write!(
                f,
                "lambda_min should be smaller than lambda_max, got {lambda_min} and {lambda_max}"
            ),
            SweepError::InvalidSearchBounds { lower, upper } => write!(
                f,
                "reg_param search lower bound should be smaller than the upper bound, \
                 got {lower} and {upper}"
            ),
            SweepError::NonPositiveSearchUpper { upper } => {
                write!(f, "reg_param search upper bound should be larger than 0, got {upper}")
            }
            SweepError::InvalidPointCount { name, n_pts, min } => {
                write!(f, "{name} needs at least {min} points, got {n_pts}")
            }
            SweepError::NonFiniteBound { name, value } => {
                write!(f, "{name} must be finite, got {value}")
            }
            SweepError::Solver(err) => write!(f, "Fixed point failed: {err}"),
            SweepError::Observable(err) => write!(f, "Observable failed: {err}"),
            SweepError::Search(err) => write!(f, "Optimal parameter search failed: {err}"),
        }
    }
}

impl From<FixedPointError> for SweepError {
    fn from(err: FixedPointError) -> Self {
        SweepError::Solver(err)
    }
}

impl From<ObsError> for SweepError {
    fn from(err: ObsError) -> Self {
        SweepError::Observable(err)
    }
}

impl From<OptError> for SweepError {
    fn from(err: OptError) -> Self {
        SweepError::Search(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<SweepError> for PyErr {
    fn from(err: SweepError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Display formatting of precondition variants.
    // - Classification of preconditions vs propagated failures.
    //
    // Not covered: the `PyErr` conversion (needs the Python C API).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Messages embed the offending values.
    fn display_embeds_bounds() {
        let msg = SweepError::InvalidAlphaBounds { alpha_min: 2.0, alpha_max: 1.0 }.to_string();
        assert!(msg.contains('2') && msg.contains('1'));
        let msg = SweepError::InvalidPointCount { name: "alpha grid", n_pts: 0, min: 1 }
            .to_string();
        assert!(msg.starts_with("alpha grid"));
    }

    #[test]
    // Purpose
    // -------
    // A funs/args length mismatch counts as a precondition; solve failures
    // never do.
    fn is_precondition_classifies_variants() {
        assert!(SweepError::NonPositiveAlphaMin { alpha_min: 0.0 }.is_precondition());
        assert!(SweepError::from(ObsError::ArgsLengthMismatch { funs: 2, args: 1 })
            .is_precondition());
        assert!(!SweepError::from(ObsError::EvaluationFailed {
            name: "gen_error".into(),
            reason: "boom".into()
        })
        .is_precondition());
        assert!(!SweepError::from(FixedPointError::NotConverged { iterations: 1, residual: 1.0 })
            .is_precondition());
    }
}
