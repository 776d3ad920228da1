//! fixed_point::errors — failure surface of the self-consistency solver.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the fixed-point layer:
//! option validation, pluggable-function domain failures, numerical blow-up
//! and iteration-budget exhaustion.
//!
//! Key behaviors
//! -------------
//! - Distinguish "the iteration did not settle" ([`FixedPointError::NotConverged`])
//!   from "the iteration produced something unusable"
//!   ([`FixedPointError::NonFiniteState`], [`FixedPointError::NonFiniteHat`],
//!   [`FixedPointError::DomainViolation`]).
//! - Attach human-readable `Display` messages that embed the offending value
//!   and iteration so sweep logs are meaningful on their own.
//!
//! Conventions
//! -----------
//! - Sweeps that map failure boundaries treat every "solve failed" variant
//!   alike; [`FixedPointError::is_solve_failure`] is the single predicate they
//!   use. Option-validation variants and [`FixedPointError::Interrupted`]
//!   are never solve failures.

pub type FPResult<T> = Result<T, FixedPointError>;

#[derive(Debug, Clone, PartialEq)]
pub enum FixedPointError {
    // ---- SolverOptions ----
    /// Absolute tolerance must be finite and strictly positive.
    InvalidTolerance { tol: f64, reason: &'static str },

    /// Iteration caps must be positive and ordered.
    InvalidIterationBudget { min_iter: usize, max_iter: usize, reason: &'static str },

    /// Damping factor must lie in (0, 1].
    InvalidBlend { blend: f64, reason: &'static str },

    // ---- Iteration ----
    /// Iteration budget (or wall-clock deadline) exhausted before settling.
    NotConverged { iterations: usize, residual: f64 },

    /// An order parameter became NaN or ±∞.
    NonFiniteState { iteration: usize, component: &'static str, value: f64 },

    /// A conjugate (hat) parameter became NaN or ±∞.
    NonFiniteHat { iteration: usize, component: &'static str, value: f64 },

    /// A pluggable update function rejected its input.
    DomainViolation { reason: String },

    /// The caller aborted the solve from inside an update function. Always
    /// fatal, even for sweeps that record solve failures.
    Interrupted { reason: String },
}

impl FixedPointError {
    /// `true` for the variants a solve can end in (as opposed to bad options).
    pub fn is_solve_failure(&self) -> bool {
        matches!(
            self,
            FixedPointError::NotConverged { .. }
                | FixedPointError::NonFiniteState { .. }
                | FixedPointError::NonFiniteHat { .. }
                | FixedPointError::DomainViolation { .. }
        )
    }
}

impl std::error::Error for FixedPointError {}

impl std::fmt::Display for FixedPointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixedPointError::InvalidTolerance { tol, reason } => {
                write!(f, "Invalid fixed-point tolerance {tol}: {reason}")
            }
            FixedPointError::InvalidIterationBudget { min_iter, max_iter, reason } => {
                write!(f, "Invalid iteration budget (min {min_iter}, max {max_iter}): {reason}")
            }
            FixedPointError::InvalidBlend { blend, reason } => {
                write!(f, "Invalid blend factor {blend}: {reason}")
            }
            FixedPointError::NotConverged { iterations, residual } => {
                write!(
                    f,
                    "Fixed-point iteration did not converge after {iterations} iterations \
                     (last residual {residual:e})"
                )
            }
            FixedPointError::NonFiniteState { iteration, component, value } => {
                write!(f, "Non-finite order parameter {component} = {value} at iteration {iteration}")
            }
            FixedPointError::NonFiniteHat { iteration, component, value } => {
                write!(f, "Non-finite hat parameter {component} = {value} at iteration {iteration}")
            }
            FixedPointError::DomainViolation { reason } => {
                write!(f, "Update function domain violation: {reason}")
            }
            FixedPointError::Interrupted { reason } => {
                write!(f, "Fixed-point solve interrupted: {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // - Classification of variants by `is_solve_failure`.
    // - `Display` messages carrying their payload.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Solve-time failures and option errors must be separable so that
    // boundary-mapping sweeps never swallow a configuration mistake.
    //
    // Expect
    // ------
    // - Iteration variants report `true`, option variants `false`.
    fn is_solve_failure_separates_iteration_from_option_errors() {
        assert!(FixedPointError::NotConverged { iterations: 10, residual: 1.0 }.is_solve_failure());
        assert!(FixedPointError::NonFiniteState { iteration: 3, component: "q", value: f64::NAN }
            .is_solve_failure());
        assert!(FixedPointError::NonFiniteHat { iteration: 0, component: "m_hat", value: f64::INFINITY }
            .is_solve_failure());
        assert!(FixedPointError::DomainViolation { reason: "q < 0".into() }.is_solve_failure());

        assert!(!FixedPointError::InvalidTolerance { tol: -1.0, reason: "x" }.is_solve_failure());
        assert!(!FixedPointError::InvalidBlend { blend: 2.0, reason: "x" }.is_solve_failure());
        assert!(!FixedPointError::InvalidIterationBudget { min_iter: 5, max_iter: 1, reason: "x" }
            .is_solve_failure());
        assert!(!FixedPointError::Interrupted { reason: "KeyboardInterrupt".into() }
            .is_solve_failure());
    }

    #[test]
    // Purpose
    // -------
    // Messages embed the offending values.
    fn display_embeds_payload() {
        let msg = FixedPointError::NotConverged { iterations: 10_000, residual: 0.5 }.to_string();
        assert!(msg.contains("10000"));

        let msg =
            FixedPointError::NonFiniteState { iteration: 7, component: "sigma", value: f64::NAN }
                .to_string();
        assert!(msg.contains("sigma") && msg.contains('7'));
    }
}
