//! Model-agnostic observables of the order parameters.
//!
//! These depend only on `(m, q, σ)` and on the normalisation of the ground
//! truth, so they apply to every loss/prior pair:
//!
//! - [`GenError`]: `ρ + q − 2m`, with `ρ = args[0]` (default 1).
//! - [`TeacherStudentAngle`]: `arccos(m / √(ρ q)) / π`, with `ρ = args[0]`
//!   (default 1).
//! - [`Overlap`], [`SquaredNorm`], [`NoiseProxy`]: the raw components.
use std::f64::consts::PI;

use crate::{
    fixed_point::state::OrderParams,
    observables::{
        errors::{ObsError, ObsResult},
        spec::ObservableFn,
    },
};

fn teacher_norm(args: &[f64]) -> f64 {
    args.first().copied().unwrap_or(1.0)
}

/// Generalization error `ρ + q − 2m`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenError;

impl ObservableFn for GenError {
    fn evaluate(&self, state: &OrderParams, args: &[f64]) -> ObsResult<f64> {
        Ok(teacher_norm(args) + state.q - 2.0 * state.m)
    }

    fn name(&self) -> &str {
        "gen_error"
    }
}

/// Normalised angle between estimator and ground truth, in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeacherStudentAngle;

impl ObservableFn for TeacherStudentAngle {
    fn evaluate(&self, state: &OrderParams, args: &[f64]) -> ObsResult<f64> {
        let rho = teacher_norm(args);
        let denom = (rho * state.q).sqrt();
        if !(denom > 0.0) {
            return Err(ObsError::EvaluationFailed {
                name: self.name().to_string(),
                reason: format!("requires rho * q > 0, got rho = {rho}, q = {}", state.q),
            });
        }
        Ok((state.m / denom).clamp(-1.0, 1.0).acos() / PI)
    }

    fn name(&self) -> &str {
        "angle_teacher_student"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Overlap;

impl ObservableFn for Overlap {
    fn evaluate(&self, state: &OrderParams, _: &[f64]) -> ObsResult<f64> {
        Ok(state.m)
    }

    fn name(&self) -> &str {
        "m"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredNorm;

impl ObservableFn for SquaredNorm {
    fn evaluate(&self, state: &OrderParams, _: &[f64]) -> ObsResult<f64> {
        Ok(state.q)
    }

    fn name(&self) -> &str {
        "q"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseProxy;

impl ObservableFn for NoiseProxy {
    fn evaluate(&self, state: &OrderParams, _: &[f64]) -> ObsResult<f64> {
        Ok(state.sigma)
    }

    fn name(&self) -> &str {
        "sigma"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Closed-form values on hand-picked states.
    //
    // Expect
    // ------
    // - gen_error(0.5, 0.5) = 0.5 with default ρ, 1.5 with ρ = 2.
    // - Perfect alignment (m = √q, ρ = 1) has angle 0; orthogonal has 1/2.
    fn builtin_values_match_closed_forms() {
        let s = OrderParams::new(0.5, 0.5, 1.0);
        assert_relative_eq!(GenError.evaluate(&s, &[]).unwrap(), 0.5);
        assert_relative_eq!(GenError.evaluate(&s, &[2.0]).unwrap(), 1.5);

        let aligned = OrderParams::new(0.5, 0.25, 1.0);
        assert_relative_eq!(TeacherStudentAngle.evaluate(&aligned, &[]).unwrap(), 0.0);
        let orthogonal = OrderParams::new(0.0, 0.25, 1.0);
        assert_relative_eq!(TeacherStudentAngle.evaluate(&orthogonal, &[]).unwrap(), 0.5);

        assert_eq!(Overlap.evaluate(&s, &[]).unwrap(), 0.5);
        assert_eq!(SquaredNorm.evaluate(&s, &[]).unwrap(), 0.5);
        assert_eq!(NoiseProxy.evaluate(&s, &[]).unwrap(), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // The angle is undefined at q = 0 and says so.
    fn angle_rejects_degenerate_norm() {
        let err = TeacherStudentAngle.evaluate(&OrderParams::new(0.0, 0.0, 1.0), &[]).unwrap_err();
        assert!(matches!(err, ObsError::EvaluationFailed { .. }));
    }
}
