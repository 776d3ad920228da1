//! Pluggable update functions of the replica fixed-point equations.
//!
//! - [`VarHatFunc`]: channel side, `(m, q, σ) ↦ (m̂, q̂, Σ̂)` at a given
//!   `alpha` (and Huber cutoff, for robust losses).
//! - [`VarFunc`]: prior side, `(m̂, q̂, Σ̂) ↦ (m, q, σ)` at a given
//!   `reg_param`.
//!
//! Model constants that are not swept (noise levels, outlier fraction, …)
//! belong to the implementing type. Closures with the matching signature
//! implement both traits, which keeps ad-hoc models in tests short.
use crate::fixed_point::{
    errors::FPResult,
    state::{GridPoint, HatParams, OrderParams},
};

/// Prior-side update. Return [`FixedPointError::DomainViolation`] for inputs
/// outside the valid domain instead of producing garbage.
///
/// [`FixedPointError::DomainViolation`]: crate::fixed_point::errors::FixedPointError::DomainViolation
pub trait VarFunc {
    fn var(&self, hat: &HatParams, point: &GridPoint) -> FPResult<OrderParams>;
}

/// Channel-side update.
pub trait VarHatFunc {
    fn var_hat(&self, state: &OrderParams, point: &GridPoint) -> FPResult<HatParams>;
}

impl<F> VarFunc for F
where
    F: Fn(&HatParams, &GridPoint) -> FPResult<OrderParams>,
{
    fn var(&self, hat: &HatParams, point: &GridPoint) -> FPResult<OrderParams> {
        self(hat, point)
    }
}

impl<F> VarHatFunc for F
where
    F: Fn(&OrderParams, &GridPoint) -> FPResult<HatParams>,
{
    fn var_hat(&self, state: &OrderParams, point: &GridPoint) -> FPResult<HatParams> {
        self(state, point)
    }
}
