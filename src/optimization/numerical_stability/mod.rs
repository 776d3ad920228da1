//! numerical_stability — stable transforms for bounded hyperparameters.
//!
//! Purpose
//! -------
//! Collect the scalar transforms that let the hyperparameter search run in an
//! unconstrained space while every trial value of `reg_param` / `huber_param`
//! stays strictly above its floor.
//!
//! Conventions
//! -----------
//! - Pure numerical helpers. No logging, no I/O, no global state.
//! - Inputs are assumed finite; guesses are validated by the search layer
//!   before reaching these functions.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement with naïve formulas,
//!   inverse consistency and clamping at the floor.

pub mod transformations;

pub use self::transformations::{
    FLOOR_GAP, floor_gap, floored_softplus, floored_softplus_inv, safe_softplus, safe_softplus_inv,
};

pub mod prelude {
    pub use super::transformations::{floored_softplus, floored_softplus_inv};
}
