//! optimization — inner hyperparameter search, numerical helpers, and the
//! unified search error surface.
//!
//! Purpose
//! -------
//! Provide the "find optimal parameter" collaborator used by the
//! optimal-lambda sweeps: at a fixed `alpha`, minimize an observable of the
//! fixed point over `reg_param` (and optionally `huber_param`), with every
//! trial value kept above a floor.
//!
//! Key behaviors
//! -------------
//! - Expose the [`ParamSearch`](param_search::ParamSearch) seam and its
//!   default argmin-backed implementation
//!   ([`NelderMeadSearch`](param_search::NelderMeadSearch)).
//! - Supply the stable softplus transforms (`numerical_stability`) that map
//!   an unconstrained `θ` onto `(floor, ∞)`.
//! - Normalize configuration issues, failed fixed-point solves and backend
//!   solver errors into a single enum (`errors::OptError`) with a common
//!   result alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - The simplex operates in an unconstrained space; invalid states are
//!   reported as `OptError`, not panics.
//! - A failed fixed-point solve anywhere inside a search aborts it.
//!
//! Conventions
//! -----------
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw argmin errors.
//! - Logging is limited to `log::debug!`/`log::trace!` summaries; per-iteration
//!   progress is left to the optional slog observer (`obs_slog` feature).
//!
//! Testing notes
//! -------------
//! - `param_search`: solver wiring, option validation, and searches on toy
//!   equations with known minimizers.
//! - `numerical_stability`: agreement with naïve formulas and floor clamping.
//! - `errors`: recovery of crate errors from `argmin::core::Error`.

pub mod errors;
pub mod numerical_stability;
pub mod param_search;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::numerical_stability::prelude::*;
    pub use super::param_search::prelude::*;
}
