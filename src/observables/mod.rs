//! observables — scalar functions evaluated at converged order parameters.
//!
//! Purpose
//! -------
//! Turn a converged `(m, q, σ)` into the numbers a phase diagram plots:
//! generalization error, teacher/student angle, or any user-supplied
//! function of the state and extra positional arguments.
//!
//! Key behaviors
//! -------------
//! - [`ObservableSpec`] holds the ordered `(function, args)` pairs and
//!   evaluates them one grid point at a time.
//! - [`builtin`] ships observables that only depend on the order parameters.
//! - Evaluation errors are not caught here; the enclosing sweep decides.
//!
//! Downstream usage
//! ----------------
//! - Every sweep takes an `&ObservableSpec`; the nested optimal-parameter
//!   sweep additionally takes an [`ObservableEntry`] as its objective.

pub mod builtin;
pub mod errors;
pub mod spec;

pub use self::builtin::{GenError, NoiseProxy, Overlap, SquaredNorm, TeacherStudentAngle};
pub use self::errors::{ObsError, ObsResult};
pub use self::spec::{ObservableEntry, ObservableFn, ObservableSpec};

pub mod prelude {
    pub use super::builtin::{GenError, TeacherStudentAngle};
    pub use super::errors::{ObsError, ObsResult};
    pub use super::spec::{ObservableEntry, ObservableFn, ObservableSpec};
}
