//! observables::spec — observable functions and their extra arguments.
//!
//! Purpose
//! -------
//! Represent the list of `(function, extra-args)` pairs evaluated at every
//! converged grid point, and evaluate them in order.
//!
//! Key behaviors
//! -------------
//! - [`ObservableFn`] is the contract `(m, q, σ, *args) ↦ f64`. Closures with
//!   signature `Fn(&OrderParams, &[f64]) -> f64` implement it directly;
//!   fallible observables implement the trait on their own type.
//! - [`ObservableSpec::from_parts`] validates that the function and argument
//!   lists line up before any sweep starts.
//! - [`ObservableSpec::evaluate`] is pure: no caching and no cross-point state.
//!   The first failing observable aborts the evaluation and its error is
//!   returned unchanged.
use std::fmt;

use crate::{
    fixed_point::state::OrderParams,
    observables::errors::{ObsError, ObsResult},
};

/// Scalar function of a converged state and positional extra arguments.
pub trait ObservableFn {
    fn evaluate(&self, state: &OrderParams, args: &[f64]) -> ObsResult<f64>;

    /// Label used in error messages and logs.
    fn name(&self) -> &str {
        "observable"
    }
}

impl<F> ObservableFn for F
where
    F: Fn(&OrderParams, &[f64]) -> f64,
{
    fn evaluate(&self, state: &OrderParams, args: &[f64]) -> ObsResult<f64> {
        Ok(self(state, args))
    }
}

/// One observable together with the extra arguments it is called with.
pub struct ObservableEntry {
    fun: Box<dyn ObservableFn>,
    args: Vec<f64>,
}

impl ObservableEntry {
    pub fn new(fun: impl ObservableFn + 'static, args: Vec<f64>) -> Self {
        Self { fun: Box::new(fun), args }
    }

    pub fn from_boxed(fun: Box<dyn ObservableFn>, args: Vec<f64>) -> Self {
        Self { fun, args }
    }

    pub fn evaluate(&self, state: &OrderParams) -> ObsResult<f64> {
        self.fun.evaluate(state, &self.args)
    }

    pub fn name(&self) -> &str {
        self.fun.name()
    }

    pub fn args(&self) -> &[f64] {
        &self.args
    }
}

impl fmt::Debug for ObservableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableEntry").field("name", &self.name()).field("args", &self.args).finish()
    }
}

/// Ordered list of observables evaluated at each grid point.
#[derive(Debug, Default)]
pub struct ObservableSpec {
    entries: Vec<ObservableEntry>,
}

impl ObservableSpec {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Build from parallel lists, mirroring the `(funs, funs_args)` calling
    /// convention.
    ///
    /// # Errors
    /// [`ObsError::ArgsLengthMismatch`] when the lists differ in length.
    pub fn from_parts(
        funs: Vec<Box<dyn ObservableFn>>, funs_args: Vec<Vec<f64>>,
    ) -> ObsResult<Self> {
        if funs.len() != funs_args.len() {
            return Err(ObsError::ArgsLengthMismatch { funs: funs.len(), args: funs_args.len() });
        }
        let entries =
            funs.into_iter().zip(funs_args).map(|(f, a)| ObservableEntry::from_boxed(f, a)).collect();
        Ok(Self { entries })
    }

    /// Builder-style append.
    pub fn with(mut self, fun: impl ObservableFn + 'static, args: Vec<f64>) -> Self {
        self.push(fun, args);
        self
    }

    pub fn push(&mut self, fun: impl ObservableFn + 'static, args: Vec<f64>) {
        self.entries.push(ObservableEntry::new(fun, args));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ObservableEntry] {
        &self.entries
    }

    /// Evaluate every observable at `state`, in spec order.
    ///
    /// # Errors
    /// The first error returned by an observable.
    pub fn evaluate(&self, state: &OrderParams) -> ObsResult<Vec<f64>> {
        self.entries.iter().map(|e| e.evaluate(state)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct AlwaysFails;

    impl ObservableFn for AlwaysFails {
        fn evaluate(&self, _: &OrderParams, _: &[f64]) -> ObsResult<f64> {
            Err(ObsError::EvaluationFailed { name: self.name().into(), reason: "boom".into() })
        }

        fn name(&self) -> &str {
            "always_fails"
        }
    }

    #[test]
    // Purpose
    // -------
    // Each observable sees its own extra arguments; results keep spec order.
    fn evaluate_threads_args_in_order() {
        let spec = ObservableSpec::new()
            .with(|s: &OrderParams, a: &[f64]| a[0] * s.m, vec![2.0])
            .with(|s: &OrderParams, a: &[f64]| s.q + a.iter().sum::<f64>(), vec![1.0, 1.0])
            .with(|s: &OrderParams, _: &[f64]| s.sigma, vec![]);

        let out = spec.evaluate(&OrderParams::new(0.5, 0.25, 3.0)).unwrap();

        assert_eq!(out.len(), 3);
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], 2.25);
        assert_relative_eq!(out[2], 3.0);
    }

    #[test]
    // Purpose
    // -------
    // Mismatched parallel lists are rejected at construction.
    fn from_parts_rejects_length_mismatch() {
        let funs: Vec<Box<dyn ObservableFn>> =
            vec![Box::new(|s: &OrderParams, _: &[f64]| s.m), Box::new(|s: &OrderParams, _: &[f64]| s.q)];
        let err = ObservableSpec::from_parts(funs, vec![vec![]]).unwrap_err();
        assert_eq!(err, ObsError::ArgsLengthMismatch { funs: 2, args: 1 });
    }

    #[test]
    // Purpose
    // -------
    // Observable errors propagate out of `evaluate` unchanged.
    fn evaluate_propagates_observable_errors() {
        let spec = ObservableSpec::new().with(|s: &OrderParams, _: &[f64]| s.m, vec![]).with(AlwaysFails, vec![]);
        let err = spec.evaluate(&OrderParams::default()).unwrap_err();
        assert!(matches!(err, ObsError::EvaluationFailed { ref name, .. } if name == "always_fails"));
    }
}
