//! param_search::builders — Nelder–Mead solver construction.
//!
//! Purpose
//! -------
//! Hide argmin's generic wiring behind a builder that takes the crate's
//! [`SearchOptions`] and a starting point, and returns a configured simplex
//! solver.
//!
//! Conventions
//! -----------
//! - The initial simplex is `θ₀` plus `θ₀ + step·eᵢ` for each coordinate.
//! - `max_iters` is a runtime concern applied by the runner.
use argmin::solver::neldermead::NelderMead;

use crate::optimization::{
    errors::OptResult,
    param_search::{
        traits::SearchOptions,
        types::{SimplexSolver, Theta},
    },
};

/// Vertices of the axis-aligned initial simplex around `theta0`.
pub fn initial_simplex(theta0: &Theta, step: f64) -> Vec<Theta> {
    let mut vertices = Vec::with_capacity(theta0.len() + 1);
    vertices.push(theta0.clone());
    for i in 0..theta0.len() {
        let mut vertex = theta0.clone();
        vertex[i] += step;
        vertices.push(vertex);
    }
    vertices
}

/// Construct a Nelder–Mead solver centred on `theta0`.
///
/// # Errors
/// `OptError` (via `From<argmin::core::Error>`) if argmin rejects the
/// standard-deviation tolerance.
pub fn build_nelder_mead(theta0: &Theta, opts: &SearchOptions) -> OptResult<SimplexSolver> {
    let solver = NelderMead::new(initial_simplex(theta0, opts.initial_step))
        .with_sd_tolerance(opts.tols.sd_tolerance)?;
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The simplex has dim + 1 vertices, each offset along one axis.
    fn initial_simplex_is_axis_aligned() {
        let vertices = initial_simplex(&array![1.0, -2.0], 0.5);
        assert_eq!(vertices, vec![array![1.0, -2.0], array![1.5, -2.0], array![1.0, -1.5]]);
    }

    #[test]
    // Purpose
    // -------
    // Default options build a solver.
    fn build_nelder_mead_accepts_default_options() {
        assert!(build_nelder_mead(&array![0.0], &SearchOptions::default()).is_ok());
    }
}
