//! sweeps::grid — validated grids and output orientation.
//!
//! Purpose
//! -------
//! Build the alpha grid (log-spaced) and regularization grids (linear) that
//! sweeps iterate over, with all preconditions checked at construction.
//!
//! Conventions
//! -----------
//! - Grids are always generated ascending. Solves run along the ascending
//!   grid; [`SweepOrder`] only decides the orientation of returned arrays.
//! - Range values are immutable once built; fields are private so a range
//!   can never hold unchecked bounds.
use ndarray::Array1;

use crate::sweeps::{
    errors::SweepResult,
    validation::{
        verify_alpha_bounds, verify_lambda_bounds, verify_point_count, verify_search_bounds,
    },
};

/// Orientation of the arrays returned by a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SweepOrder {
    #[default]
    Increasing,
    Decreasing,
}

impl SweepOrder {
    /// Map a `decreasing` flag onto an order.
    pub fn from_decreasing(decreasing: bool) -> Self {
        if decreasing { SweepOrder::Decreasing } else { SweepOrder::Increasing }
    }

    /// Orient an ascending-grid array for output.
    pub fn arrange<T: Clone>(&self, values: Array1<T>) -> Array1<T> {
        match self {
            SweepOrder::Increasing => values,
            SweepOrder::Decreasing => values.slice(ndarray::s![..;-1]).to_owned(),
        }
    }
}

/// Log-spaced sample-complexity range `[alpha_min, alpha_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaRange {
    alpha_min: f64,
    alpha_max: f64,
    n_pts: usize,
}

impl AlphaRange {
    /// # Errors
    /// Bounds must satisfy `0 < alpha_min ≤ alpha_max` and `n_pts ≥ 1`.
    pub fn new(alpha_min: f64, alpha_max: f64, n_pts: usize) -> SweepResult<Self> {
        verify_alpha_bounds(alpha_min, alpha_max)?;
        verify_point_count("alpha grid", n_pts, 1)?;
        Ok(Self { alpha_min, alpha_max, n_pts })
    }

    pub fn alpha_min(&self) -> f64 {
        self.alpha_min
    }

    pub fn alpha_max(&self) -> f64 {
        self.alpha_max
    }

    pub fn n_pts(&self) -> usize {
        self.n_pts
    }

    /// Ascending log-spaced grid.
    pub fn grid(&self) -> Array1<f64> {
        Array1::logspace(10.0, self.alpha_min.log10(), self.alpha_max.log10(), self.n_pts)
    }
}

/// Linear regularization range `[lambda_min, lambda_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegParamRange {
    lambda_min: f64,
    lambda_max: f64,
    n_pts: usize,
}

impl RegParamRange {
    /// # Errors
    /// Bounds must satisfy `lambda_min ≤ lambda_max` and `n_pts ≥ 1`.
    pub fn new(lambda_min: f64, lambda_max: f64, n_pts: usize) -> SweepResult<Self> {
        verify_lambda_bounds(lambda_min, lambda_max)?;
        verify_point_count("reg_param grid", n_pts, 1)?;
        Ok(Self { lambda_min, lambda_max, n_pts })
    }

    pub fn n_pts(&self) -> usize {
        self.n_pts
    }

    /// Ascending linear grid.
    pub fn grid(&self) -> Array1<f64> {
        Array1::linspace(self.lambda_min, self.lambda_max, self.n_pts)
    }
}

/// Default lower bound of the stability search.
pub const DEFAULT_SEARCH_LOWER: f64 = -10.0;
/// Default upper bound of the stability search.
pub const DEFAULT_SEARCH_UPPER: f64 = 0.01;
/// Default number of trial values per alpha in the stability search.
pub const DEFAULT_POINTS_PER_RUN: usize = 1000;

/// Regularization search grid of the stability sweep.
///
/// Default: bounds `(-10.0, 0.01)` with 1000 points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilitySearch {
    lower: f64,
    upper: f64,
    points_per_run: usize,
}

impl StabilitySearch {
    /// # Errors
    /// Bounds must satisfy `lower < upper`, `upper > 0`, and
    /// `points_per_run ≥ 2`.
    pub fn new(lower: f64, upper: f64, points_per_run: usize) -> SweepResult<Self> {
        verify_search_bounds(lower, upper)?;
        verify_point_count("reg_param search grid", points_per_run, 2)?;
        Ok(Self { lower, upper, points_per_run })
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    pub fn points_per_run(&self) -> usize {
        self.points_per_run
    }

    /// Ascending linear search grid.
    pub fn grid(&self) -> Array1<f64> {
        Array1::linspace(self.lower, self.upper, self.points_per_run)
    }
}

impl Default for StabilitySearch {
    fn default() -> Self {
        Self {
            lower: DEFAULT_SEARCH_LOWER,
            upper: DEFAULT_SEARCH_UPPER,
            points_per_run: DEFAULT_POINTS_PER_RUN,
        }
    }
}
