//! replica_sweeps — replica-method phase diagrams for robust regression.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the alpha sweeps to Python via the `_replica_sweeps` extension
//! module. The model-specific update equations are always supplied by the
//! caller; this crate owns the iteration, the warm-start bookkeeping and the
//! inner hyperparameter searches.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`fixed_point`, `observables`,
//!   `optimization`, `sweeps`) as the public crate surface.
//! - With `python-bindings`, define one `#[pyfunction]` per sweep family
//!   and register them under the `replica_sweeps.sweeps` submodule. Python
//!   callables act as `var_func`, `var_hat_func`, observables and stability
//!   conditions.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work happens in the inner modules; this file only
//!   converts arguments, validates grids before any callable runs and maps
//!   errors into `PyErr` (`ValueError`).
//!
//! Conventions
//! -----------
//! - Python entry points keep the keyword-argument convention of the sweep
//!   functions (`var_func_kwargs`, `var_hat_func_kwargs`, `funs`,
//!   `funs_args`, `decreasing`, …); see [`utils`] for how grid keys are
//!   split off those dicts.
//! - Arrays are returned as NumPy `float64` arrays.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code depends on [`sweeps`] and implements
//!   [`fixed_point::VarFunc`] / [`fixed_point::VarHatFunc`] directly.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by
//!   `tests/integration_sweep_pipeline.rs`; the PyO3 layer is exercised from
//!   Python.

pub mod fixed_point;
pub mod observables;
pub mod optimization;
pub mod sweeps;
#[cfg(feature = "python-bindings")]
pub mod utils;

pub mod prelude {
    pub use crate::fixed_point::prelude::*;
    pub use crate::observables::prelude::*;
    pub use crate::optimization::prelude::*;
    pub use crate::sweeps::prelude::*;
}

#[cfg(feature = "python-bindings")]
use numpy::{PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyDict};

#[cfg(feature = "python-bindings")]
use crate::{
    fixed_point::{SMALLEST_HUBER_PARAM, SMALLEST_REG_PARAM},
    optimization::param_search::{NelderMeadSearch, SearchOptions},
    sweeps::{
        AlphaRange, RegParamRange, SearchTarget, StabilitySearch, SweepOrder,
        grid::{DEFAULT_POINTS_PER_RUN, DEFAULT_SEARCH_LOWER, DEFAULT_SEARCH_UPPER},
    },
    utils::{
        AbortSlot, PyModel, build_objective, build_observables, to_numpy, to_numpy_grid_list,
        to_numpy_list,
    },
};

#[cfg(feature = "python-bindings")]
type PyArr<'py> = Bound<'py, PyArray1<f64>>;

#[cfg(feature = "python-bindings")]
fn nelder_mead(verbose: bool) -> NelderMeadSearch {
    NelderMeadSearch::new(SearchOptions { verbose, ..SearchOptions::default() })
}

/// sweep_alpha_fixed_point — observables along a log-spaced alpha grid.
///
/// `var_func_kwargs` must contain `reg_param`. Returns
/// `(alphas, [observable arrays])`.
///
/// Errors
/// ------
/// - `ValueError` for malformed grids or `(funs, funs_args)` before any
///   callable runs, and for any solve that does not converge.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "sweep_alpha_fixed_point")]
#[pyo3(signature = (
    var_func, var_hat_func, alpha_min, alpha_max, n_alpha_pts, var_func_kwargs,
    var_hat_func_kwargs, initial_cond_fpe=(0.6, 0.01, 0.9), funs=None, funs_args=None,
    decreasing=false
))]
#[allow(clippy::too_many_arguments)]
fn py_sweep_alpha_fixed_point<'py>(
    py: Python<'py>, var_func: Py<PyAny>, var_hat_func: Py<PyAny>, alpha_min: f64,
    alpha_max: f64, n_alpha_pts: usize, var_func_kwargs: Option<Bound<'py, PyDict>>,
    var_hat_func_kwargs: Option<Bound<'py, PyDict>>, initial_cond_fpe: (f64, f64, f64),
    funs: Option<Vec<Py<PyAny>>>, funs_args: Option<Vec<Vec<f64>>>, decreasing: bool,
) -> PyResult<(PyArr<'py>, Vec<PyArr<'py>>)> {
    let alphas = AlphaRange::new(alpha_min, alpha_max, n_alpha_pts)?;
    let abort = AbortSlot::default();
    let observables = build_observables(py, funs, funs_args, &abort)?;
    let model = PyModel::new(
        py,
        var_func,
        var_hat_func,
        var_func_kwargs.as_ref(),
        var_hat_func_kwargs.as_ref(),
        &abort,
    )?;
    let reg_param = model
        .reg_param
        .ok_or_else(|| PyValueError::new_err("var_func_kwargs must contain 'reg_param'"))?;
    let ctx = model.context(model.base(alpha_min, reg_param), &observables, initial_cond_fpe);

    let order = SweepOrder::from_decreasing(decreasing);
    let out = abort.finish(sweeps::sweep_alpha_fixed_point(&ctx, &alphas, order))?;
    Ok((to_numpy(py, out.alphas), to_numpy_list(py, out.observables)))
}

/// sweep_alpha_optimal_lambda_fixed_point — optimal `reg_param` per alpha.
///
/// Returns `(alphas, f_min_values, reg_params_opt, [observable arrays])`.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "sweep_alpha_optimal_lambda_fixed_point")]
#[pyo3(signature = (
    var_func, var_hat_func, alpha_min, alpha_max, n_alpha_pts, inital_guess_lambda,
    var_func_kwargs, var_hat_func_kwargs, initial_cond_fpe=(0.6, 0.01, 0.9), funs=None,
    funs_args=None, f_min=None, f_min_args=None, min_reg_param=SMALLEST_REG_PARAM,
    decreasing=false, verbose=false
))]
#[allow(clippy::too_many_arguments)]
fn py_sweep_alpha_optimal_lambda<'py>(
    py: Python<'py>, var_func: Py<PyAny>, var_hat_func: Py<PyAny>, alpha_min: f64,
    alpha_max: f64, n_alpha_pts: usize, inital_guess_lambda: f64,
    var_func_kwargs: Option<Bound<'py, PyDict>>, var_hat_func_kwargs: Option<Bound<'py, PyDict>>,
    initial_cond_fpe: (f64, f64, f64), funs: Option<Vec<Py<PyAny>>>,
    funs_args: Option<Vec<Vec<f64>>>, f_min: Option<Py<PyAny>>, f_min_args: Option<Vec<f64>>,
    min_reg_param: f64, decreasing: bool, verbose: bool,
) -> PyResult<(PyArr<'py>, PyArr<'py>, PyArr<'py>, Vec<PyArr<'py>>)> {
    let alphas = AlphaRange::new(alpha_min, alpha_max, n_alpha_pts)?;
    let abort = AbortSlot::default();
    let observables = build_observables(py, funs, funs_args, &abort)?;
    let objective = build_objective(py, f_min, f_min_args, &abort);
    let search = nelder_mead(verbose);
    let model = PyModel::new(
        py,
        var_func,
        var_hat_func,
        var_func_kwargs.as_ref(),
        var_hat_func_kwargs.as_ref(),
        &abort,
    )?;
    let ctx =
        model.context(model.base(alpha_min, inital_guess_lambda), &observables, initial_cond_fpe);
    let target = SearchTarget::new(&objective).with_min_reg_param(min_reg_param);

    let out = abort.finish(sweeps::sweep_alpha_optimal_lambda(
        &ctx,
        &alphas,
        &search,
        &target,
        inital_guess_lambda,
        SweepOrder::from_decreasing(decreasing),
    ))?;
    Ok((
        to_numpy(py, out.alphas),
        to_numpy(py, out.f_min),
        to_numpy(py, out.reg_params),
        to_numpy_list(py, out.observables),
    ))
}

/// sweep_alpha_optimal_lambda_hub_param_fixed_point — joint optimum of
/// `reg_param` and the Huber parameter `a` per alpha.
///
/// Returns `(alphas, f_min_values, (reg_params_opt, huber_params_opt),
/// [observable arrays])`.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "sweep_alpha_optimal_lambda_hub_param_fixed_point")]
#[pyo3(signature = (
    var_func, var_hat_func, alpha_min, alpha_max, n_alpha_pts, inital_guess_params,
    var_func_kwargs, var_hat_func_kwargs, initial_cond_fpe=(0.6, 0.01, 0.9), funs=None,
    funs_args=None, f_min=None, f_min_args=None, min_reg_param=SMALLEST_REG_PARAM,
    min_huber_param=SMALLEST_HUBER_PARAM, decreasing=false, verbose=false
))]
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
fn py_sweep_alpha_optimal_lambda_huber<'py>(
    py: Python<'py>, var_func: Py<PyAny>, var_hat_func: Py<PyAny>, alpha_min: f64,
    alpha_max: f64, n_alpha_pts: usize, inital_guess_params: (f64, f64),
    var_func_kwargs: Option<Bound<'py, PyDict>>, var_hat_func_kwargs: Option<Bound<'py, PyDict>>,
    initial_cond_fpe: (f64, f64, f64), funs: Option<Vec<Py<PyAny>>>,
    funs_args: Option<Vec<Vec<f64>>>, f_min: Option<Py<PyAny>>, f_min_args: Option<Vec<f64>>,
    min_reg_param: f64, min_huber_param: f64, decreasing: bool, verbose: bool,
) -> PyResult<(PyArr<'py>, PyArr<'py>, (PyArr<'py>, PyArr<'py>), Vec<PyArr<'py>>)> {
    let alphas = AlphaRange::new(alpha_min, alpha_max, n_alpha_pts)?;
    let abort = AbortSlot::default();
    let observables = build_observables(py, funs, funs_args, &abort)?;
    let objective = build_objective(py, f_min, f_min_args, &abort);
    let search = nelder_mead(verbose);
    let model = PyModel::new(
        py,
        var_func,
        var_hat_func,
        var_func_kwargs.as_ref(),
        var_hat_func_kwargs.as_ref(),
        &abort,
    )?;
    let (reg_guess, huber_guess) = inital_guess_params;
    let base = model.base(alpha_min, reg_guess).with_huber_param(huber_guess);
    let ctx = model.context(base, &observables, initial_cond_fpe);
    let target = SearchTarget::new(&objective)
        .with_min_reg_param(min_reg_param)
        .with_min_huber_param(min_huber_param);

    let out = abort.finish(sweeps::sweep_alpha_optimal_lambda_huber(
        &ctx,
        &alphas,
        &search,
        &target,
        inital_guess_params,
        SweepOrder::from_decreasing(decreasing),
    ))?;
    let huber_params = out
        .huber_params
        .ok_or_else(|| PyValueError::new_err("Huber optimum missing from the sweep output"))?;
    Ok((
        to_numpy(py, out.alphas),
        to_numpy(py, out.f_min),
        (to_numpy(py, out.reg_params), to_numpy(py, huber_params)),
        to_numpy_list(py, out.observables),
    ))
}

/// sweep_alpha_descend_lambda — 2D (reg_param × alpha) grid, each column
/// walked from large to small reg_param. Cells at or below a failed solve
/// are NaN.
///
/// Returns `((alphas, reg_params), [2D observable arrays])`, each array of
/// shape `(n_lambda_pts, n_alpha_pts)`.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "sweep_alpha_descend_lambda")]
#[pyo3(signature = (
    var_func, var_hat_func, alpha_min, alpha_max, n_alpha_pts, lambda_min, lambda_max,
    n_lambda_pts, var_func_kwargs, var_hat_func_kwargs, funs=None, funs_args=None,
    initial_cond_fpe=(0.6, 0.01, 0.9)
))]
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
fn py_sweep_alpha_descend_lambda<'py>(
    py: Python<'py>, var_func: Py<PyAny>, var_hat_func: Py<PyAny>, alpha_min: f64,
    alpha_max: f64, n_alpha_pts: usize, lambda_min: f64, lambda_max: f64, n_lambda_pts: usize,
    var_func_kwargs: Option<Bound<'py, PyDict>>, var_hat_func_kwargs: Option<Bound<'py, PyDict>>,
    funs: Option<Vec<Py<PyAny>>>, funs_args: Option<Vec<Vec<f64>>>,
    initial_cond_fpe: (f64, f64, f64),
) -> PyResult<((PyArr<'py>, PyArr<'py>), Vec<Bound<'py, PyArray2<f64>>>)> {
    let alphas = AlphaRange::new(alpha_min, alpha_max, n_alpha_pts)?;
    let reg_params = RegParamRange::new(lambda_min, lambda_max, n_lambda_pts)?;
    let abort = AbortSlot::default();
    let observables = build_observables(py, funs, funs_args, &abort)?;
    let model = PyModel::new(
        py,
        var_func,
        var_hat_func,
        var_func_kwargs.as_ref(),
        var_hat_func_kwargs.as_ref(),
        &abort,
    )?;
    let ctx = model.context(model.base(alpha_min, lambda_max), &observables, initial_cond_fpe);

    let out = abort.finish(sweeps::sweep_alpha_descend_lambda(&ctx, &alphas, &reg_params))?;
    Ok((
        (to_numpy(py, out.alphas), to_numpy(py, out.reg_params)),
        to_numpy_grid_list(py, out.observables),
    ))
}

/// sweep_alpha_minimal_stable_reg_param — per alpha, the first reg_param of a
/// downward scan where the solve fails or `condition_func ≤ 0`.
///
/// Returns `(alphas, boundaries, exhausted)`; `exhausted[i]` flags alphas
/// whose scan never stopped (their boundary is the lower search bound).
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "sweep_alpha_minimal_stable_reg_param")]
#[pyo3(signature = (
    var_func, var_hat_func, alpha_min, alpha_max, n_alpha_pts, condition_func,
    var_func_kwargs, var_hat_func_kwargs, initial_cond_fpe=(0.6, 0.01, 0.9),
    decreasing=false, bounds_reg_param_search=(DEFAULT_SEARCH_LOWER, DEFAULT_SEARCH_UPPER),
    points_per_run=DEFAULT_POINTS_PER_RUN
))]
#[allow(clippy::too_many_arguments)]
fn py_sweep_alpha_minimal_stable_reg_param<'py>(
    py: Python<'py>, var_func: Py<PyAny>, var_hat_func: Py<PyAny>, alpha_min: f64,
    alpha_max: f64, n_alpha_pts: usize, condition_func: Py<PyAny>,
    var_func_kwargs: Option<Bound<'py, PyDict>>, var_hat_func_kwargs: Option<Bound<'py, PyDict>>,
    initial_cond_fpe: (f64, f64, f64), decreasing: bool, bounds_reg_param_search: (f64, f64),
    points_per_run: usize,
) -> PyResult<(PyArr<'py>, PyArr<'py>, Vec<bool>)> {
    let alphas = AlphaRange::new(alpha_min, alpha_max, n_alpha_pts)?;
    let (lower, upper) = bounds_reg_param_search;
    let search = StabilitySearch::new(lower, upper, points_per_run)?;
    let abort = AbortSlot::default();
    let observables = observables::ObservableSpec::new();
    let model = PyModel::new(
        py,
        var_func,
        var_hat_func,
        var_func_kwargs.as_ref(),
        var_hat_func_kwargs.as_ref(),
        &abort,
    )?;
    let condition = model.condition(py, condition_func)?;
    let ctx = model.context(model.base(alpha_min, upper), &observables, initial_cond_fpe);

    let out = abort.finish(sweeps::sweep_alpha_minimal_stable_reg_param(
        &ctx,
        &alphas,
        &condition,
        &search,
        SweepOrder::from_decreasing(decreasing),
    ))?;
    let exhausted =
        out.kinds.iter().map(|k| *k == sweeps::BoundaryKind::Exhausted).collect::<Vec<_>>();
    Ok((to_numpy(py, out.alphas), to_numpy(py, out.boundaries), exhausted))
}

/// _replica_sweeps — PyO3 module initializer.
///
/// Registers the `sweeps` submodule and inserts it into `sys.modules` as
/// `replica_sweeps.sweeps` so dot-notation imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _replica_sweeps<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let sweeps_mod = PyModule::new(_py, "sweeps")?;
    sweeps_functions(m, &sweeps_mod)?;

    _py.import("sys")?.getattr("modules")?.set_item("replica_sweeps.sweeps", sweeps_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn sweeps_functions<'py>(
    replica_sweeps: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_sweep_alpha_fixed_point, m)?)?;
    m.add_function(wrap_pyfunction!(py_sweep_alpha_optimal_lambda, m)?)?;
    m.add_function(wrap_pyfunction!(py_sweep_alpha_optimal_lambda_huber, m)?)?;
    m.add_function(wrap_pyfunction!(py_sweep_alpha_descend_lambda, m)?)?;
    m.add_function(wrap_pyfunction!(py_sweep_alpha_minimal_stable_reg_param, m)?)?;
    replica_sweeps.add_submodule(m)?;
    Ok(())
}
