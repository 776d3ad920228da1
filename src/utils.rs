//! PyO3 glue: Python callables as the pluggable functions of the sweeps.
//!
//! Python callers follow the keyword-argument convention
//! `var_func(m_hat, q_hat, sigma_hat, reg_param=..., **var_func_kwargs)` and
//! `var_hat_func(m, q, sigma, alpha=..., [a=...,] **var_hat_func_kwargs)`.
//! The grid keys (`reg_param`, `alpha`, `a`) are split off the user's dicts
//! into a [`GridPoint`]; the rest is forwarded unchanged on every call.
//!
//! Python exceptions raised inside callables never unwind through the
//! solver: they become `DomainViolation` (update functions) or
//! `EvaluationFailed` (observables and stability conditions). A
//! `BaseException` that is not an `Exception` (`KeyboardInterrupt`,
//! `SystemExit`) is kept in the call's [`AbortSlot`] instead, aborts the
//! sweep as `Interrupted` and is re-raised unchanged by
//! [`AbortSlot::finish`].
use std::{cell::RefCell, rc::Rc};

use ndarray::{Array1, Array2};
use numpy::{IntoPyArray, PyArray1, PyArray2};
use pyo3::{
    exceptions::{PyException, PyValueError},
    prelude::*,
    types::{PyDict, PyTuple},
};

use crate::{
    fixed_point::{
        FPResult, FixedPointError, GridPoint, HatParams, OrderParams, VarFunc, VarHatFunc,
    },
    observables::{
        GenError, ObsError, ObsResult, ObservableEntry, ObservableSpec,
        spec::ObservableFn,
    },
    sweeps::{SweepContext, SweepError, SweepResult, stability::StabilityCondition},
};

const REG_PARAM_KEY: &str = "reg_param";
const ALPHA_KEY: &str = "alpha";
const HUBER_KEY: &str = "a";

/// First interruption raised by any callable of one sweep call.
#[derive(Clone, Default)]
pub struct AbortSlot(Rc<RefCell<Option<PyErr>>>);

impl AbortSlot {
    /// Message of `err`, and whether it aborts the sweep. Aborting errors
    /// are kept (the first one wins) for [`AbortSlot::finish`].
    fn absorb(&self, py: Python<'_>, err: PyErr) -> (String, bool) {
        let reason = err.to_string();
        if err.is_instance_of::<PyException>(py) {
            return (reason, false);
        }
        let mut slot = self.0.borrow_mut();
        if slot.is_none() {
            *slot = Some(err);
        }
        (reason, true)
    }

    fn update_failure(&self, py: Python<'_>, err: PyErr) -> FixedPointError {
        match self.absorb(py, err) {
            (reason, true) => FixedPointError::Interrupted { reason },
            (reason, false) => FixedPointError::DomainViolation { reason },
        }
    }

    fn evaluation_failure(&self, py: Python<'_>, name: &str, err: PyErr) -> ObsError {
        let (reason, _) = self.absorb(py, err);
        ObsError::EvaluationFailed { name: name.to_string(), reason }
    }

    /// Re-raise a kept interruption; otherwise convert the sweep result.
    pub fn finish<T>(&self, result: SweepResult<T>) -> PyResult<T> {
        if let Some(err) = self.0.borrow_mut().take() {
            return Err(err);
        }
        result.map_err(PyErr::from)
    }
}

fn callable_name(py: Python<'_>, func: &Py<PyAny>, fallback: &str) -> String {
    func.bind(py)
        .getattr("__name__")
        .and_then(|n| n.extract::<String>())
        .unwrap_or_else(|_| fallback.to_string())
}

/// Python `var_func` bound to its extra keyword arguments.
pub struct PyVarFunc {
    func: Py<PyAny>,
    kwargs: Py<PyDict>,
    abort: AbortSlot,
}

impl PyVarFunc {
    fn call(&self, py: Python<'_>, hat: &HatParams, point: &GridPoint) -> PyResult<OrderParams> {
        let kwargs = self.kwargs.bind(py).copy()?;
        kwargs.set_item(REG_PARAM_KEY, point.reg_param)?;
        let (m, q, sigma): (f64, f64, f64) = self
            .func
            .bind(py)
            .call((hat.m_hat, hat.q_hat, hat.sigma_hat), Some(&kwargs))?
            .extract()?;
        Ok(OrderParams::new(m, q, sigma))
    }
}

impl VarFunc for PyVarFunc {
    fn var(&self, hat: &HatParams, point: &GridPoint) -> FPResult<OrderParams> {
        Python::with_gil(|py| {
            self.call(py, hat, point).map_err(|e| self.abort.update_failure(py, e))
        })
    }
}

/// Python `var_hat_func` bound to its extra keyword arguments.
pub struct PyVarHatFunc {
    func: Py<PyAny>,
    kwargs: Py<PyDict>,
    abort: AbortSlot,
}

impl PyVarHatFunc {
    fn call(&self, py: Python<'_>, state: &OrderParams, point: &GridPoint) -> PyResult<HatParams> {
        let kwargs = self.kwargs.bind(py).copy()?;
        kwargs.set_item(ALPHA_KEY, point.alpha)?;
        if let Some(a) = point.huber_param {
            kwargs.set_item(HUBER_KEY, a)?;
        }
        let (m_hat, q_hat, sigma_hat): (f64, f64, f64) = self
            .func
            .bind(py)
            .call((state.m, state.q, state.sigma), Some(&kwargs))?
            .extract()?;
        Ok(HatParams::new(m_hat, q_hat, sigma_hat))
    }
}

impl VarHatFunc for PyVarHatFunc {
    fn var_hat(&self, state: &OrderParams, point: &GridPoint) -> FPResult<HatParams> {
        Python::with_gil(|py| {
            self.call(py, state, point).map_err(|e| self.abort.update_failure(py, e))
        })
    }
}

/// Python observable `f(m, q, sigma, *args) -> float`.
pub struct PyObservable {
    func: Py<PyAny>,
    name: String,
    abort: AbortSlot,
}

impl PyObservable {
    pub fn new(py: Python<'_>, func: Py<PyAny>, abort: &AbortSlot) -> Self {
        let name = callable_name(py, &func, "observable");
        Self { func, name, abort: abort.clone() }
    }

    fn call(&self, py: Python<'_>, state: &OrderParams, args: &[f64]) -> PyResult<f64> {
        let mut values = vec![state.m, state.q, state.sigma];
        values.extend_from_slice(args);
        let positional = PyTuple::new(py, values)?;
        self.func.bind(py).call1(positional)?.extract()
    }
}

impl ObservableFn for PyObservable {
    fn evaluate(&self, state: &OrderParams, args: &[f64]) -> ObsResult<f64> {
        Python::with_gil(|py| {
            self.call(py, state, args)
                .map_err(|e| self.abort.evaluation_failure(py, &self.name, e))
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Python `condition_func(m, q, sigma, **all_kwargs) -> float`.
///
/// Receives the merged extra kwargs of both update functions plus the grid
/// keys of the trial.
pub struct PyCondition {
    func: Py<PyAny>,
    kwargs: Py<PyDict>,
    abort: AbortSlot,
}

impl PyCondition {
    fn call(&self, py: Python<'_>, state: &OrderParams, point: &GridPoint) -> PyResult<f64> {
        let kwargs = self.kwargs.bind(py).copy()?;
        kwargs.set_item(ALPHA_KEY, point.alpha)?;
        kwargs.set_item(REG_PARAM_KEY, point.reg_param)?;
        if let Some(a) = point.huber_param {
            kwargs.set_item(HUBER_KEY, a)?;
        }
        self.func.bind(py).call((state.m, state.q, state.sigma), Some(&kwargs))?.extract()
    }
}

impl StabilityCondition for PyCondition {
    fn evaluate(&self, state: &OrderParams, point: &GridPoint) -> ObsResult<f64> {
        Python::with_gil(|py| {
            self.call(py, state, point)
                .map_err(|e| self.abort.evaluation_failure(py, "condition_func", e))
        })
    }
}

/// Copy `kwargs` (or start empty) and remove `key`, returning its value.
fn split_grid_key<'py>(
    py: Python<'py>, kwargs: Option<&Bound<'py, PyDict>>, key: &str,
) -> PyResult<(Option<f64>, Bound<'py, PyDict>)> {
    let rest = match kwargs {
        Some(d) => d.copy()?,
        None => PyDict::new(py),
    };
    let value = match rest.get_item(key)? {
        Some(v) => {
            let v: f64 = v.extract().map_err(|_| {
                PyValueError::new_err(format!("keyword argument '{key}' must be a float"))
            })?;
            rest.del_item(key)?;
            Some(v)
        }
        None => None,
    };
    Ok((value, rest))
}

/// The Python update pair plus the grid keys found in the caller's kwargs.
pub struct PyModel {
    var: PyVarFunc,
    var_hat: PyVarHatFunc,
    /// `reg_param` from `var_func_kwargs`, if given.
    pub reg_param: Option<f64>,
    /// `a` from `var_hat_func_kwargs`, if given.
    pub huber_param: Option<f64>,
    abort: AbortSlot,
}

impl PyModel {
    /// Split grid keys off the kwargs and wrap both callables.
    ///
    /// An `alpha` entry in `var_hat_func_kwargs` is discarded: sweeps set it.
    /// Interruptions raised by either callable land in `abort`.
    pub fn new<'py>(
        py: Python<'py>, var_func: Py<PyAny>, var_hat_func: Py<PyAny>,
        var_func_kwargs: Option<&Bound<'py, PyDict>>,
        var_hat_func_kwargs: Option<&Bound<'py, PyDict>>, abort: &AbortSlot,
    ) -> PyResult<Self> {
        let (reg_param, var_rest) = split_grid_key(py, var_func_kwargs, REG_PARAM_KEY)?;
        let (huber_param, var_hat_rest) = split_grid_key(py, var_hat_func_kwargs, HUBER_KEY)?;
        let (_, var_hat_rest) = split_grid_key(py, Some(&var_hat_rest), ALPHA_KEY)?;
        Ok(Self {
            var: PyVarFunc { func: var_func, kwargs: var_rest.unbind(), abort: abort.clone() },
            var_hat: PyVarHatFunc {
                func: var_hat_func,
                kwargs: var_hat_rest.unbind(),
                abort: abort.clone(),
            },
            reg_param,
            huber_param,
            abort: abort.clone(),
        })
    }

    /// Base grid point at `(alpha, reg_param)` carrying the Huber parameter
    /// found in the kwargs.
    pub fn base(&self, alpha: f64, reg_param: f64) -> GridPoint {
        let point = GridPoint::new(alpha, reg_param);
        match self.huber_param {
            Some(a) => point.with_huber_param(a),
            None => point,
        }
    }

    pub fn context<'a>(
        &'a self, base: GridPoint, observables: &'a ObservableSpec, initial: (f64, f64, f64),
    ) -> SweepContext<'a, PyVarFunc, PyVarHatFunc> {
        SweepContext::new(&self.var, &self.var_hat, base, observables)
            .with_initial(OrderParams::new(initial.0, initial.1, initial.2))
    }

    /// Stability condition seeing the merged extra kwargs of both updates.
    pub fn condition(&self, py: Python<'_>, func: Py<PyAny>) -> PyResult<PyCondition> {
        let merged = self.var_hat.kwargs.bind(py).copy()?;
        merged.update(self.var.kwargs.bind(py).as_mapping())?;
        Ok(PyCondition { func, kwargs: merged.unbind(), abort: self.abort.clone() })
    }
}

/// `(funs, funs_args)` into an [`ObservableSpec`]; `funs = None` means
/// `[gen_error]`, `funs_args = None` means no extra arguments.
pub fn build_observables(
    py: Python<'_>, funs: Option<Vec<Py<PyAny>>>, funs_args: Option<Vec<Vec<f64>>>,
    abort: &AbortSlot,
) -> PyResult<ObservableSpec> {
    let funs: Vec<Box<dyn ObservableFn>> = match funs {
        Some(funs) => funs
            .into_iter()
            .map(|f| Box::new(PyObservable::new(py, f, abort)) as Box<dyn ObservableFn>)
            .collect(),
        None => vec![Box::new(GenError)],
    };
    let funs_args = funs_args.unwrap_or_else(|| vec![Vec::new(); funs.len()]);
    ObservableSpec::from_parts(funs, funs_args).map_err(|e| SweepError::from(e).into())
}

/// `f_min` into the objective entry; `None` means `gen_error`.
pub fn build_objective(
    py: Python<'_>, f_min: Option<Py<PyAny>>, f_min_args: Option<Vec<f64>>, abort: &AbortSlot,
) -> ObservableEntry {
    let args = f_min_args.unwrap_or_default();
    match f_min {
        Some(f) => ObservableEntry::new(PyObservable::new(py, f, abort), args),
        None => ObservableEntry::new(GenError, args),
    }
}

pub fn to_numpy<'py>(py: Python<'py>, values: Array1<f64>) -> Bound<'py, PyArray1<f64>> {
    values.into_pyarray(py)
}

pub fn to_numpy_list<'py>(
    py: Python<'py>, values: Vec<Array1<f64>>,
) -> Vec<Bound<'py, PyArray1<f64>>> {
    values.into_iter().map(|v| v.into_pyarray(py)).collect()
}

pub fn to_numpy_grid_list<'py>(
    py: Python<'py>, values: Vec<Array2<f64>>,
) -> Vec<Bound<'py, PyArray2<f64>>> {
    values.into_iter().map(|v| v.into_pyarray(py)).collect()
}
