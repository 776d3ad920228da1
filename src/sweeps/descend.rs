//! 2D sweep over (reg_param, alpha), walking regularization downward.
//!
//! Each alpha column is scanned from the largest reg_param to the smallest.
//! The first failed solve breaks the column: that cell and every smaller
//! reg_param get NaN, and no further solves run in the column. The first
//! solve of a column starts from the previous column's largest-reg_param
//! solution.
use ndarray::{Array1, Array2};

use crate::{
    fixed_point::{VarFunc, VarHatFunc},
    sweeps::{
        context::SweepContext,
        errors::{SweepError, SweepResult},
        grid::{AlphaRange, RegParamRange},
        warm_start::WarmStart,
    },
};

/// Output of [`sweep_alpha_descend_lambda`].
///
/// `observables[k][[j, i]]` is the k-th observable at `(reg_params[j],
/// alphas[i])`; both grids ascending. NaN marks cells at or below the
/// break of their column.
#[derive(Debug, Clone, PartialEq)]
pub struct DescendLambdaSweep {
    pub alphas: Array1<f64>,
    pub reg_params: Array1<f64>,
    pub observables: Vec<Array2<f64>>,
}

/// Scan state of one alpha column.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnState {
    Stable(WarmStart),
    Broken,
}

/// Run the descending-regularization sweep over `alphas × reg_params`.
///
/// `ctx.base` supplies any extra parameters (e.g. `huber_param`); `alpha`
/// and `reg_param` are overwritten per cell.
///
/// # Errors
/// - [`SweepError::Observable`] if an observable fails at a converged cell.
/// - [`SweepError::Solver`] for an interrupted solve. Other solver failures
///   are never errors here.
pub fn sweep_alpha_descend_lambda<V, H>(
    ctx: &SweepContext<'_, V, H>, alphas: &AlphaRange, reg_params: &RegParamRange,
) -> SweepResult<DescendLambdaSweep>
where
    V: VarFunc + ?Sized,
    H: VarHatFunc + ?Sized,
{
    let alpha_grid = alphas.grid();
    let reg_grid = reg_params.grid();
    let n_reg = reg_grid.len();
    let mut observables =
        vec![Array2::from_elem((n_reg, alpha_grid.len()), f64::NAN); ctx.observables.len()];

    let mut anchor = WarmStart::new(ctx.initial);
    for (i, &alpha) in alpha_grid.iter().enumerate() {
        let mut column = ColumnState::Stable(anchor);
        for (jdx, &reg_param) in reg_grid.iter().rev().enumerate() {
            let warm = match column {
                ColumnState::Stable(warm) => warm,
                ColumnState::Broken => break,
            };
            let j = n_reg - 1 - jdx;
            let point = ctx.base.with_alpha(alpha).with_reg_param(reg_param);
            let (warm, outcome) = warm.solve(ctx, &point);
            match outcome.state() {
                Some(state) => {
                    if jdx == 0 {
                        anchor = warm;
                    }
                    let values = ctx.observables.evaluate(&state)?;
                    for (obs, value) in observables.iter_mut().zip(values) {
                        obs[[j, i]] = value;
                    }
                    column = ColumnState::Stable(warm);
                }
                None => {
                    if let Some(error) = outcome.aborted() {
                        return Err(SweepError::Solver(error.clone()));
                    }
                    log::warn!(
                        "alpha={alpha}: column broke at reg_param={reg_param} ({outcome:?}); \
                         {j} smaller values left as NaN"
                    );
                    column = ColumnState::Broken;
                }
            }
        }
        if let ColumnState::Stable(_) = column {
            log::debug!("alpha={alpha}: column complete");
        }
    }

    Ok(DescendLambdaSweep { alphas: alpha_grid, reg_params: reg_grid, observables })
}
