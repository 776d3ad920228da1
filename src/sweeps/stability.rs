//! Smallest stable regularization per alpha.
//!
//! For each alpha, a linear search grid is scanned from its upper bound
//! downward. The scan stops at the first trial where the solve fails or the
//! stability condition is `≤ 0`, and that trial's value is recorded. A scan
//! that never stops records the lower bound and is flagged
//! [`BoundaryKind::Exhausted`].
//!
//! The warm start carries across trials and across alphas.
use ndarray::Array1;

use crate::{
    fixed_point::{GridPoint, OrderParams, VarFunc, VarHatFunc},
    observables::errors::ObsResult,
    sweeps::{
        context::SweepContext,
        errors::{SweepError, SweepResult},
        grid::{AlphaRange, StabilitySearch, SweepOrder},
        warm_start::WarmStart,
    },
};

/// Stability criterion evaluated at a converged state; a value `≤ 0`
/// signals instability.
///
/// Closures `Fn(&OrderParams, &GridPoint) -> f64` implement this trait.
pub trait StabilityCondition {
    /// # Errors
    /// An evaluation failure aborts the sweep.
    fn evaluate(&self, state: &OrderParams, point: &GridPoint) -> ObsResult<f64>;
}

impl<F> StabilityCondition for F
where
    F: Fn(&OrderParams, &GridPoint) -> f64,
{
    fn evaluate(&self, state: &OrderParams, point: &GridPoint) -> ObsResult<f64> {
        Ok(self(state, point))
    }
}

/// Why a scan stopped where it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// The solve did not converge at the recorded value.
    SolverFailure,
    /// The condition was `≤ 0` at the recorded value.
    ConditionViolated,
    /// No trial stopped the scan; the recorded value is the lower bound.
    Exhausted,
}

/// Output of [`sweep_alpha_minimal_stable_reg_param`].
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityBoundarySweep {
    pub alphas: Array1<f64>,
    /// Recorded reg_param per alpha; always a member of the search grid.
    pub boundaries: Array1<f64>,
    pub kinds: Vec<BoundaryKind>,
}

/// Scan for the regularization boundary at every alpha.
///
/// `ctx.observables` is not used; `ctx.base` supplies extra parameters and
/// is passed to `condition` with `alpha` and `reg_param` set.
///
/// # Errors
/// - [`SweepError::Observable`] if the condition fails to evaluate.
/// - [`SweepError::Solver`] for an interrupted solve. Other solver failures
///   are never errors here.
pub fn sweep_alpha_minimal_stable_reg_param<V, H, C>(
    ctx: &SweepContext<'_, V, H>, alphas: &AlphaRange, condition: &C, search: &StabilitySearch,
    order: SweepOrder,
) -> SweepResult<StabilityBoundarySweep>
where
    V: VarFunc + ?Sized,
    H: VarHatFunc + ?Sized,
    C: StabilityCondition + ?Sized,
{
    let grid = alphas.grid();
    let reg_grid = search.grid();

    let (_, found) = grid.iter().try_fold(
        (WarmStart::new(ctx.initial), Vec::with_capacity(grid.len())),
        |(warm, mut found), &alpha| -> SweepResult<_> {
            let (warm, idx, kind) = scan(ctx, condition, &reg_grid, alpha, warm)?;
            let boundary = reg_grid[idx];
            match kind {
                BoundaryKind::Exhausted => log::warn!(
                    "alpha={alpha}: no instability down to reg_param={boundary}; \
                     recording the lower search bound"
                ),
                _ => log::debug!("alpha={alpha}: boundary at reg_param={boundary} ({kind:?})"),
            }
            found.push((boundary, kind));
            Ok((warm, found))
        },
    )?;

    let boundaries = order.arrange(found.iter().map(|&(b, _)| b).collect());
    let mut kinds: Vec<BoundaryKind> = found.iter().map(|&(_, k)| k).collect();
    if order == SweepOrder::Decreasing {
        kinds.reverse();
    }
    Ok(StabilityBoundarySweep { alphas: order.arrange(grid), boundaries, kinds })
}

/// Scan `reg_grid` downward at `alpha`; returns the carried warm start, the
/// recorded grid index and why the scan stopped.
fn scan<V, H, C>(
    ctx: &SweepContext<'_, V, H>, condition: &C, reg_grid: &Array1<f64>, alpha: f64,
    mut warm: WarmStart,
) -> SweepResult<(WarmStart, usize, BoundaryKind)>
where
    V: VarFunc + ?Sized,
    H: VarHatFunc + ?Sized,
    C: StabilityCondition + ?Sized,
{
    for (idx, &reg_param) in reg_grid.iter().enumerate().rev() {
        let point = ctx.base.with_alpha(alpha).with_reg_param(reg_param);
        let (next, outcome) = warm.solve(ctx, &point);
        warm = next;
        match outcome.state() {
            None => match outcome.aborted() {
                Some(error) => return Err(SweepError::Solver(error.clone())),
                None => return Ok((warm, idx, BoundaryKind::SolverFailure)),
            },
            Some(state) => {
                if condition.evaluate(&state, &point)? <= 0.0 {
                    return Ok((warm, idx, BoundaryKind::ConditionViolated));
                }
            }
        }
    }
    Ok((warm, 0, BoundaryKind::Exhausted))
}
