//! Fixed-point sweep over the sample complexity.
//!
//! Every alpha must solve: a failed solve or a failing observable aborts the
//! sweep with no partial results.
use ndarray::Array1;

use crate::{
    fixed_point::{VarFunc, VarHatFunc},
    sweeps::{
        context::SweepContext,
        errors::SweepResult,
        grid::{AlphaRange, SweepOrder},
        warm_start::WarmStart,
    },
};

/// Output of [`sweep_alpha_fixed_point`].
///
/// `observables[k][i]` is the k-th observable at `alphas[i]`; all arrays
/// share the orientation requested by [`SweepOrder`].
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaSweep {
    pub alphas: Array1<f64>,
    pub observables: Vec<Array1<f64>>,
}

/// Solve the fixed point at every alpha of `alphas` (ascending, warm-started
/// from the previous alpha) and evaluate `ctx.observables` there.
///
/// `ctx.base` supplies `reg_param` (and `huber_param`, if any); its `alpha`
/// is overwritten per grid point.
///
/// # Errors
/// - [`SweepError::Solver`](crate::sweeps::errors::SweepError::Solver) on
///   the first solve that does not converge.
/// - [`SweepError::Observable`](crate::sweeps::errors::SweepError::Observable)
///   if an observable fails.
pub fn sweep_alpha_fixed_point<V, H>(
    ctx: &SweepContext<'_, V, H>, alphas: &AlphaRange, order: SweepOrder,
) -> SweepResult<AlphaSweep>
where
    V: VarFunc + ?Sized,
    H: VarHatFunc + ?Sized,
{
    let grid = alphas.grid();
    let n_obs = ctx.observables.len();

    let (_, rows) = grid.iter().try_fold(
        (WarmStart::new(ctx.initial), Vec::with_capacity(grid.len())),
        |(warm, mut rows), &alpha| -> SweepResult<_> {
            let point = ctx.base.with_alpha(alpha);
            let (warm, outcome) = warm.solve(ctx, &point);
            let report = outcome.into_result()?;
            let values = ctx.observables.evaluate(&report.state)?;
            log::debug!("alpha={alpha}: state {:?}, observables {values:?}", report.state);
            rows.push(values);
            Ok((warm, rows))
        },
    )?;

    let observables = (0..n_obs)
        .map(|k| order.arrange(rows.iter().map(|row| row[k]).collect::<Array1<f64>>()))
        .collect();
    Ok(AlphaSweep { alphas: order.arrange(grid), observables })
}
