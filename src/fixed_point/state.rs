//! fixed_point::state — order parameters, conjugates, and grid coordinates.
//!
//! Purpose
//! -------
//! Define the small `Copy` value types that flow through every solve:
//! the order-parameter triple `(m, q, σ)`, its conjugate "hat" triple, and
//! the immutable [`GridPoint`] carrying the control parameters of one solve.
//!
//! Conventions
//! -----------
//! - `m` is the overlap with the ground truth, `q` the squared norm of the
//!   estimator and `σ` the effective-noise proxy. The solver never enforces
//!   signs; update functions report domain problems themselves.
//! - A [`GridPoint`] is never mutated by sweeps. Each grid point derives a new
//!   value through the `with_*` builders.

/// Smallest regularization strength accepted by the optimal-parameter sweeps.
pub const SMALLEST_REG_PARAM: f64 = 1e-7;

/// Smallest Huber cutoff accepted by the two-parameter optimal sweep.
pub const SMALLEST_HUBER_PARAM: f64 = 1e-7;

/// Macroscopic state `(m, q, σ)` of the fitted estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderParams {
    pub m: f64,
    pub q: f64,
    pub sigma: f64,
}

impl OrderParams {
    pub const COMPONENTS: [&'static str; 3] = ["m", "q", "sigma"];

    pub fn new(m: f64, q: f64, sigma: f64) -> Self {
        Self { m, q, sigma }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.m, self.q, self.sigma]
    }

    /// Largest absolute componentwise difference between two states.
    pub fn max_abs_diff(&self, other: &OrderParams) -> f64 {
        let a = self.to_array();
        let b = other.to_array();
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
    }

    /// Damped update `blend · target + (1 − blend) · self`.
    pub fn damped_towards(&self, target: &OrderParams, blend: f64) -> OrderParams {
        let keep = 1.0 - blend;
        OrderParams {
            m: blend * target.m + keep * self.m,
            q: blend * target.q + keep * self.q,
            sigma: blend * target.sigma + keep * self.sigma,
        }
    }

    /// First non-finite component, if any, as `(name, value)`.
    pub fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        Self::COMPONENTS.iter().zip(self.to_array()).find(|(_, v)| !v.is_finite()).map(|(n, v)| (*n, v))
    }
}

impl Default for OrderParams {
    /// Conventional cold start `(0.6, 0.01, 0.9)`.
    fn default() -> Self {
        Self { m: 0.6, q: 0.01, sigma: 0.9 }
    }
}

impl From<(f64, f64, f64)> for OrderParams {
    fn from((m, q, sigma): (f64, f64, f64)) -> Self {
        Self { m, q, sigma }
    }
}

impl From<OrderParams> for (f64, f64, f64) {
    fn from(s: OrderParams) -> Self {
        (s.m, s.q, s.sigma)
    }
}

/// Conjugate parameters `(m̂, q̂, Σ̂)` produced by the channel-side update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HatParams {
    pub m_hat: f64,
    pub q_hat: f64,
    pub sigma_hat: f64,
}

impl HatParams {
    pub const COMPONENTS: [&'static str; 3] = ["m_hat", "q_hat", "sigma_hat"];

    pub fn new(m_hat: f64, q_hat: f64, sigma_hat: f64) -> Self {
        Self { m_hat, q_hat, sigma_hat }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.m_hat, self.q_hat, self.sigma_hat]
    }

    pub fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        Self::COMPONENTS.iter().zip(self.to_array()).find(|(_, v)| !v.is_finite()).map(|(n, v)| (*n, v))
    }
}

/// Control parameters of a single solve.
///
/// `alpha` is read by the channel-side update, `reg_param` by the prior-side
/// update, and `huber_param` (when present) by robust-loss channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub alpha: f64,
    pub reg_param: f64,
    pub huber_param: Option<f64>,
}

impl GridPoint {
    pub fn new(alpha: f64, reg_param: f64) -> Self {
        Self { alpha, reg_param, huber_param: None }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    pub fn with_reg_param(self, reg_param: f64) -> Self {
        Self { reg_param, ..self }
    }

    pub fn with_huber_param(self, huber_param: f64) -> Self {
        Self { huber_param: Some(huber_param), ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // `max_abs_diff` is the sup-norm used as the solver residual.
    fn max_abs_diff_is_sup_norm() {
        let a = OrderParams::new(0.5, 0.2, 1.0);
        let b = OrderParams::new(0.4, 0.5, 0.9);
        assert_relative_eq!(a.max_abs_diff(&b), 0.3, epsilon = 1e-12);
        assert_eq!(a.max_abs_diff(&a), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Damping interpolates; `blend = 1` jumps straight to the target.
    fn damped_towards_interpolates() {
        let old = OrderParams::new(0.0, 0.0, 0.0);
        let new = OrderParams::new(1.0, 2.0, 4.0);

        let half = old.damped_towards(&new, 0.5);
        assert_relative_eq!(half.m, 0.5);
        assert_relative_eq!(half.q, 1.0);
        assert_relative_eq!(half.sigma, 2.0);

        assert_eq!(old.damped_towards(&new, 1.0), new);
    }

    #[test]
    // Purpose
    // -------
    // Non-finite detection reports the first offending component by name.
    fn first_non_finite_names_component() {
        assert_eq!(OrderParams::new(0.1, 0.2, 0.3).first_non_finite(), None);
        let bad = OrderParams::new(0.1, f64::INFINITY, f64::NAN);
        assert_eq!(bad.first_non_finite().map(|(n, _)| n), Some("q"));

        let hat = HatParams::new(f64::NAN, 0.0, 0.0);
        assert_eq!(hat.first_non_finite().map(|(n, _)| n), Some("m_hat"));
    }

    #[test]
    // Purpose
    // -------
    // `with_*` builders return new points and leave the source untouched.
    fn grid_point_builders_do_not_alias() {
        let base = GridPoint::new(1.0, 0.5);
        let moved = base.with_alpha(2.0).with_reg_param(0.1).with_huber_param(1.5);

        assert_eq!(base, GridPoint { alpha: 1.0, reg_param: 0.5, huber_param: None });
        assert_eq!(moved, GridPoint { alpha: 2.0, reg_param: 0.1, huber_param: Some(1.5) });
    }
}
