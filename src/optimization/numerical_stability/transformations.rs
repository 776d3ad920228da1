//! Numerical stability utilities.
//!
//! Provides safe implementations of the nonlinear transforms used to keep
//! searched hyperparameters above their floors while the optimizer works in
//! an unconstrained space. Explicit cutoffs (`x > 20.0`) keep `f64`
//! arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`FLOOR_GAP`] / [`floor_gap`]: smallest admissible distance to a
//!   floor, relative to the floor's magnitude.
//! - [`safe_softplus`] / [`safe_softplus_inv`]: stable `ln(1 + eˣ)` and
//!   its inverse.
//! - [`floored_softplus`] / [`floored_softplus_inv`]: the same shifted by a
//!   floor, mapping ℝ → (floor, ∞).

/// Relative gap kept between a searched parameter and its floor.
///
/// A guess sitting exactly on (or below) its floor has no finite preimage
/// under softplus, and `floor + softplus(θ)` rounds to `floor` once
/// `softplus(θ)` drops below one ulp of `floor`. Both maps keep at least
/// [`floor_gap`] above the floor.
pub const FLOOR_GAP: f64 = 1e-12;

/// Absolute gap for `floor`: `FLOOR_GAP · max(|floor|, 1)`.
///
/// Always many ulps of `floor`, so `floor + floor_gap(floor) > floor`.
pub fn floor_gap(floor: f64) -> f64 {
    FLOOR_GAP * floor.abs().max(1.0)
}

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// - For sufficiently large `x`, `softplus(x) ≈ x`.
/// - Otherwise, `ln1p(exp(x))`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: `t = ln(exp(x) - 1)`.
///
/// - For sufficiently large `x`, `ln(exp(x) - 1) ≈ x`.
/// - Otherwise, `ln(expm1(x))`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Map an unconstrained `θ` to `floor + softplus(θ)`, strictly above `floor`.
///
/// As `θ → −∞` the result saturates at `floor + floor_gap(floor)`.
pub fn floored_softplus(theta: f64, floor: f64) -> f64 {
    floor + safe_softplus(theta).max(floor_gap(floor))
}

/// Inverse of [`floored_softplus`]; values closer than [`floor_gap`] to the
/// floor are clamped to `floor + floor_gap(floor)`.
pub fn floored_softplus_inv(x: f64, floor: f64) -> f64 {
    safe_softplus_inv((x - floor).max(floor_gap(floor)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Agreement with the naïve formulas on a safe grid, and inverse
    // consistency.
    fn softplus_matches_naive_and_inverts() {
        for &x in &[-10.0, -1.0, 0.0, 0.5, 3.0, 15.0] {
            let naive = (1.0 + f64::exp(x)).ln();
            assert_relative_eq!(safe_softplus(x), naive, max_relative = 1e-12);
            assert_relative_eq!(safe_softplus_inv(safe_softplus(x)), x, epsilon = 1e-9);
        }
        assert_eq!(safe_softplus(50.0), 50.0);
    }

    #[test]
    // Purpose
    // -------
    // Floored maps stay above the floor and round-trip away from it.
    fn floored_softplus_respects_floor() {
        let floor = 1e-7;
        for &theta in &[-40.0, -5.0, 0.0, 2.0, 30.0] {
            assert!(floored_softplus(theta, floor) > floor);
        }
        let x = floored_softplus(floored_softplus_inv(0.8, floor), floor);
        assert_relative_eq!(x, 0.8, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Far into the negative tail the map saturates just above the floor
    // instead of rounding onto it.
    //
    // Given
    // -----
    // - Floors 0.05, 1e-7, -0.5 and 1e6.
    // - θ ∈ {−50, −800, f64::MIN}, where softplus(θ) is below one ulp of
    //   the floor or underflows to zero.
    //
    // Expect
    // ------
    // - Every value is strictly above its floor and equals
    //   `floor + floor_gap(floor)`.
    fn floored_softplus_stays_strictly_above_floor_in_the_tail() {
        for &floor in &[0.05, 1e-7, -0.5, 1e6] {
            for &theta in &[-50.0, -800.0, f64::MIN] {
                // Act
                let x = floored_softplus(theta, floor);

                // Assert
                assert!(x > floor, "floor {floor}, theta {theta}: {x}");
                assert_eq!(x, floor + floor_gap(floor));
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // A guess at or below the floor maps to a finite θ.
    fn floored_softplus_inv_clamps_guesses_below_floor() {
        let t = floored_softplus_inv(-3.0, 0.0);
        assert!(t.is_finite());
        assert_relative_eq!(floored_softplus(t, 0.0), floor_gap(0.0), max_relative = 1e-6);
    }
}
