//! Composite trapezoidal rule.

use crate::integrand::Integrand;

/// Integrates `func` over `[start, end)` summing `steps` equal-width trapezoids.
///
/// Zero steps evaluate to `0.0`, which is what a partition left without
/// steps contributes to a sum.
///
/// # Arguments
/// * `func` - The integrand.
/// * `start` - Lower bound of the range.
/// * `end` - Upper bound of the range.
/// * `steps` - Amount of trapezoids.
///
/// # Returns
/// The approximate area under `func`.
pub fn integrate(func: Integrand, start: f64, end: f64, steps: u64) -> f64 {
    if steps == 0 {
        return 0.0;
    }

    let dx = (end - start) / steps as f64;

    let mut area = 0.0;
    for k in 0..steps {
        let lo = start + k as f64 * dx;
        let hi = start + (k + 1) as f64 * dx;
        area += dx * (func(lo) + func(hi)) / 2.0;
    }

    area
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::integrand::{charge_decay, gaussian};

    #[test]
    fn linear_function_is_exact() {
        let area = integrate(|x| 2.0 * x + 1.0, 0.0, 3.0, 7);
        assert!((area - 12.0).abs() < 1e-12);
    }

    #[test]
    fn sine_over_half_period() {
        let area = integrate(f64::sin, 0.0, PI, 100_000);
        assert!((area - 2.0).abs() < 1e-4);
    }

    #[test]
    fn gaussian_density_integrates_to_one() {
        let area = integrate(gaussian, -10.0, 10.0, 100_000);
        assert!((area - 1.0).abs() < 1e-3);
    }

    #[test]
    fn charge_decay_matches_closed_form() {
        // 4/5 + e^-5/5 over [0, 1] plus 1 - e^-1 over [1, 2].
        let expected = 0.8 + (-5.0f64).exp() / 5.0 + 1.0 - (-1.0f64).exp();
        let area = integrate(charge_decay, 0.0, 2.0, 200_000);
        assert!((area - expected).abs() < 1e-4);
    }

    #[test]
    fn empty_range_and_zero_steps() {
        assert_eq!(integrate(f64::sin, 1.0, 1.0, 10), 0.0);
        assert_eq!(integrate(f64::sin, 0.0, 1.0, 0), 0.0);
    }
}
