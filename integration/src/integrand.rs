//! The fixed registry of reference integrands.

use std::f64::consts::PI;

use comms::specs::FuncId;

/// A pure real function.
pub type Integrand = fn(f64) -> f64;

/// Returns the function registered under `func_id`.
pub fn lookup(func_id: FuncId) -> Integrand {
    match func_id {
        FuncId::Sine => f64::sin,
        FuncId::Gaussian => gaussian,
        FuncId::ChargeDecay => charge_decay,
    }
}

/// The standard normal density.
pub fn gaussian(x: f64) -> f64 {
    (-(x * x) / 2.0).exp() / (2.0 * PI).sqrt()
}

/// Capacitor-like charge curve: zero before the origin, exponential charge
/// up to `x = 1`, exponential decay afterwards.
pub fn charge_decay(x: f64) -> f64 {
    if x < 0.0 {
        0.0
    } else if x < 1.0 {
        1.0 - (-5.0 * x).exp()
    } else {
        (-(x - 1.0)).exp()
    }
}
