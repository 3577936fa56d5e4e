//! Splits a query into equal, contiguous sub-ranges.

use std::num::NonZeroUsize;

use comms::specs::{FuncId, Query};

use crate::{integrand, trapezoid};

/// One contiguous sub-range of a query, evaluated by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partition {
    pub start: f64,
    pub end: f64,
    pub steps: u64,
    pub func_id: FuncId,
}

impl Partition {
    /// Computes this partition's trapezoid-rule area.
    pub fn integrate(&self) -> f64 {
        let func = integrand::lookup(self.func_id);
        trapezoid::integrate(func, self.start, self.end, self.steps)
    }
}

/// Plans the `fan_out` partitions of `query`.
///
/// Partition `i` spans `[start + i·Δ, start + (i + 1)·Δ)` with
/// `Δ = (end - start) / fan_out`, so neighbours share their boundary exactly.
/// Every partition gets `steps / fan_out` steps; the remaining
/// `steps % fan_out` are dropped, not redistributed.
///
/// # Arguments
/// * `query` - The query to split.
/// * `fan_out` - The amount of partitions.
///
/// # Returns
/// The ordered partitions covering the query's range.
pub fn plan(query: &Query, fan_out: NonZeroUsize) -> Vec<Partition> {
    let n = fan_out.get();
    let delta = (query.end() - query.start()) / n as f64;
    let steps = query.steps() / n as u64;
    let bound = |i: usize| query.start() + i as f64 * delta;

    (0..n)
        .map(|i| Partition {
            start: bound(i),
            end: bound(i + 1),
            steps,
            func_id: query.func_id(),
        })
        .collect()
}
