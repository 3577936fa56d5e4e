pub mod engine;
pub mod error;
pub mod integrand;
pub mod partition;
pub mod trapezoid;

use comms::specs::Query;

pub use engine::{Reduction, ThreadPoolEngine};
pub use error::{IntegrationErr, Result};
pub use partition::Partition;

/// Evaluates `query` over its whole range on the calling thread.
///
/// # Arguments
/// * `query` - The query to integrate.
///
/// # Returns
/// The trapezoid-rule estimate of the query's integral.
pub fn evaluate(query: &Query) -> f64 {
    let func = integrand::lookup(query.func_id());
    trapezoid::integrate(func, query.start(), query.end(), query.steps())
}
