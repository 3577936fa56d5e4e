use comms::specs::Query;
use integration::{Result, ThreadPoolEngine};

/// How a worker process evaluates the single query it was handed.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// The whole range on the worker's own thread.
    Direct,
    /// An embedded thread pool splitting the range into partitions.
    Threaded(ThreadPoolEngine),
}

impl Strategy {
    /// Integrates `query` according to this strategy.
    pub fn evaluate(&self, query: &Query) -> Result<f64> {
        match self {
            Strategy::Direct => Ok(integration::evaluate(query)),
            Strategy::Threaded(engine) => engine.run(query),
        }
    }
}
