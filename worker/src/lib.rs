pub mod config;
pub mod error;
pub mod strategy;
pub mod worker;

pub use config::WorkerConfig;
pub use error::{Result, WorkerErr};
pub use strategy::Strategy;
pub use worker::Worker;

use comms::specs::Report;

/// Runs a worker over the process' standard streams: the query is read from
/// stdin and the report written to stdout.
///
/// # Errors
/// Returns `WorkerErr` if the query could not be received, evaluated or reported.
pub async fn run_stdio(config: &WorkerConfig) -> Result<Report> {
    let (rx, tx) = comms::channel(tokio::io::stdin(), tokio::io::stdout());
    Worker::new(config.strategy()).run(rx, tx).await
}
