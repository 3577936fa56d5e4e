pub mod command;
pub mod configs;
pub mod error;
pub mod pool;
pub mod report;
mod session;
pub mod source;

pub use command::WorkerCommand;
pub use configs::Config;
pub use error::OrchestratorError;
pub use pool::{DrainSummary, ProcessPool, WorkerExit};
pub use report::{JsonReporter, Reporter, TextReporter};
pub use session::{run_processes, run_threads};
pub use source::QuerySource;

/// The orchestrator's result type.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
