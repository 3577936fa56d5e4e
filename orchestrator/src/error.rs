use std::{fmt, io};

use integration::IntegrationErr;
use tokio::task::JoinError;

/// All errors that can occur in the orchestrator.
#[derive(Debug)]
pub enum OrchestratorError {
    /// Invalid configuration, caught before any query is read.
    InvalidConfig(String),
    /// The OS refused to create a worker process. Fatal, never retried.
    Spawn { program: String, source: io::Error },
    /// The in-process engine failed to evaluate a query.
    Integration(IntegrationErr),
    /// A blocking evaluation task could not be joined.
    Task(JoinError),
    /// An underlying I/O error not covered by the above variants.
    Io(io::Error),
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Spawn { program, source } => {
                write!(f, "failed to spawn worker {program}: {source}")
            }
            Self::Integration(e) => write!(f, "integration error: {e}"),
            Self::Task(e) => write!(f, "evaluation task failed: {e}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::Integration(e) => Some(e),
            Self::Task(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::InvalidConfig(_) => None,
        }
    }
}

impl From<io::Error> for OrchestratorError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<IntegrationErr> for OrchestratorError {
    fn from(e: IntegrationErr) -> Self {
        Self::Integration(e)
    }
}

impl From<JoinError> for OrchestratorError {
    fn from(e: JoinError) -> Self {
        Self::Task(e)
    }
}
