use std::{error::Error, fmt, io};

use integration::IntegrationErr;
use tokio::task::JoinError;

/// The worker module's result type.
pub type Result<T> = std::result::Result<T, WorkerErr>;

/// Worker runtime failures.
#[derive(Debug)]
pub enum WorkerErr {
    Io(io::Error),
    InvalidConfig(String),
    Integration(IntegrationErr),
    Join(JoinError),
}

impl fmt::Display for WorkerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerErr::Io(e) => write!(f, "io error: {e}"),
            WorkerErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            WorkerErr::Integration(e) => write!(f, "integration error: {e}"),
            WorkerErr::Join(e) => write!(f, "evaluation task failed: {e}"),
        }
    }
}

impl Error for WorkerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorkerErr::Io(e) => Some(e),
            WorkerErr::Integration(e) => Some(e),
            WorkerErr::Join(e) => Some(e),
            WorkerErr::InvalidConfig(_) => None,
        }
    }
}

impl From<io::Error> for WorkerErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<IntegrationErr> for WorkerErr {
    fn from(value: IntegrationErr) -> Self {
        Self::Integration(value)
    }
}

impl From<JoinError> for WorkerErr {
    fn from(value: JoinError) -> Self {
        Self::Join(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<WorkerErr> for io::Error {
    fn from(value: WorkerErr) -> Self {
        match value {
            WorkerErr::Io(e) => e,
            other => io::Error::other(other),
        }
    }
}
