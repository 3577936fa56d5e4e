use std::{error::Error, fmt, io};

/// The result type used in the entire integration module.
pub type Result<T> = std::result::Result<T, IntegrationErr>;

/// The integration module's error type.
#[derive(Debug)]
pub enum IntegrationErr {
    /// The OS refused to create one of the evaluation threads.
    Spawn(io::Error),
    WorkerPanicked {
        partition: usize,
    },
}

impl fmt::Display for IntegrationErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationErr::Spawn(e) => write!(f, "failed to spawn evaluation thread: {e}"),
            IntegrationErr::WorkerPanicked { partition } => {
                write!(f, "the thread evaluating partition {partition} panicked")
            }
        }
    }
}

impl Error for IntegrationErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            IntegrationErr::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for IntegrationErr {
    fn from(value: io::Error) -> Self {
        Self::Spawn(value)
    }
}
