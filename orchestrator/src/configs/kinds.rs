use std::str::FromStr;

use crate::OrchestratorError;

/// Which engine evaluates the incoming queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineKind {
    /// Every query split across threads of this process.
    Threads,
    /// Every query handed to a new worker process.
    #[default]
    Processes,
}

/// What the query source does with a well-formed but invalid query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidPolicy {
    /// Treat it as end of stream.
    #[default]
    Stop,
    /// Drop it and read the next one.
    Skip,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

fn unknown<T>(what: &str, got: &str, expected: &str) -> Result<T, OrchestratorError> {
    Err(OrchestratorError::InvalidConfig(format!(
        "unknown {what} {got:?}, expected {expected}"
    )))
}

impl FromStr for EngineKind {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threads" => Ok(Self::Threads),
            "processes" => Ok(Self::Processes),
            other => unknown("engine", other, "\"threads\" or \"processes\""),
        }
    }
}

impl FromStr for InvalidPolicy {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stop" => Ok(Self::Stop),
            "skip" => Ok(Self::Skip),
            other => unknown("invalid query policy", other, "\"stop\" or \"skip\""),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => unknown("report format", other, "\"text\" or \"json\""),
        }
    }
}
