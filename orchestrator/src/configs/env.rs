use std::{env, num::NonZeroUsize, path::PathBuf, str::FromStr};

use integration::Reduction;

use super::{EngineKind, InvalidPolicy, ReportFormat};
use crate::OrchestratorError;

const ENGINE_VAR: &str = "INTEGRATE_ENGINE";
const THREADS_VAR: &str = "INTEGRATE_THREADS";
const MAX_WORKERS_VAR: &str = "INTEGRATE_MAX_WORKERS";
const WORKER_THREADS_VAR: &str = "INTEGRATE_WORKER_THREADS";
const REDUCTION_VAR: &str = "INTEGRATE_REDUCTION";
const ON_INVALID_VAR: &str = "INTEGRATE_ON_INVALID";
const REPORT_VAR: &str = "INTEGRATE_REPORT";
const WORKER_BIN_VAR: &str = "INTEGRATE_WORKER_BIN";
const PROMPT_VAR: &str = "INTEGRATE_PROMPT";

const DEFAULT_THREADS: usize = 16;
const DEFAULT_MAX_WORKERS: usize = 5;
const DEFAULT_WORKER_THREADS: usize = 4;

/// Runtime configuration of the `integrate` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub engine: EngineKind,
    /// Fan-out of the in-process thread engine.
    pub threads: NonZeroUsize,
    /// Bound on simultaneously active worker processes.
    pub max_workers: NonZeroUsize,
    /// Threads inside each worker process, `0` evaluates directly.
    pub worker_threads: usize,
    pub reduction: Reduction,
    pub on_invalid: InvalidPolicy,
    pub report: ReportFormat,
    /// Worker program, the running executable when unset.
    pub worker_bin: Option<PathBuf>,
    pub prompt: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            threads: NonZeroUsize::new(DEFAULT_THREADS).unwrap_or(NonZeroUsize::MIN),
            max_workers: NonZeroUsize::new(DEFAULT_MAX_WORKERS).unwrap_or(NonZeroUsize::MIN),
            worker_threads: DEFAULT_WORKER_THREADS,
            reduction: Reduction::default(),
            on_invalid: InvalidPolicy::default(),
            report: ReportFormat::default(),
            worker_bin: None,
            prompt: true,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `OrchestratorError::InvalidConfig` if a variable is set to an
    /// unparsable value.
    pub fn from_env() -> Result<Self, OrchestratorError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, unset keys take their default.
    pub fn from_vars<F>(lookup: F) -> Result<Self, OrchestratorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENGINE_VAR) {
            config.engine = raw.parse()?;
        }
        if let Some(raw) = lookup(THREADS_VAR) {
            config.threads = parse_var(THREADS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(MAX_WORKERS_VAR) {
            config.max_workers = parse_var(MAX_WORKERS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(WORKER_THREADS_VAR) {
            config.worker_threads = parse_var(WORKER_THREADS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(REDUCTION_VAR) {
            config.reduction = raw.parse().map_err(OrchestratorError::InvalidConfig)?;
        }
        if let Some(raw) = lookup(ON_INVALID_VAR) {
            config.on_invalid = raw.parse()?;
        }
        if let Some(raw) = lookup(REPORT_VAR) {
            config.report = raw.parse()?;
        }
        if let Some(raw) = lookup(WORKER_BIN_VAR) {
            config.worker_bin = Some(PathBuf::from(raw));
        }
        if let Some(raw) = lookup(PROMPT_VAR) {
            config.prompt = match raw.trim() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(OrchestratorError::InvalidConfig(format!(
                        "{PROMPT_VAR}={other:?} is not a boolean"
                    )));
                }
            };
        }

        Ok(config)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, OrchestratorError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| OrchestratorError::InvalidConfig(format!("{key}={raw:?}: {e}")))
}
