use std::{env, num::NonZeroUsize};

use integration::{Reduction, ThreadPoolEngine};

use crate::{Strategy, WorkerErr, error::Result};

/// Amount of threads a worker process splits its query into, `0` evaluates directly.
pub const THREADS_VAR: &str = "INTEGRATE_WORKER_THREADS";
/// How the worker's threads combine their partial areas.
pub const REDUCTION_VAR: &str = "INTEGRATE_REDUCTION";

const DEFAULT_THREADS: usize = 4;

/// Immutable evaluation settings for a worker process.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerConfig {
    threads: Option<NonZeroUsize>,
    reduction: Reduction,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: NonZeroUsize::new(DEFAULT_THREADS),
            reduction: Reduction::default(),
        }
    }
}

impl WorkerConfig {
    /// Creates a new worker configuration.
    ///
    /// # Args
    /// * `threads` - Threads per query, `None` to evaluate on a single thread.
    /// * `reduction` - How partial areas are combined.
    pub fn new(threads: Option<NonZeroUsize>, reduction: Reduction) -> Self {
        Self { threads, reduction }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `WorkerErr::InvalidConfig` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, unset keys take their default.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(THREADS_VAR) {
            let threads = raw.trim().parse::<usize>().map_err(|e| {
                WorkerErr::InvalidConfig(format!("{THREADS_VAR}={raw:?}: {e}"))
            })?;
            config.threads = NonZeroUsize::new(threads);
        }

        if let Some(raw) = lookup(REDUCTION_VAR) {
            config.reduction = raw
                .parse()
                .map_err(|e| WorkerErr::InvalidConfig(format!("{REDUCTION_VAR}: {e}")))?;
        }

        Ok(config)
    }

    pub fn threads(&self) -> Option<NonZeroUsize> {
        self.threads
    }

    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// Builds the evaluation strategy this configuration describes.
    pub fn strategy(&self) -> Strategy {
        match self.threads {
            Some(threads) => {
                Strategy::Threaded(ThreadPoolEngine::new(threads).with_reduction(self.reduction))
            }
            None => Strategy::Direct,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn parse(vars: &[(&str, &str)]) -> Result<WorkerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WorkerConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_threaded_evaluation() {
        let config = parse(&[]).unwrap();
        assert_eq!(config, WorkerConfig::default());
        assert!(matches!(config.strategy(), Strategy::Threaded(_)));
    }

    #[test]
    fn zero_threads_means_direct() {
        let config = parse(&[(THREADS_VAR, "0")]).unwrap();
        assert_eq!(config.threads(), None);
        assert!(matches!(config.strategy(), Strategy::Direct));
    }

    #[test]
    fn reads_threads_and_reduction() {
        let config = parse(&[(THREADS_VAR, "16"), (REDUCTION_VAR, "fan-in")]).unwrap();
        assert_eq!(config.threads(), NonZeroUsize::new(16));
        assert_eq!(config.reduction(), Reduction::FanIn);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse(&[(THREADS_VAR, "many")]),
            Err(WorkerErr::InvalidConfig(_))
        ));
        assert!(matches!(
            parse(&[(REDUCTION_VAR, "atomic")]),
            Err(WorkerErr::InvalidConfig(_))
        ));
    }
}
