//! The shared-memory engine: one thread per partition, one reduced sum.

mod accumulator;

use std::{
    fmt,
    num::NonZeroUsize,
    str::FromStr,
    sync::mpsc,
    thread::{self, Scope, ScopedJoinHandle},
    time::Instant,
};

use comms::specs::Query;
use log::debug;

pub use accumulator::Accumulator;

use crate::{
    error::{IntegrationErr, Result},
    partition::{self, Partition},
};

/// How the partial areas of a query are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reduction {
    /// Every thread adds into one mutex-guarded accumulator.
    #[default]
    Locked,
    /// Every thread sends its area to the calling thread, which sums them.
    FanIn,
}

impl FromStr for Reduction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "locked" | "mutex" => Ok(Reduction::Locked),
            "fan-in" | "fan_in" | "channel" => Ok(Reduction::FanIn),
            other => Err(format!(
                "unknown reduction {other:?}, expected \"locked\" or \"fan-in\""
            )),
        }
    }
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reduction::Locked => write!(f, "locked"),
            Reduction::FanIn => write!(f, "fan-in"),
        }
    }
}

/// Evaluates a query by running exactly `fan_out` threads in parallel, one
/// per partition, and blocking until all of them finished.
///
/// There is no cancellation: a thread that never finishes stalls the query.
#[derive(Debug, Clone)]
pub struct ThreadPoolEngine {
    fan_out: NonZeroUsize,
    reduction: Reduction,
}

impl ThreadPoolEngine {
    /// Creates a new `ThreadPoolEngine` using the locked reduction.
    ///
    /// # Arguments
    /// * `fan_out` - The amount of partitions, and therefore threads, per query.
    pub fn new(fan_out: NonZeroUsize) -> Self {
        Self {
            fan_out,
            reduction: Reduction::default(),
        }
    }

    /// Selects how partial areas are combined.
    pub fn with_reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }

    pub fn fan_out(&self) -> NonZeroUsize {
        self.fan_out
    }

    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// Integrates `query`, returning only once every partition was summed.
    ///
    /// # Errors
    /// Returns `IntegrationErr::Spawn` if a thread could not be created and
    /// `IntegrationErr::WorkerPanicked` if one of them panicked.
    pub fn run(&self, query: &Query) -> Result<f64> {
        let partitions = partition::plan(query, self.fan_out);
        let started = Instant::now();

        let area = match self.reduction {
            Reduction::Locked => run_locked(&partitions)?,
            Reduction::FanIn => run_fan_in(&partitions)?,
        };

        debug!(
            "integrated function {} over [{}, {}) with {} threads in {:?}",
            query.func_id(),
            query.start(),
            query.end(),
            partitions.len(),
            started.elapsed()
        );

        Ok(area)
    }
}

fn run_locked(partitions: &[Partition]) -> Result<f64> {
    let acc = Accumulator::new();

    thread::scope(|s| {
        let handles = spawn_all(s, partitions, |part| acc.add(part.integrate()))?;
        join_all(handles)
    })?;

    Ok(acc.into_inner())
}

fn run_fan_in(partitions: &[Partition]) -> Result<f64> {
    let (tx, rx) = mpsc::channel();

    thread::scope(|s| {
        let handles = spawn_all(s, partitions, move |part| {
            // The receiver outlives every sender inside this scope.
            let _ = tx.send(part.integrate());
        })?;

        let total = rx.iter().take(partitions.len()).sum::<f64>();
        join_all(handles)?;
        Ok(total)
    })
}

/// Spawns one named scoped thread per partition running `work`.
fn spawn_all<'scope, 'env, F>(
    s: &'scope Scope<'scope, 'env>,
    partitions: &'env [Partition],
    work: F,
) -> Result<Vec<(usize, ScopedJoinHandle<'scope, ()>)>>
where
    F: Fn(&Partition) + Clone + Send + 'scope,
{
    partitions
        .iter()
        .enumerate()
        .map(|(idx, part)| {
            let work = work.clone();
            debug!(
                "spawning partition {idx}: [{}, {}) steps={}",
                part.start, part.end, part.steps
            );

            thread::Builder::new()
                .name(format!("trapezoid-{idx}"))
                .spawn_scoped(s, move || work(part))
                .map(|handle| (idx, handle))
                .map_err(IntegrationErr::Spawn)
        })
        .collect()
}

/// Joins every handle, reporting the first partition whose thread panicked.
fn join_all(handles: Vec<(usize, ScopedJoinHandle<'_, ()>)>) -> Result<()> {
    let mut panicked = None;

    for (partition, handle) in handles {
        if handle.join().is_err() {
            panicked.get_or_insert(partition);
        }
    }

    match panicked {
        Some(partition) => Err(IntegrationErr::WorkerPanicked { partition }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use comms::specs::FuncId;

    use super::*;

    fn engine(n: usize, reduction: Reduction) -> ThreadPoolEngine {
        ThreadPoolEngine::new(NonZeroUsize::new(n).unwrap()).with_reduction(reduction)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn sine_over_half_period() {
        let query = Query::new(0.0, PI, 100_000, FuncId::Sine).unwrap();
        let area = engine(16, Reduction::Locked).run(&query).unwrap();
        assert!((area - 2.0).abs() < 1e-4);
    }

    #[test]
    fn gaussian_density_integrates_to_one() {
        let query = Query::new(-10.0, 10.0, 100_000, FuncId::Gaussian).unwrap();
        let area = engine(64, Reduction::FanIn).run(&query).unwrap();
        assert!((area - 1.0).abs() < 1e-3);
    }

    #[test]
    fn reductions_agree() {
        let query = Query::new(-1.0, 4.0, 40_000, FuncId::ChargeDecay).unwrap();

        let locked = engine(4, Reduction::Locked).run(&query).unwrap();
        let fan_in = engine(4, Reduction::FanIn).run(&query).unwrap();

        assert!(close(locked, fan_in));
    }

    #[test]
    fn repeated_runs_agree_within_tolerance() {
        let query = Query::new(0.0, 3.0, 64_000, FuncId::Gaussian).unwrap();
        let engine = engine(16, Reduction::Locked);

        let first = engine.run(&query).unwrap();
        let second = engine.run(&query).unwrap();

        assert!(close(first, second));
    }

    #[test]
    fn single_thread_matches_direct_evaluation() {
        let query = Query::new(0.0, 2.0, 10_000, FuncId::Sine).unwrap();
        let area = engine(1, Reduction::Locked).run(&query).unwrap();
        assert_eq!(area, crate::evaluate(&query));
    }

    #[test]
    fn matches_sum_of_partitions() {
        let query = Query::new(-2.0, 2.0, 1_000, FuncId::Gaussian).unwrap();
        let fan_out = NonZeroUsize::new(8).unwrap();

        let expected: f64 = partition::plan(&query, fan_out)
            .iter()
            .map(Partition::integrate)
            .sum();
        let area = ThreadPoolEngine::new(fan_out).run(&query).unwrap();

        assert!(close(area, expected));
    }

    #[test]
    fn parses_reduction_names() {
        assert_eq!("locked".parse::<Reduction>(), Ok(Reduction::Locked));
        assert_eq!(" Fan-In ".parse::<Reduction>(), Ok(Reduction::FanIn));
        assert!("atomic".parse::<Reduction>().is_err());

        for reduction in [Reduction::Locked, Reduction::FanIn] {
            assert_eq!(reduction.to_string().parse::<Reduction>(), Ok(reduction));
        }
    }

    #[test]
    fn too_few_steps_sum_to_zero() {
        let query = Query::new(0.0, 1.0, 3, FuncId::Sine).unwrap();
        assert_eq!(engine(4, Reduction::FanIn).run(&query).unwrap(), 0.0);
    }
}
