//! A bounded pool of per-query worker processes.
//!
//! Every submitted query gets a brand new worker process which evaluates the
//! whole query, sends back one report and exits. The pool keeps at most
//! `max_workers` of them alive, reaps them asynchronously and relays their
//! reports to a `Reporter`.
//!
//! The bound is soft. The active counter is read before spawning and bumped
//! after spawning as two separate atomic operations, while reaper tasks
//! decrement it concurrently from their own context. Nothing makes the
//! check-then-increment sequence atomic, so concurrent observers may see the
//! live count exceed the bound by a small amount. This is accepted.

use std::{
    num::NonZeroUsize,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use comms::specs::{Query, Report};
use log::{debug, error, info, warn};
use tokio::{
    process::{Child, ChildStdout},
    sync::mpsc,
    task::JoinSet,
};

use crate::{OrchestratorError, Reporter, Result, WorkerCommand};

/// Termination notification of one worker, produced by its reaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerExit {
    pub worker_id: usize,
    /// Whether the process exited with a success status.
    pub success: bool,
    /// Whether a report was received and relayed before the process exited.
    pub reported: bool,
}

/// Lifecycle totals of a pool.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainSummary {
    pub spawned: usize,
    pub reaped: usize,
    pub reported: usize,
    /// Workers that terminated without delivering a result.
    pub lost: usize,
    /// Workers that exited with a non-success status, reported or not.
    pub failed: usize,
}

/// Runs each query in its own worker process, at most `max_workers` at a time.
pub struct ProcessPool {
    command: WorkerCommand,
    max_workers: NonZeroUsize,
    reporter: Arc<dyn Reporter>,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    exit_tx: mpsc::UnboundedSender<WorkerExit>,
    exit_rx: mpsc::UnboundedReceiver<WorkerExit>,
    reapers: JoinSet<()>,
    summary: DrainSummary,
}

impl ProcessPool {
    /// Creates a new, empty `ProcessPool`.
    ///
    /// # Arguments
    /// * `command` - How worker processes are launched.
    /// * `max_workers` - The bound on simultaneously active workers.
    /// * `reporter` - Where worker reports are relayed to.
    pub fn new(
        command: WorkerCommand,
        max_workers: NonZeroUsize,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        let (exit_tx, exit_rx) = mpsc::unbounded_channel();

        Self {
            command,
            max_workers,
            reporter,
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            exit_tx,
            exit_rx,
            reapers: JoinSet::new(),
            summary: DrainSummary::default(),
        }
    }

    pub fn max_workers(&self) -> NonZeroUsize {
        self.max_workers
    }

    /// The amount of workers spawned and not yet reaped.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// The highest active count observed right after a spawn.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }

    /// Hands `query` to a new worker process, first waiting for a worker to
    /// finish if the pool is at its bound.
    ///
    /// A query that cannot be written to the worker is lost: the worker exits
    /// without reporting and is still reaped.
    ///
    /// # Errors
    /// Returns `OrchestratorError::Spawn` if the worker process could not be
    /// created. This is fatal, the pool never retries.
    pub async fn submit(&mut self, query: Query) -> Result<()> {
        self.collect_exits();

        while self.active() >= self.max_workers.get() {
            debug!("{} workers active, waiting for one to exit", self.active());
            match self.exit_rx.recv().await {
                Some(exit) => self.record(exit),
                None => break,
            }
        }

        let worker_id = self.summary.spawned;
        let mut child = self
            .command
            .spawn()
            .map_err(|source| OrchestratorError::Spawn {
                program: self.command.program().display().to_string(),
                source,
            })?;

        self.summary.spawned += 1;
        let live = self.active.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(live, Ordering::AcqRel);
        debug!(
            "spawned worker {worker_id} (pid {:?}), {live} active",
            child.id()
        );

        match child.stdin.take() {
            Some(stdin) => {
                if let Err(e) = comms::sender(stdin).send(&query).await {
                    warn!("worker {worker_id}: failed to hand over query, result lost: {e}");
                }
            }
            None => warn!("worker {worker_id}: no query channel, result lost"),
        }

        let stdout = child.stdout.take();
        self.reapers.spawn(reap(
            worker_id,
            child,
            stdout,
            Arc::clone(&self.reporter),
            Arc::clone(&self.active),
            self.exit_tx.clone(),
        ));

        Ok(())
    }

    /// Waits for every active worker to terminate.
    ///
    /// # Returns
    /// The pool's lifecycle totals.
    pub async fn drain(mut self) -> DrainSummary {
        info!("draining {} active worker(s)", self.active());

        while let Some(joined) = self.reapers.join_next().await {
            if let Err(e) = joined {
                error!("reaper task failed: {e}");
            }
        }
        self.collect_exits();

        let summary = self.summary;
        info!(
            "drained: spawned={} reaped={} reported={} lost={} failed={}",
            summary.spawned,
            summary.reaped,
            summary.reported,
            summary.lost,
            summary.failed
        );

        summary
    }

    /// Consumes pending exit notifications and finished reaper tasks without waiting.
    fn collect_exits(&mut self) {
        while let Ok(exit) = self.exit_rx.try_recv() {
            self.record(exit);
        }
        while self.reapers.try_join_next().is_some() {}
    }

    fn record(&mut self, exit: WorkerExit) {
        self.summary.reaped += 1;

        if !exit.success {
            self.summary.failed += 1;
        }

        if exit.reported {
            self.summary.reported += 1;
        } else {
            self.summary.lost += 1;
            warn!("worker {} exited without a result", exit.worker_id);
        }
    }
}

/// Relays the worker's report, waits for its termination and notifies the pool.
///
/// This is the only place the active counter is decremented, exactly once per
/// spawned worker, whatever happened to its channels.
async fn reap(
    worker_id: usize,
    mut child: Child,
    stdout: Option<ChildStdout>,
    reporter: Arc<dyn Reporter>,
    active: Arc<AtomicUsize>,
    exit_tx: mpsc::UnboundedSender<WorkerExit>,
) {
    let reported = match stdout {
        Some(stdout) => match comms::receiver(stdout).recv::<Report>().await {
            Ok(report) => {
                reporter.report(&report);
                true
            }
            Err(e) => {
                debug!("worker {worker_id}: no report received: {e}");
                false
            }
        },
        None => false,
    };

    let success = match child.wait().await {
        Ok(status) if status.success() => true,
        Ok(status) => {
            warn!("worker {worker_id} exited with {status}");
            false
        }
        Err(e) => {
            warn!("worker {worker_id}: failed to wait for exit: {e}");
            false
        }
    };

    active.fetch_sub(1, Ordering::AcqRel);
    debug!("reaped worker {worker_id}");

    let _ = exit_tx.send(WorkerExit {
        worker_id,
        success,
        reported,
    });
}
