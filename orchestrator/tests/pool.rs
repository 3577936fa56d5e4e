use std::{num::NonZeroUsize, sync::Arc};

use comms::specs::{FuncId, Query, Report};
use orchestrator::{
    DrainSummary, OrchestratorError, ProcessPool, QuerySource, WorkerCommand,
    configs::InvalidPolicy, run_processes,
};
use tokio::sync::mpsc;

/// A stand-in worker that swallows its query and exits without reporting.
fn silent_worker(sleep: &str) -> WorkerCommand {
    WorkerCommand::new("sh")
        .arg("-c")
        .arg(format!("cat > /dev/null; sleep {sleep}"))
}

fn new_pool(
    command: WorkerCommand,
    max_workers: usize,
) -> (ProcessPool, mpsc::UnboundedReceiver<Report>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let max_workers = NonZeroUsize::new(max_workers).unwrap();
    (ProcessPool::new(command, max_workers, Arc::new(tx)), rx)
}

fn query(steps: u64) -> Query {
    Query::new(0.0, 1.0, steps, FuncId::Sine).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn active_workers_never_exceed_bound() {
    let (mut pool, _reports) = new_pool(silent_worker("0.2"), 2);

    for steps in 1..=6 {
        pool.submit(query(steps)).await.unwrap();
        assert!(pool.active() <= 2);
    }

    assert_eq!(pool.peak(), 2);

    let summary = pool.drain().await;
    assert_eq!(summary.spawned, 6);
    assert_eq!(summary.reaped, 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn drain_waits_for_every_worker() {
    let (mut pool, _reports) = new_pool(silent_worker("0.1"), 4);

    for steps in 1..=3 {
        pool.submit(query(steps)).await.unwrap();
    }

    let summary = pool.drain().await;
    assert_eq!(
        summary,
        DrainSummary {
            spawned: 3,
            reaped: 3,
            reported: 0,
            lost: 3,
            failed: 0,
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn worker_that_drops_its_channel_is_still_reaped() {
    let command = WorkerCommand::new("sh").arg("-c").arg("exec 0<&-; exit 3");
    let (mut pool, mut reports) = new_pool(command, 1);

    pool.submit(query(10)).await.unwrap();
    pool.submit(query(20)).await.unwrap();

    let summary = pool.drain().await;
    assert_eq!(summary.reaped, 2);
    assert_eq!(summary.lost, 2);
    assert_eq!(summary.failed, 2);
    assert!(reports.try_recv().is_err());
}

#[tokio::test]
async fn spawn_failure_is_fatal() {
    let command = WorkerCommand::new("/nonexistent/integrate-worker");
    let (mut pool, _reports) = new_pool(command, 3);

    let err = pool.submit(query(10)).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Spawn { .. }));
    assert_eq!(pool.active(), 0);
}

#[tokio::test]
async fn invalid_query_never_spawns_a_worker() {
    for input in ["0 1 0 0\n", "1 0 100 0\n", "0 1 100 9\n"] {
        // Any spawn attempt would fail with this program.
        let command = WorkerCommand::new("/nonexistent/integrate-worker");
        let (pool, mut reports) = new_pool(command, 3);

        let mut source = QuerySource::new(input.as_bytes(), InvalidPolicy::Skip);
        let summary = run_processes(&mut source, pool).await.unwrap();

        assert_eq!(summary, DrainSummary::default());
        assert!(reports.try_recv().is_err());
    }
}
