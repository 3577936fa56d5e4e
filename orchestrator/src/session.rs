//! Intake loops tying a query source to an engine.

use std::time::Instant;

use comms::specs::{Query, Report};
use integration::ThreadPoolEngine;
use log::{debug, info, warn};
use tokio::io::AsyncBufRead;

use crate::{DrainSummary, ProcessPool, QuerySource, Reporter, Result};

/// Evaluates every query of `source` in-process, one after the other, each
/// split across the engine's threads.
///
/// # Returns
/// The amount of queries evaluated and reported.
///
/// # Errors
/// Returns `OrchestratorError` if the engine failed to evaluate a query.
pub async fn run_threads<R>(
    source: &mut QuerySource<R>,
    engine: &ThreadPoolEngine,
    reporter: &dyn Reporter,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    info!(
        "evaluating queries with {} thread(s) per query",
        engine.fan_out()
    );

    let mut evaluated = 0;
    while let Some(query) = next_query(source).await {
        let engine = engine.clone();
        let started = Instant::now();

        let value = tokio::task::spawn_blocking(move || engine.run(&query)).await??;
        debug!("query evaluated in {:?}", started.elapsed());

        reporter.report(&Report::new(&query, value));
        evaluated += 1;
    }

    info!("intake finished, {evaluated} queries evaluated");
    Ok(evaluated)
}

/// Submits every query of `source` to `pool`, then drains it.
///
/// # Returns
/// The pool's lifecycle totals once every worker was reaped.
///
/// # Errors
/// Returns `OrchestratorError::Spawn` as soon as a worker cannot be
/// created; the remaining workers are not waited for.
pub async fn run_processes<R>(
    source: &mut QuerySource<R>,
    mut pool: ProcessPool,
) -> Result<DrainSummary>
where
    R: AsyncBufRead + Unpin,
{
    info!(
        "evaluating queries in worker processes, at most {} at a time",
        pool.max_workers()
    );

    while let Some(query) = next_query(source).await {
        pool.submit(query).await?;
    }

    Ok(pool.drain().await)
}

/// Reads the next query, a read failure ends the stream like end of input does.
async fn next_query<R>(source: &mut QuerySource<R>) -> Option<Query>
where
    R: AsyncBufRead + Unpin,
{
    match source.next().await {
        Ok(query) => query,
        Err(e) => {
            warn!("failed to read queries, ending intake: {e}");
            None
        }
    }
}
