use std::time::Instant;

use comms::{
    OneShotReceiver, OneShotSender,
    specs::{Query, Report},
};
use log::{debug, info};
use tokio::io::{AsyncRead, AsyncWrite};

use super::Result;
use crate::Strategy;

/// Runtime of one per-query worker.
///
/// A worker receives exactly one query, evaluates it and sends exactly one
/// report back. Any failure leaves the report unsent.
pub struct Worker {
    strategy: Strategy,
}

impl Worker {
    /// Creates a new worker.
    ///
    /// # Args
    /// * `strategy` - How the received query gets evaluated.
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    /// Receives the query from `rx`, integrates it and sends the report to `tx`.
    ///
    /// # Args
    /// * `rx` - Receiving end of the parent's query channel.
    /// * `tx` - Sending end of the report channel.
    ///
    /// # Returns
    /// The report that was sent.
    ///
    /// # Errors
    /// Returns `WorkerErr` on a short or malformed query frame, on an
    /// evaluation failure or if the report could not be written.
    pub async fn run<R, W>(self, rx: OneShotReceiver<R>, tx: OneShotSender<W>) -> Result<Report>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let query: Query = rx.recv().await?;
        debug!(
            func_id = query.func_id().id(), steps = query.steps();
            "received query over [{}, {})", query.start(), query.end()
        );

        let strategy = self.strategy;
        let started = Instant::now();
        let value = tokio::task::spawn_blocking(move || strategy.evaluate(&query)).await??;
        debug!("evaluated in {:?}", started.elapsed());

        let report = Report::new(&query, value);
        tx.send(&report).await?;
        info!("reported: {report}");

        Ok(report)
    }
}
