//! The writing end of a single-use channel.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::Frame;

/// The sending end handle of a one-shot channel.
///
/// It transfers exactly one frame and closes the underlying writer.
pub struct OneShotSender<W>
where
    W: AsyncWrite + Unpin,
{
    tx: W,
}

impl<W: AsyncWrite + Unpin> OneShotSender<W> {
    /// Creates a new `OneShotSender` instance.
    ///
    /// # Arguments
    /// * `tx` - The underlying writer.
    pub(super) fn new(tx: W) -> Self {
        Self { tx }
    }

    /// Sends `msg` through the inner writer, consuming the sender.
    ///
    /// # Arguments
    /// * `msg` - A message with a fixed-width frame.
    ///
    /// # Returns
    /// A result object that returns `io::Error` on failure, a short write
    /// included.
    pub async fn send<T: Frame>(mut self, msg: &T) -> io::Result<()> {
        let raw = msg.to_raw();
        self.tx.write_all(bytemuck::bytes_of(&raw)).await?;
        self.tx.flush().await?;
        self.tx.shutdown().await
    }
}
