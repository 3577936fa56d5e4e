//! The reading end of a single-use channel.

use std::io;

use bytemuck::Zeroable;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::Frame;

/// The receiving end handle of a one-shot channel.
pub struct OneShotReceiver<R: AsyncRead + Unpin> {
    rx: R,
}

impl<R: AsyncRead + Unpin> OneShotReceiver<R> {
    /// Creates a new `OneShotReceiver` instance.
    ///
    /// # Arguments
    /// * `rx` - The underlying reader.
    pub(super) fn new(rx: R) -> Self {
        Self { rx }
    }

    /// Waits to receive the single frame of this channel, consuming the receiver.
    ///
    /// # Returns
    /// A result object that returns `T` on success or `io::Error` on failure.
    /// A peer that closes before a whole frame arrived yields
    /// `io::ErrorKind::UnexpectedEof`.
    pub async fn recv<T: Frame>(mut self) -> io::Result<T> {
        let mut raw = <T::Raw as Zeroable>::zeroed();
        self.rx.read_exact(bytemuck::bytes_of_mut(&mut raw)).await?;
        T::from_raw(raw)
    }
}
