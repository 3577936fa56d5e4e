mod frame;
mod receiver;
mod sender;
pub mod specs;

use tokio::io::{AsyncRead, AsyncWrite};

pub use frame::Frame;
pub use receiver::OneShotReceiver;
pub use sender::OneShotSender;

/// Creates both `OneShotReceiver` and `OneShotSender` channel parts.
///
/// A worker owns one of each: it receives its query on `rx` and sends its
/// report on `tx`.
///
/// # Arguments
/// * `rx` - An async readable.
/// * `tx` - An async writable.
///
/// # Returns
/// A single-use communication pair in the form of a receiver and a sender.
pub fn channel<R, W>(rx: R, tx: W) -> (OneShotReceiver<R>, OneShotSender<W>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    (OneShotReceiver::new(rx), OneShotSender::new(tx))
}

/// Wraps `tx` as the writing end of a one-shot channel.
pub fn sender<W: AsyncWrite + Unpin>(tx: W) -> OneShotSender<W> {
    OneShotSender::new(tx)
}

/// Wraps `rx` as the reading end of a one-shot channel.
pub fn receiver<R: AsyncRead + Unpin>(rx: R) -> OneShotReceiver<R> {
    OneShotReceiver::new(rx)
}
