//! Fixed-width wire frames.
//!
//! Every message travels as the raw bytes of a `#[repr(C)]` plain-old-data
//! struct: fields are concatenated in declaration order, native endianness,
//! no length prefix and no delimiters. Both ends of a channel live on the
//! same host, so the layout is the in-memory one.

use std::io;

use bytemuck::Pod;

/// A message that maps onto a fixed-width raw frame.
pub trait Frame: Sized {
    /// The exact byte layout put on the wire.
    type Raw: Pod;

    /// Lowers `self` into its wire representation.
    fn to_raw(&self) -> Self::Raw;

    /// Lifts a wire representation back into a message.
    ///
    /// # Errors
    /// Returns an `io::ErrorKind::InvalidData` error if the raw fields do not
    /// describe a valid message.
    fn from_raw(raw: Self::Raw) -> io::Result<Self>;

    /// The exact amount of bytes one frame occupies on the wire.
    fn frame_size() -> usize {
        size_of::<Self::Raw>()
    }
}
