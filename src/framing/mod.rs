//! Framing module - serializing blocks to and from byte streams.
//!
//! The framing codec is a capability boundary: anything that round-trips
//! every scalar field, packed entry, and pool slot of a block exactly can
//! stand in for the built-in implementation. The crate ships the version-1
//! big-endian framing in [`RequestFraming`] and [`ResponseFraming`].

mod v1;

use bytes::{Bytes, BytesMut};

use crate::error::Result;

pub use v1::{RequestFraming, ResponseFraming};

/// Byte-stream framing for one block kind.
///
/// Implementations must be reentrant and hold no shared mutable state.
pub trait Framing<B> {
    /// Serialize a block onto the sink.
    fn encode(&self, block: &B, out: &mut BytesMut) -> Result<()>;

    /// Deserialize one block from the source, consuming exactly one frame.
    fn decode(&self, src: &mut Bytes) -> Result<B>;
}
