//! Block module - pool-backed message records ready for binary framing.
//!
//! A block is the compact form of a request or response: every
//! variable-length string or byte payload lives in the block's [`ValuePool`]
//! and is referenced elsewhere only by a `u16` handle. Repeated fields
//! (parameters, options) pack a key handle and a value handle into a single
//! 32-bit entry.
//!
//! Handles are only meaningful within the block that produced them; a pool is
//! owned by exactly one block and is never shared or reused.

mod pool;
mod request;
mod response;

pub use pool::{pack_entry, unpack_key, unpack_value, ValuePool, POOL_HANDLE_MASK, POOL_MAX_SIZE};
pub use request::RequestBlock;
pub use response::ResponseBlock;

/// Protocol version tag stamped on every info record produced or consumed by
/// the version-1 adapter.
pub const VERSION_1: u8 = 1;

/// Message-kind head markers.
///
/// Exactly three values are valid on the wire; any other marker is a decode
/// error, never silently defaulted.
pub mod heads {
    /// Request that expects a response.
    pub const INVOKER_REQUEST: u8 = 0x81;
    /// One-way (fire-and-forget) request.
    pub const MESSAGE_REQUEST: u8 = 0x82;
    /// Response to an invoker request.
    pub const RESPONSE: u8 = 0x83;
}
