//! Error types for rpcwire.

use thiserror::Error;

/// Main error type for all wire adapter operations.
#[derive(Debug, Error)]
pub enum WireError {
    /// Value pool is full - the message carries too many payloads to encode.
    #[error("value pool full ({capacity} slots): message too large to encode")]
    PoolOverflow {
        /// Maximum slot count of the pool.
        capacity: usize,
    },

    /// A handle referenced a pool slot that does not exist.
    #[error("invalid pool handle {handle} (pool holds {len} slots)")]
    InvalidHandle {
        /// The offending handle.
        handle: u16,
        /// Number of slots in the pool that was read.
        len: usize,
    },

    /// Unknown message-kind marker on decode.
    #[error("unknown message head marker: 0x{0:02X}")]
    UnknownHead(u8),

    /// No payload coder registered for the given serialize-type tag.
    #[error("no payload coder registered for serialize type {0:?}")]
    CoderNotFound(String),

    /// Protocol error (truncated frame, corrupt entry, etc.).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A pooled string payload was not valid UTF-8.
    #[error("invalid UTF-8 in pooled string: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// MsgPack serialization error.
    #[error("MsgPack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MsgPack deserialization error.
    #[error("MsgPack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using WireError.
pub type Result<T> = std::result::Result<T, WireError>;
