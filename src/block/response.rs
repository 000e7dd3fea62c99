//! Pool-backed response record.

use bytes::Bytes;

use super::pool::{pack_entry, ValuePool};
use super::heads;
use crate::error::Result;

/// A response message in its compact, pool-indexed form.
///
/// The head marker is fixed to [`heads::RESPONSE`]; the serialize-type tag
/// and return-value bytes live in the pool, the status code stays a raw
/// scalar.
#[derive(Debug, Clone)]
pub struct ResponseBlock {
    /// Message-kind marker, always [`heads::RESPONSE`] on valid blocks.
    pub head: u8,
    /// Request ID of the call this response answers.
    pub request_id: u64,
    /// Pool handle of the serialize-type tag.
    pub serialize_type: u16,
    /// Pool handle of the serialized return value.
    pub return_data: u16,
    /// Status code, not pooled.
    pub status: u16,
    /// Packed (key-handle, value-handle) option entries.
    options: Vec<u32>,
    /// The pool every handle above refers into.
    pool: ValuePool,
}

impl ResponseBlock {
    /// Create an empty response block.
    pub fn new() -> Self {
        Self {
            head: heads::RESPONSE,
            request_id: 0,
            serialize_type: 0,
            return_data: 0,
            status: 0,
            options: Vec::new(),
            pool: ValuePool::new(),
        }
    }

    /// Push a payload into the block's pool, returning its handle.
    pub fn push_data(&mut self, payload: Option<Bytes>) -> Result<u16> {
        self.pool.push(payload)
    }

    /// Read a payload back from the block's pool.
    pub fn read_data(&self, handle: u16) -> Result<Option<&Bytes>> {
        self.pool.read(handle)
    }

    /// Pack and append an option entry.
    pub fn add_option(&mut self, key_handle: u16, value_handle: u16) {
        self.options.push(pack_entry(key_handle, value_handle));
    }

    /// Packed option entries in insertion order.
    pub fn options(&self) -> &[u32] {
        &self.options
    }

    /// Append an already-packed option entry (framing decode path).
    pub(crate) fn push_packed_option(&mut self, entry: u32) {
        self.options.push(entry);
    }

    pub(crate) fn pool(&self) -> &ValuePool {
        &self.pool
    }

    pub(crate) fn pool_mut(&mut self) -> &mut ValuePool {
        &mut self.pool
    }
}

impl Default for ResponseBlock {
    fn default() -> Self {
        Self::new()
    }
}
