//! Pool-backed request record.

use bytes::Bytes;

use super::pool::{pack_entry, ValuePool};
use super::heads;
use crate::error::Result;

/// A request message in its compact, pool-indexed form.
///
/// Every string field is a handle into the block's own [`ValuePool`];
/// parameters and options are packed (key-handle, value-handle) entries.
/// The request ID and client timeout are fixed-width scalars and stay
/// verbatim.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use rpcwire::block::{heads, RequestBlock};
///
/// let mut block = RequestBlock::new(heads::INVOKER_REQUEST);
/// block.request_id = 42;
/// block.service_name = block.push_data(Some(Bytes::from_static(b"Echo"))).unwrap();
///
/// let name = block.read_data(block.service_name).unwrap();
/// assert_eq!(name.map(|b| b.as_ref()), Some(&b"Echo"[..]));
/// ```
#[derive(Debug, Clone)]
pub struct RequestBlock {
    /// Message-kind marker ([`heads::INVOKER_REQUEST`] or
    /// [`heads::MESSAGE_REQUEST`]).
    pub head: u8,
    /// Request ID, unique per in-flight call on the connection.
    pub request_id: u64,
    /// Pool handle of the service group name.
    pub service_group: u16,
    /// Pool handle of the service name.
    pub service_name: u16,
    /// Pool handle of the service version.
    pub service_version: u16,
    /// Pool handle of the target method name.
    pub target_method: u16,
    /// Pool handle of the serialize-type tag.
    pub serialize_type: u16,
    /// Client timeout in milliseconds, not pooled.
    pub client_timeout: i32,
    /// Packed (type-handle, value-handle) parameter entries, in call order.
    parameters: Vec<u32>,
    /// Packed (key-handle, value-handle) option entries.
    options: Vec<u32>,
    /// The pool every handle above refers into.
    pool: ValuePool,
}

impl RequestBlock {
    /// Create an empty request block with the given head marker.
    pub fn new(head: u8) -> Self {
        Self {
            head,
            request_id: 0,
            service_group: 0,
            service_name: 0,
            service_version: 0,
            target_method: 0,
            serialize_type: 0,
            client_timeout: 0,
            parameters: Vec::new(),
            options: Vec::new(),
            pool: ValuePool::new(),
        }
    }

    /// Whether the head marker says this is a one-way message request.
    #[inline]
    pub fn is_message(&self) -> bool {
        self.head == heads::MESSAGE_REQUEST
    }

    /// Push a payload into the block's pool, returning its handle.
    pub fn push_data(&mut self, payload: Option<Bytes>) -> Result<u16> {
        self.pool.push(payload)
    }

    /// Read a payload back from the block's pool.
    pub fn read_data(&self, handle: u16) -> Result<Option<&Bytes>> {
        self.pool.read(handle)
    }

    /// Pack and append a parameter entry. Order is significant: it binds
    /// positional arguments on the receiving side.
    pub fn add_parameter(&mut self, type_handle: u16, value_handle: u16) {
        self.parameters.push(pack_entry(type_handle, value_handle));
    }

    /// Pack and append an option entry.
    pub fn add_option(&mut self, key_handle: u16, value_handle: u16) {
        self.options.push(pack_entry(key_handle, value_handle));
    }

    /// Packed parameter entries in call order.
    pub fn parameters(&self) -> &[u32] {
        &self.parameters
    }

    /// Packed option entries in insertion order.
    pub fn options(&self) -> &[u32] {
        &self.options
    }

    /// Append an already-packed parameter entry (framing decode path).
    pub(crate) fn push_packed_parameter(&mut self, entry: u32) {
        self.parameters.push(entry);
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
