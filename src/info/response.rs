//! Transport-neutral response record.

use bytes::Bytes;
use indexmap::IndexMap;

/// Transport-neutral record of an RPC response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseInfo {
    /// Protocol version tag.
    pub version: u8,
    /// Request ID of the call this response answers.
    pub request_id: u64,
    /// Status code of the reply.
    pub status: u16,
    /// Tag selecting the payload coder for the return bytes.
    pub serialize_type: Option<String>,
    /// Serialized return value, left undecoded until the caller asks.
    pub return_data: Option<Bytes>,
    /// Option map, insertion order preserved.
    pub options: IndexMap<String, String>,
}

impl ResponseInfo {
    /// Create an empty response info stamped with the given version tag.
    pub fn new(version: u8) -> Self {
        Self {
            version,
            request_id: 0,
            status: 0,
            serialize_type: None,
            return_data: None,
            options: IndexMap::new(),
        }
    }

    /// Set an option, keeping insertion order.
    pub fn add_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }

    /// Look up an option value by key.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}
