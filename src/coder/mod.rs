//! Coder module - pluggable payload serialization.
//!
//! A [`PayloadCoder`] turns a transport-neutral application value
//! (`serde_json::Value`) into bytes and back. Coders are selected by a
//! string tag carried in the message's serialize-type field, through an
//! explicit [`CoderRegistry`] handed to the adapter at construction - there
//! is no global lookup.
//!
//! Two coders ship with the crate:
//!
//! - [`MsgPackCoder`] - MessagePack via `rmp-serde` (`to_vec_named` so
//!   structs travel as maps, not positional arrays)
//! - [`JsonCoder`] - JSON via `serde_json`
//!
//! # Example
//!
//! ```
//! use rpcwire::coder::CoderRegistry;
//! use serde_json::json;
//!
//! let registry = CoderRegistry::with_defaults();
//! let coder = registry.get("json").unwrap();
//!
//! let bytes = coder.encode(&json!({"n": 7})).unwrap();
//! let value = coder.decode(&bytes).unwrap();
//! assert_eq!(value["n"], 7);
//! ```

mod json;
mod msgpack;

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use crate::error::Result;

pub use json::JsonCoder;
pub use msgpack::MsgPackCoder;

/// Serialize-type tag of the default MessagePack coder.
pub const MSGPACK_CODER: &str = "msgpack";

/// Serialize-type tag of the default JSON coder.
pub const JSON_CODER: &str = "json";

/// Pluggable payload serializer, selected by serialize-type tag.
///
/// Implementations must be reentrant and hold no shared mutable state; the
/// adapter relies on that for its concurrency guarantee.
pub trait PayloadCoder: Send + Sync {
    /// Serialize an application value to bytes.
    fn encode(&self, value: &Value) -> Result<Bytes>;

    /// Deserialize bytes back into an application value.
    fn decode(&self, data: &[u8]) -> Result<Value>;
}

/// Registry mapping serialize-type tags to payload coders.
///
/// Handed to the adapter at construction; lookups that miss are surfaced by
/// the adapter as [`crate::WireError::CoderNotFound`] before any pooling
/// work starts.
#[derive(Clone)]
pub struct CoderRegistry {
    coders: HashMap<String, Arc<dyn PayloadCoder>>,
}

impl CoderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            coders: HashMap::new(),
        }
    }

    /// Create a registry with the built-in `"msgpack"` and `"json"` coders.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MSGPACK_CODER, Arc::new(MsgPackCoder));
        registry.register(JSON_CODER, Arc::new(JsonCoder));
        registry
    }

    /// Register a coder under a serialize-type tag.
    ///
    /// Registering the same tag again replaces the previous coder.
    pub fn register(&mut self, tag: &str, coder: Arc<dyn PayloadCoder>) {
        self.coders.insert(tag.to_string(), coder);
    }

    /// Look up a coder by serialize-type tag.
    pub fn get(&self, tag: &str) -> Option<Arc<dyn PayloadCoder>> {
        self.coders.get(tag).cloned()
    }

    /// Whether a coder is registered for the tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.coders.contains_key(tag)
    }
}

impl Default for CoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_defaults_registers_both_coders() {
        let registry = CoderRegistry::with_defaults();

        assert!(registry.contains(MSGPACK_CODER));
        assert!(registry.contains(JSON_CODER));
        assert!(!registry.contains("hessian"));
    }

    #[test]
    fn test_get_unknown_tag() {
        let registry = CoderRegistry::new();
        assert!(registry.get("msgpack").is_none());
    }

    #[test]
    fn test_register_custom_coder() {
        struct UpperCoder;
        impl PayloadCoder for UpperCoder {
            fn encode(&self, value: &Value) -> Result<Bytes> {
                let s = value.as_str().unwrap_or_default().to_uppercase();
                Ok(Bytes::from(s.into_bytes()))
            }
            fn decode(&self, data: &[u8]) -> Result<Value> {
                Ok(Value::String(String::from_utf8_lossy(data).into_owned()))
            }
        }

        let mut registry = CoderRegistry::new();
        registry.register("upper", Arc::new(UpperCoder));

        let coder = registry.get("upper").unwrap();
        let bytes = coder.encode(&json!("hi")).unwrap();
        assert_eq!(&bytes[..], b"HI");
    }
}
