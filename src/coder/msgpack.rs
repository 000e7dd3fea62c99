//! MsgPack payload coder using `rmp-serde`.
//!
//! Always uses `to_vec_named` so structs and maps are serialized with field
//! names rather than positionally; peers on other runtimes expect the map
//! format.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::PayloadCoder;
use crate::error::Result;

/// MessagePack coder for structured payloads.
pub struct MsgPackCoder;

impl MsgPackCoder {
    /// Encode any serializable value to MsgPack bytes.
    ///
    /// Uses `to_vec_named` for the struct-as-map format.
    #[inline]
    pub fn encode_typed<T: Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    /// Decode MsgPack bytes into a concrete type.
    #[inline]
    pub fn decode_typed<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(data)?)
    }
}

impl PayloadCoder for MsgPackCoder {
    fn encode(&self, value: &Value) -> Result<Bytes> {
        Ok(Bytes::from(Self::encode_typed(value)?))
    }

    fn decode(&self, data: &[u8]) -> Result<Value> {
        Self::decode_typed(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct TestStruct {
        id: u32,
        name: String,
    }

    #[test]
    fn test_typed_roundtrip() {
        let original = TestStruct {
            id: 42,
            name: "test".to_string(),
        };

        let encoded = MsgPackCoder::encode_typed(&original).unwrap();
        let decoded: TestStruct = MsgPackCoder::decode_typed(&encoded).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_value_roundtrip() {
        let value = json!({"id": 1, "items": ["a", "b"], "nested": {"ok": true}});

        let encoded = MsgPackCoder.encode(&value).unwrap();
        let decoded = MsgPackCoder.decode(&encoded).unwrap();

        assert_eq!(decoded, value);
    }

    #[test]
    fn test_structs_encode_as_maps() {
        let encoded = MsgPackCoder.encode(&json!({"a": 1, "b": 2})).unwrap();

        // Fixmap marker (0x8X), never fixarray (0x9X).
        assert_eq!(
            encoded[0] & 0xF0,
            0x80,
            "expected map format, got {:02X}",
            encoded[0]
        );
    }

    #[test]
    fn test_null_roundtrip() {
        let encoded = MsgPackCoder.encode(&Value::Null).unwrap();
        assert_eq!(&encoded[..], &[0xC0], "null should encode as msgpack nil");

        let decoded = MsgPackCoder.decode(&encoded).unwrap();
        assert_eq!(decoded, Value::Null);
    }

    #[test]
    fn test_decode_error_on_garbage() {
        // 0xC1 is never a valid msgpack marker.
        assert!(MsgPackCoder.decode(&[0xC1]).is_err());
    }
}
