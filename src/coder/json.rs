//! JSON payload coder using `serde_json`.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::PayloadCoder;
use crate::error::Result;

/// JSON coder for structured payloads.
pub struct JsonCoder;

impl JsonCoder {
    /// Encode any serializable value to JSON bytes.
    #[inline]
    pub fn encode_typed<T: Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    /// Decode JSON bytes into a concrete type.
    #[inline]
    pub fn decode_typed<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(data)?)
    }
}

impl PayloadCoder for JsonCoder {
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
    use serde_json::json;

    #[test]
    fn test_value_roundtrip() {
        let value = json!({"name": "Echo", "args": [1, 2.5, null, "x"]});

        let encoded = JsonCoder.encode(&value).unwrap();
        let decoded = JsonCoder.decode(&encoded).unwrap();

        assert_eq!(decoded, value);
    }

    #[test]
    fn test_string_payload() {
        let encoded = JsonCoder.encode(&json!("hi")).unwrap();
        assert_eq!(&encoded[..], b"\"hi\"");
    }

    #[test]
    fn test_decode_error_on_invalid_json() {
        assert!(JsonCoder.decode(b"{not json").is_err());
    }
}
