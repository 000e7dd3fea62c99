//! Wire adapter - bidirectional translation between info and block models.
//!
//! The adapter owns the outbound path (info -> block, with every string and
//! byte payload pushed into the block's value pool) and the inbound path
//! (block -> info, with handles resolved back through the pool). Payload
//! coders are an explicit capability handed in at construction, never a
//! global lookup.
//!
//! Each translation is a pure, synchronous transformation over one message:
//! it allocates a pool scoped to that block and shares nothing, so any
//! number of translations may run concurrently across different messages.
//!
//! # Example
//!
//! ```
//! use rpcwire::block::VERSION_1;
//! use rpcwire::coder::CoderRegistry;
//! use rpcwire::info::RequestInfo;
//! use rpcwire::WireAdapter;
//!
//! let adapter = WireAdapter::new(CoderRegistry::with_defaults());
//!
//! let mut info = RequestInfo::new(VERSION_1);
//! info.request_id = 42;
//! info.service_name = Some("Echo".into());
//!
//! let block = adapter.to_request_block(&info).unwrap();
//! let round = adapter.to_request_info(&block).unwrap();
//! assert_eq!(round, info);
//! ```

use bytes::{Bytes, BytesMut};
use serde_json::Value;

use crate::block::{heads, RequestBlock, ResponseBlock, ValuePool, VERSION_1};
use crate::block::{unpack_key, unpack_value};
use crate::cache;
use crate::call::{RpcCall, RpcReply};
use crate::coder::CoderRegistry;
use crate::error::{Result, WireError};
use crate::framing::{Framing, RequestFraming, ResponseFraming};
use crate::info::{Parameter, RequestInfo, ResponseInfo};

/// Option key carrying a human-readable error message on status responses.
pub const OPTION_MESSAGE: &str = "message";

/// Version-1 wire adapter.
pub struct WireAdapter {
    coders: CoderRegistry,
    request_framing: RequestFraming,
    response_framing: ResponseFraming,
}

impl WireAdapter {
    /// Create an adapter with the given coder registry.
    pub fn new(coders: CoderRegistry) -> Self {
        Self {
            coders,
            request_framing: RequestFraming,
            response_framing: ResponseFraming,
        }
    }

    /// The coder registry this adapter was built with.
    pub fn coders(&self) -> &CoderRegistry {
        &self.coders
    }

    // ---- outbound: live call/reply -> info ----

    /// Build a [`RequestInfo`] from a live call, serializing each argument
    /// with the coder named by the call's serialize-type tag.
    ///
    /// A missing coder fails here, before any pooling work. Zero arguments
    /// produce an empty parameter list.
    pub fn build_request_info(&self, call: &RpcCall) -> Result<RequestInfo> {
        let coder = self
            .coders
            .get(&call.serialize_type)
            .ok_or_else(|| WireError::CoderNotFound(call.serialize_type.clone()))?;

        let mut info = RequestInfo::new(VERSION_1);
        info.request_id = call.request_id;
        info.service_group = Some(call.service_group.clone());
        info.service_name = Some(call.service_name.clone());
        info.service_version = Some(call.service_version.clone());
        info.target_method = Some(call.target_method.clone());
        info.serialize_type = Some(call.serialize_type.clone());
        info.client_timeout = call.client_timeout;
        info.message = call.message;

        for argument in &call.arguments {
            let data = coder.encode(&argument.value)?;
            info.add_parameter(argument.type_tag.clone(), data);
        }
        for (key, value) in &call.options {
            info.add_option(key.clone(), value.clone());
        }
        Ok(info)
    }

    /// Build a [`ResponseInfo`] from a live reply.
    pub fn build_response_info(&self, reply: &RpcReply) -> Result<ResponseInfo> {
        let coder = self
            .coders
            .get(&reply.serialize_type)
            .ok_or_else(|| WireError::CoderNotFound(reply.serialize_type.clone()))?;

        let mut info = ResponseInfo::new(VERSION_1);
        info.request_id = reply.request_id;
        info.status = reply.status;
        info.serialize_type = Some(reply.serialize_type.clone());
        info.return_data = Some(coder.encode(&reply.data)?);
        for (key, value) in &reply.options {
            info.add_option(key.clone(), value.clone());
        }
        Ok(info)
    }

    /// Build a status-only [`ResponseInfo`] directly from a request ID, a
    /// status code, and an optional error message.
    ///
    /// A blank or absent message adds no option; a non-blank one is recorded
    /// once under [`OPTION_MESSAGE`]. No pool is touched here.
    pub fn build_response_status(
        &self,
        request_id: u64,
        status: u16,
        error_message: Option<&str>,
    ) -> ResponseInfo {
        let mut info = ResponseInfo::new(VERSION_1);
        info.request_id = request_id;
        info.status = status;
        if let Some(message) = error_message {
            if !message.trim().is_empty() {
                info.add_option(OPTION_MESSAGE, message);
            }
        }
        info
    }

    // ---- outbound: info -> block ----

    /// Translate a [`RequestInfo`] into a pool-backed [`RequestBlock`].
    pub fn to_request_block(&self, info: &RequestInfo) -> Result<RequestBlock> {
        let head = if info.message {
            heads::MESSAGE_REQUEST
        } else {
            heads::INVOKER_REQUEST
        };
        let mut block = RequestBlock::new(head);
        block.request_id = info.request_id;
        block.service_group = push_string(block.pool_mut(), info.service_group.as_deref())?;
        block.service_name = push_string(block.pool_mut(), info.service_name.as_deref())?;
        block.service_version = push_string(block.pool_mut(), info.service_version.as_deref())?;
        block.target_method = push_string(block.pool_mut(), info.target_method.as_deref())?;
        block.serialize_type = push_string(block.pool_mut(), info.serialize_type.as_deref())?;
        block.client_timeout = info.client_timeout;

        for parameter in &info.parameters {
            let type_handle = push_string(block.pool_mut(), parameter.type_tag.as_deref())?;
            let value_handle = push_bytes(block.pool_mut(), parameter.value.as_ref())?;
            block.add_parameter(type_handle, value_handle);
        }
        for (key, value) in &info.options {
            let key_handle = push_string(block.pool_mut(), Some(key))?;
            let value_handle = push_string(block.pool_mut(), Some(value))?;
            block.add_option(key_handle, value_handle);
        }

        tracing::trace!(
            request_id = info.request_id,
            pool_slots = block.pool().len(),
            "encoded request block"
        );
        Ok(block)
    }

    /// Translate a [`ResponseInfo`] into a pool-backed [`ResponseBlock`].
    pub fn to_response_block(&self, info: &ResponseInfo) -> Result<ResponseBlock> {
        let mut block = ResponseBlock::new();
        block.request_id = info.request_id;
        block.serialize_type = push_string(block.pool_mut(), info.serialize_type.as_deref())?;
        block.return_data = push_bytes(block.pool_mut(), info.return_data.as_ref())?;
        block.status = info.status;

        for (key, value) in &info.options {
            let key_handle = push_string(block.pool_mut(), Some(key))?;
            let value_handle = push_string(block.pool_mut(), Some(value))?;
            block.add_option(key_handle, value_handle);
        }
        Ok(block)
    }

    // ---- inbound: block -> info ----

    /// Translate a [`RequestBlock`] back into a [`RequestInfo`].
    ///
    /// Parameter values stay as undecoded bytes; decode them lazily with
    /// [`WireAdapter::decode_parameters`].
    pub fn to_request_info(&self, block: &RequestBlock) -> Result<RequestInfo> {
        let mut info = RequestInfo::new(VERSION_1);
        info.request_id = block.request_id;
        info.serialize_type = read_string(block.pool(), block.serialize_type)?;
        info.message = match block.head {
            heads::INVOKER_REQUEST => false,
            heads::MESSAGE_REQUEST => true,
            other => return Err(WireError::UnknownHead(other)),
        };

        for &entry in block.options() {
            let (key, value) = read_option(block.pool(), entry)?;
            info.add_option(key, value);
        }

        info.service_group = read_string(block.pool(), block.service_group)?;
        info.service_name = read_string(block.pool(), block.service_name)?;
        info.service_version = read_string(block.pool(), block.service_version)?;
        info.target_method = read_string(block.pool(), block.target_method)?;
        info.client_timeout = block.client_timeout;

        for &entry in block.parameters() {
            let type_tag = read_string(block.pool(), unpack_key(entry))?;
            let value = block.read_data(unpack_value(entry))?.cloned();
            info.parameters.push(Parameter { type_tag, value });
        }
        Ok(info)
    }

    /// Translate a [`ResponseBlock`] back into a [`ResponseInfo`].
    ///
    /// Return bytes stay undecoded; decode them lazily with
    /// [`WireAdapter::decode_return`].
    pub fn to_response_info(&self, block: &ResponseBlock) -> Result<ResponseInfo> {
        if block.head != heads::RESPONSE {
            return Err(WireError::UnknownHead(block.head));
        }

        let mut info = ResponseInfo::new(VERSION_1);
        info.request_id = block.request_id;
        info.serialize_type = read_string(block.pool(), block.serialize_type)?;

        for &entry in block.options() {
            let (key, value) = read_option(block.pool(), entry)?;
            info.add_option(key, value);
        }

        info.status = block.status;
        info.return_data = block.read_data(block.return_data)?.cloned();
        Ok(info)
    }

    // ---- deferred payload decoding ----

    /// Decode every parameter value with the coder named by the info's
    /// serialize-type tag. Absent values decode to `Value::Null`.
    pub fn decode_parameters(&self, info: &RequestInfo) -> Result<Vec<Value>> {
        let tag = info.serialize_type.as_deref().unwrap_or_default();
        let coder = self
            .coders
            .get(tag)
            .ok_or_else(|| WireError::CoderNotFound(tag.to_string()))?;

        let mut values = Vec::with_capacity(info.parameters.len());
        for parameter in &info.parameters {
            match &parameter.value {
                Some(data) => values.push(coder.decode(data)?),
                None => values.push(Value::Null),
            }
        }
        Ok(values)
    }

    /// Decode the return value with the coder named by the info's
    /// serialize-type tag. An absent return decodes to `Value::Null`.
    pub fn decode_return(&self, info: &ResponseInfo) -> Result<Value> {
        let tag = info.serialize_type.as_deref().unwrap_or_default();
        let coder = self
            .coders
            .get(tag)
            .ok_or_else(|| WireError::CoderNotFound(tag.to_string()))?;

        match &info.return_data {
            Some(data) => coder.decode(data),
            None => Ok(Value::Null),
        }
    }

    // ---- framing composition ----

    /// Serialize a request block onto a byte sink.
    pub fn write_request_block(&self, block: &RequestBlock, out: &mut BytesMut) -> Result<()> {
        self.request_framing.encode(block, out)
    }

    /// Deserialize one request frame and translate it straight to info.
    pub fn read_request_info(&self, frame: &mut Bytes) -> Result<RequestInfo> {
        let block = self.request_framing.decode(frame)?;
        tracing::trace!(request_id = block.request_id, "decoded request frame");
        self.to_request_info(&block)
    }

    /// Serialize a response block onto a byte sink.
    pub fn write_response_block(&self, block: &ResponseBlock, out: &mut BytesMut) -> Result<()> {
        self.response_framing.encode(block, out)
    }

    /// Deserialize one response frame and translate it straight to info.
    pub fn read_response_info(&self, frame: &mut Bytes) -> Result<ResponseInfo> {
        let block = self.response_framing.decode(frame)?;
        tracing::trace!(request_id = block.request_id, "decoded response frame");
        self.to_response_info(&block)
    }
}

/// Push a string's UTF-8 encoding into a pool, or an absence marker.
fn push_string(pool: &mut ValuePool, value: Option<&str>) -> Result<u16> {
    pool.push(value.map(cache::interned_bytes))
}

/// Push raw bytes into a pool, or an absence marker.
fn push_bytes(pool: &mut ValuePool, value: Option<&Bytes>) -> Result<u16> {
    pool.push(value.cloned())
}

/// Read a pooled payload back as a string; absent slots stay `None`.
fn read_string(pool: &ValuePool, handle: u16) -> Result<Option<String>> {
    match pool.read(handle)? {
        Some(data) => Ok(Some(cache::interned_string(data)?)),
        None => Ok(None),
    }
}

/// Unpack one option entry and resolve both halves to strings.
///
/// Options are only ever written from present strings, so an absent slot
/// here means the block is corrupt.
fn read_option(pool: &ValuePool, entry: u32) -> Result<(String, String)> {
    let key = read_string(pool, unpack_key(entry))?
        .ok_or_else(|| WireError::Protocol("absent option key in packed entry".to_string()))?;
    let value = read_string(pool, unpack_value(entry))?
        .ok_or_else(|| WireError::Protocol("absent option value in packed entry".to_string()))?;
    Ok((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;

    use crate::call::Argument;

    fn adapter() -> WireAdapter {
        WireAdapter::new(CoderRegistry::with_defaults())
    }

    fn sample_call() -> RpcCall {
        let mut options = IndexMap::new();
        options.insert("trace".to_string(), "on".to_string());
        RpcCall {
            request_id: 7,
            service_group: "g".to_string(),
            service_name: "Echo".to_string(),
            service_version: "1.0".to_string(),
            target_method: "say".to_string(),
            serialize_type: "json".to_string(),
            client_timeout: 3000,
            message: false,
            arguments: vec![Argument::new("Ljava/lang/String;", json!("hi"))],
            options,
        }
    }

    #[test]
    fn test_build_request_info_serializes_arguments() {
        let info = adapter().build_request_info(&sample_call()).unwrap();

        assert_eq!(info.version, VERSION_1);
        assert_eq!(info.request_id, 7);
        assert_eq!(info.service_name.as_deref(), Some("Echo"));
        assert_eq!(info.parameters.len(), 1);
        assert_eq!(
            info.parameters[0].type_tag.as_deref(),
            Some("Ljava/lang/String;")
        );
        // JSON coder output for the string "hi".
        assert_eq!(
            info.parameters[0].value.as_ref().map(|b| b.as_ref()),
            Some(&b"\"hi\""[..])
        );
        assert_eq!(info.option("trace"), Some("on"));
    }

    #[test]
    fn test_build_request_info_zero_arguments() {
        let mut call = sample_call();
        call.arguments.clear();

        let info = adapter().build_request_info(&call).unwrap();
        assert!(info.parameters.is_empty());
    }

    #[test]
    fn test_build_request_info_missing_coder_fails_first() {
        let mut call = sample_call();
        call.serialize_type = "hessian".to_string();

        let err = adapter().build_request_info(&call).unwrap_err();
        assert!(matches!(err, WireError::CoderNotFound(tag) if tag == "hessian"));
    }

    #[test]
    fn test_build_response_info() {
        let reply = RpcReply {
            request_id: 7,
            status: 200,
            serialize_type: "json".to_string(),
            data: json!({"ok": true}),
            options: IndexMap::new(),
        };

        let info = adapter().build_response_info(&reply).unwrap();
        assert_eq!(info.request_id, 7);
        assert_eq!(info.status, 200);
        assert!(info.return_data.is_some());
        assert!(info.options.is_empty());
    }

    #[test]
    fn test_build_response_status_blank_message() {
        let adapter = adapter();

        let info = adapter.build_response_status(7, 1, Some(""));
        assert_eq!(info.options.len(), 0);

        let info = adapter.build_response_status(7, 1, Some("   "));
        assert_eq!(info.options.len(), 0);

        let info = adapter.build_response_status(7, 1, None);
        assert_eq!(info.options.len(), 0);
    }

    #[test]
    fn test_build_response_status_with_message() {
        let info = adapter().build_response_status(7, 1, Some("timeout"));

        assert_eq!(info.request_id, 7);
        assert_eq!(info.status, 1);
        assert_eq!(info.options.len(), 1);
        assert_eq!(info.option(OPTION_MESSAGE), Some("timeout"));
    }

    #[test]
    fn test_message_flag_selects_head() {
        let adapter = adapter();
        let mut info = RequestInfo::new(VERSION_1);

        info.message = false;
        let block = adapter.to_request_block(&info).unwrap();
        assert_eq!(block.head, heads::INVOKER_REQUEST);

        info.message = true;
        let block = adapter.to_request_block(&info).unwrap();
        assert_eq!(block.head, heads::MESSAGE_REQUEST);
    }

    #[test]
    fn test_unknown_head_rejected() {
        let adapter = adapter();
        let info = RequestInfo::new(VERSION_1);
        let mut block = adapter.to_request_block(&info).unwrap();
        block.head = 0x55;

        let err = adapter.to_request_info(&block).unwrap_err();
        assert!(matches!(err, WireError::UnknownHead(0x55)));
    }

    #[test]
    fn test_response_head_checked() {
        let adapter = adapter();
        let mut block = adapter
            .to_response_block(&ResponseInfo::new(VERSION_1))
            .unwrap();
        block.head = heads::INVOKER_REQUEST;

        let err = adapter.to_response_info(&block).unwrap_err();
        assert!(matches!(err, WireError::UnknownHead(_)));
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let adapter = adapter();
        let mut info = RequestInfo::new(VERSION_1);
        info.service_name = Some("Echo".to_string());
        // group, version, method, serialize type left absent

        let block = adapter.to_request_block(&info).unwrap();
        let round = adapter.to_request_info(&block).unwrap();

        assert_eq!(round.service_group, None);
        assert_eq!(round.service_name.as_deref(), Some("Echo"));
        assert_eq!(round.target_method, None);
    }

    #[test]
    fn test_empty_string_is_not_absent() {
        let adapter = adapter();
        let mut info = RequestInfo::new(VERSION_1);
        info.service_group = Some(String::new());

        let round = adapter
            .to_request_info(&adapter.to_request_block(&info).unwrap())
            .unwrap();
        assert_eq!(round.service_group.as_deref(), Some(""));
    }

    #[test]
    fn test_decode_parameters_lazily() {
        let adapter = adapter();
        let info = adapter.build_request_info(&sample_call()).unwrap();
        let round = adapter
            .to_request_info(&adapter.to_request_block(&info).unwrap())
            .unwrap();

        let values = adapter.decode_parameters(&round).unwrap();
        assert_eq!(values, vec![json!("hi")]);
    }

    #[test]
    fn test_decode_return() {
        let adapter = adapter();
        let reply = RpcReply {
            request_id: 1,
            status: 200,
            serialize_type: "msgpack".to_string(),
            data: json!([1, 2, 3]),
            options: IndexMap::new(),
        };
        let info = adapter.build_response_info(&reply).unwrap();
        let round = adapter
            .to_response_info(&adapter.to_response_block(&info).unwrap())
            .unwrap();

        assert_eq!(adapter.decode_return(&round).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_decode_return_absent_is_null() {
        let adapter = adapter();
        let mut info = ResponseInfo::new(VERSION_1);
        info.serialize_type = Some("json".to_string());

        assert_eq!(adapter.decode_return(&info).unwrap(), Value::Null);
    }
}
