//! Live call/reply records - the layer above the info model.
//!
//! An [`RpcCall`] or [`RpcReply`] describes a call the application is about
//! to make (or has just answered) with application values still unserialized.
//! [`crate::WireAdapter::build_request_info`] and
//! [`crate::WireAdapter::build_response_info`] turn them into info records by
//! running each value through the payload coder named by `serialize_type`.

use indexmap::IndexMap;
use serde_json::Value;

/// One positional argument: the declared type tag and the application value.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Type tag of the declared parameter type.
    pub type_tag: String,
    /// Application value, serialized by the call's payload coder.
    pub value: Value,
}

impl Argument {
    /// Create an argument.
    pub fn new(type_tag: impl Into<String>, value: Value) -> Self {
        Self {
            type_tag: type_tag.into(),
            value,
        }
    }
}

/// An outbound RPC call before serialization.
#[derive(Debug, Clone)]
pub struct RpcCall {
    /// Request ID, unique per in-flight call on the connection.
    pub request_id: u64,
    /// Service group the target service is bound under.
    pub service_group: String,
    /// Service name.
    pub service_name: String,
    /// Service version string.
    pub service_version: String,
    /// Name of the method to invoke.
    pub target_method: String,
    /// Serialize-type tag selecting the payload coder.
    pub serialize_type: String,
    /// Client timeout in milliseconds.
    pub client_timeout: i32,
    /// One-way message flag: `true` means no response is expected.
    pub message: bool,
    /// Positional arguments in call order. Zero arguments is valid.
    pub arguments: Vec<Argument>,
    /// Options to carry with the request, insertion order preserved.
    pub options: IndexMap<String, String>,
}

/// An outbound RPC reply before serialization.
#[derive(Debug, Clone)]
pub struct RpcReply {
    /// Request ID of the call being answered.
    pub request_id: u64,
    /// Status code of the reply.
    pub status: u16,
    /// Serialize-type tag selecting the payload coder.
    pub serialize_type: String,
    /// Return value, serialized by the reply's payload coder.
    pub data: Value,
    /// Options to carry with the response.
    pub options: IndexMap<String, String>,
}
