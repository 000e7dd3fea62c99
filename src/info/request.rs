//! Transport-neutral request record.

use bytes::Bytes;
use indexmap::IndexMap;

/// One positional parameter: a type tag and the already-serialized value.
///
/// Both halves are optional so that absence survives a block round-trip
/// distinctly from an empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Type tag naming the declared parameter type.
    pub type_tag: Option<String>,
    /// Serialized value bytes, left undecoded until the caller asks.
    pub value: Option<Bytes>,
}

impl Parameter {
    /// Create a parameter with both halves present.
    pub fn new(type_tag: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            type_tag: Some(type_tag.into()),
            value: Some(value.into()),
        }
    }
}

/// Transport-neutral record of an RPC request.
///
/// # Example
///
/// ```
/// use rpcwire::block::VERSION_1;
/// use rpcwire::info::RequestInfo;
///
/// let mut info = RequestInfo::new(VERSION_1);
/// info.service_name = Some("Echo".into());
/// info.target_method = Some("say".into());
/// info.add_option("trace", "on");
///
/// assert_eq!(info.option("trace"), Some("on"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    /// Protocol version tag.
    pub version: u8,
    /// Request ID, unique per in-flight call on the connection. Matching a
    /// response back to its call is the caller's responsibility.
    pub request_id: u64,
    /// Service group name.
    pub service_group: Option<String>,
    /// Service name.
    pub service_name: Option<String>,
    /// Service version string.
    pub service_version: Option<String>,
    /// Name of the method being invoked.
    pub target_method: Option<String>,
    /// Tag selecting the payload coder for parameter bytes.
    pub serialize_type: Option<String>,
    /// Client timeout in milliseconds; carried, never enforced here.
    pub client_timeout: i32,
    /// One-way message flag: `true` means fire-and-forget.
    pub message: bool,
    /// Positional parameters in call order.
    pub parameters: Vec<Parameter>,
    /// Option map, insertion order preserved.
    pub options: IndexMap<String, String>,
}

impl RequestInfo {
    /// Create an empty request info stamped with the given version tag.
    pub fn new(version: u8) -> Self {
        Self {
            version,
            request_id: 0,
            service_group: None,
            service_name: None,
            service_version: None,
            target_method: None,
            serialize_type: None,
            client_timeout: 0,
            message: false,
            parameters: Vec::new(),
            options: IndexMap::new(),
        }
    }

    /// Append a positional parameter.
    pub fn add_parameter(&mut self, type_tag: impl Into<String>, value: impl Into<Bytes>) {
        self.parameters.push(Parameter::new(type_tag, value));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::VERSION_1;

    #[test]
    fn test_new_info_defaults() {
        let info = RequestInfo::new(VERSION_1);

        assert_eq!(info.version, VERSION_1);
        assert_eq!(info.request_id, 0);
        assert!(!info.message);
        assert!(info.parameters.is_empty());
        assert!(info.options.is_empty());
    }

    #[test]
    fn test_parameter_order_preserved() {
        let mut info = RequestInfo::new(VERSION_1);
        info.add_parameter("I", Bytes::from_static(b"1"));
        info.add_parameter("J", Bytes::from_static(b"2"));
        info.add_parameter("Z", Bytes::from_static(b"3"));

        let tags: Vec<_> = info
            .parameters
            .iter()
            .map(|p| p.type_tag.as_deref().unwrap())
            .collect();
        assert_eq!(tags, ["I", "J", "Z"]);
    }

    #[test]
    fn test_option_insertion_order() {
        let mut info = RequestInfo::new(VERSION_1);
        info.add_option("zeta", "1");
        info.add_option("alpha", "2");

        let keys: Vec<_> = info.options.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha"]);
        assert_eq!(info.option("alpha"), Some("2"));
        assert_eq!(info.option("missing"), None);
    }
}
