//! # rpcwire
//!
//! Version-1 wire adapter for a pooled binary RPC protocol.
//!
//! The crate converts between two representations of an RPC message:
//!
//! - **Info** ([`info::RequestInfo`] / [`info::ResponseInfo`]): transport
//!   neutral, plain strings and byte payloads.
//! - **Block** ([`block::RequestBlock`] / [`block::ResponseBlock`]): compact
//!   and pool-indexed, where every variable-length payload lives once in a
//!   per-message value pool and is referenced by a 15-bit handle. Repeated
//!   fields pack two handles into one 32-bit entry.
//!
//! The [`WireAdapter`] translates in both directions, builds info records
//! from live calls via pluggable [`coder::PayloadCoder`]s, and composes with
//! the [`framing`] codec to reach the byte stream.
//!
//! ## Example
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
//! info.target_method = Some("say".into());
//! info.add_option("trace", "on");
//!
//! let block = adapter.to_request_block(&info).unwrap();
//! let round = adapter.to_request_info(&block).unwrap();
//! assert_eq!(round, info);
//! ```

pub mod adapter;
pub mod block;
pub mod cache;
pub mod call;
pub mod coder;
pub mod error;
pub mod framing;
pub mod info;

pub use adapter::WireAdapter;
pub use error::{Result, WireError};
