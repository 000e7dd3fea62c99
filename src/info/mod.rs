//! Info module - transport-neutral request/response records.
//!
//! An info record carries the same logical content as a block but with plain
//! strings, byte payloads, and an insertion-ordered option map; nothing is
//! pooled. Info records are built either from a live call/reply or by
//! decoding a block, live for one encode/decode pass, and hold no state
//! across messages.

mod request;
mod response;

pub use request::{Parameter, RequestInfo};
pub use response::ResponseInfo;
