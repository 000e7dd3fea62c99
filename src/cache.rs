//! String/byte intern cache.
//!
//! Avoids re-encoding identical UTF-8 strings (service names, type tags,
//! option keys show up on nearly every message). Uses thread-local storage
//! so there is no locking on the hot path and no shared mutable state; a
//! cache miss only costs one extra allocation, correctness never depends on
//! a hit.
//!
//! The cache is bounded: once [`MAX_CACHE_ENTRIES`] distinct strings have
//! been seen on a thread, further misses are encoded without being retained.

use std::cell::RefCell;
use std::collections::HashMap;

use bytes::Bytes;

use crate::error::Result;

/// Per-direction cap on retained entries per thread.
pub const MAX_CACHE_ENTRIES: usize = 4096;

thread_local! {
    static STRING_TO_BYTES: RefCell<HashMap<String, Bytes>> = RefCell::new(HashMap::new());
    static BYTES_TO_STRING: RefCell<HashMap<Vec<u8>, String>> = RefCell::new(HashMap::new());
}

/// UTF-8 encode a string, reusing a cached `Bytes` when the same string was
/// seen before on this thread.
pub fn interned_bytes(s: &str) -> Bytes {
    STRING_TO_BYTES.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(bytes) = cache.get(s) {
            return bytes.clone();
        }
        let bytes = Bytes::copy_from_slice(s.as_bytes());
        if cache.len() < MAX_CACHE_ENTRIES {
            cache.insert(s.to_owned(), bytes.clone());
        }
        bytes
    })
}

/// Decode UTF-8 bytes to a string, reusing a cached decoding when the same
/// bytes were seen before on this thread.
///
/// Invalid UTF-8 is a decode error, never replaced with a lossy string.
pub fn interned_string(data: &[u8]) -> Result<String> {
    BYTES_TO_STRING.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(s) = cache.get(data) {
            return Ok(s.clone());
        }
        let s = String::from_utf8(data.to_vec())?;
        if cache.len() < MAX_CACHE_ENTRIES {
            cache.insert(data.to_vec(), s.clone());
        }
        Ok(s)
    })
}
