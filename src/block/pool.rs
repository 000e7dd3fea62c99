//! Per-message value pool and handle packing arithmetic.
//!
//! The pool is an append-only sequence of byte-payload slots addressed by a
//! small `u16` handle. Pushing an absent payload still consumes a slot, so
//! the decode side can tell "field not set" from "field is empty bytes".
//!
//! Handles must fit in 15 bits so that two of them can be packed into one
//! 32-bit entry (key in the upper half, value in the lower half). The same
//! [`POOL_HANDLE_MASK`] is applied to both halves when packing and when
//! unpacking, so a handle at the capacity boundary round-trips exactly.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use rpcwire::block::{pack_entry, unpack_key, unpack_value, ValuePool};
//!
//! let mut pool = ValuePool::new();
//! let key = pool.push(Some(Bytes::from_static(b"trace"))).unwrap();
//! let value = pool.push(Some(Bytes::from_static(b"on"))).unwrap();
//!
//! let entry = pack_entry(key, value);
//! assert_eq!(unpack_key(entry), key);
//! assert_eq!(unpack_value(entry), value);
//! ```

use bytes::Bytes;

use crate::error::{Result, WireError};

/// Maximum number of slots in one pool.
///
/// Power-of-two-minus-one so it doubles as the handle bit mask; every handle
/// fits in 15 bits and never collides with the upper half of a packed entry.
pub const POOL_MAX_SIZE: usize = 0x7FFF;

/// Bit mask applied to each half of a packed entry, symmetrically on pack
/// and unpack.
pub const POOL_HANDLE_MASK: u32 = POOL_MAX_SIZE as u32;

/// Pack a (key, value) handle pair into one 32-bit entry.
///
/// Key goes in the upper 16 bits, value in the lower 16 bits. Both halves
/// are masked with [`POOL_HANDLE_MASK`].
#[inline]
pub fn pack_entry(key: u16, value: u16) -> u32 {
    ((key as u32 & POOL_HANDLE_MASK) << 16) | (value as u32 & POOL_HANDLE_MASK)
}

/// Extract the key handle (upper half) from a packed entry.
#[inline]
pub fn unpack_key(entry: u32) -> u16 {
    ((entry >> 16) & POOL_HANDLE_MASK) as u16
}

/// Extract the value handle (lower half) from a packed entry.
#[inline]
pub fn unpack_value(entry: u32) -> u16 {
    (entry & POOL_HANDLE_MASK) as u16
}

/// Append-only store of byte payloads, addressed by `u16` handle.
///
/// One pool exists per block and lives exactly as long as that block.
/// Slots hold `Option<Bytes>`: `None` records an absent field, which is
/// distinct from a present zero-length payload.
#[derive(Debug, Clone, Default)]
pub struct ValuePool {
    slots: Vec<Option<Bytes>>,
}

impl ValuePool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Append a payload (or an absence marker) and return its handle.
    ///
    /// The capacity guard runs before allocation: pushing when the pool
    /// already holds [`POOL_MAX_SIZE`] slots fails with
    /// [`WireError::PoolOverflow`] and the pool is left unchanged.
    pub fn push(&mut self, payload: Option<Bytes>) -> Result<u16> {
        if self.slots.len() >= POOL_MAX_SIZE {
            return Err(WireError::PoolOverflow {
                capacity: POOL_MAX_SIZE,
            });
        }
        let handle = self.slots.len() as u16;
        self.slots.push(payload);
        Ok(handle)
    }

    /// Read the payload stored at `handle`.
    ///
    /// An out-of-range handle is a protocol violation and fails with
    /// [`WireError::InvalidHandle`]; it never silently yields an empty
    /// payload.
    pub fn read(&self, handle: u16) -> Result<Option<&Bytes>> {
        self.slots
            .get(handle as usize)
            .map(Option::as_ref)
            .ok_or(WireError::InvalidHandle {
                handle,
                len: self.slots.len(),
            })
    }

    /// Number of slots currently in the pool.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool holds no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in handle order, for framing.
    pub(crate) fn slots(&self) -> &[Option<Bytes>] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_returns_sequential_handles() {
        let mut pool = ValuePool::new();

        let a = pool.push(Some(Bytes::from_static(b"a"))).unwrap();
        let b = pool.push(Some(Bytes::from_static(b"b"))).unwrap();
        let c = pool.push(None).unwrap();

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(c, 2);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_read_returns_stored_payload() {
        let mut pool = ValuePool::new();
        let handle = pool.push(Some(Bytes::from_static(b"payload"))).unwrap();

        let read = pool.read(handle).unwrap();
        assert_eq!(read.map(|b| b.as_ref()), Some(&b"payload"[..]));
    }

    #[test]
    fn test_absent_is_distinct_from_empty() {
        let mut pool = ValuePool::new();
        let absent = pool.push(None).unwrap();
        let empty = pool.push(Some(Bytes::new())).unwrap();

        assert_eq!(pool.read(absent).unwrap(), None);
        assert_eq!(pool.read(empty).unwrap().map(|b| b.len()), Some(0));
    }

    #[test]
    fn test_read_out_of_range_fails() {
        let mut pool = ValuePool::new();
        pool.push(Some(Bytes::from_static(b"x"))).unwrap();

        let err = pool.read(7).unwrap_err();
        assert!(matches!(
            err,
            WireError::InvalidHandle { handle: 7, len: 1 }
        ));
    }

    #[test]
    fn test_capacity_boundary() {
        let mut pool = ValuePool::new();

        for _ in 0..POOL_MAX_SIZE {
            pool.push(Some(Bytes::from_static(b"x"))).unwrap();
        }
        assert_eq!(pool.len(), POOL_MAX_SIZE);

        // One past capacity fails and the pool is unchanged.
        let err = pool.push(Some(Bytes::from_static(b"overflow"))).unwrap_err();
        assert!(matches!(err, WireError::PoolOverflow { .. }));
        assert_eq!(pool.len(), POOL_MAX_SIZE);
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        for &(k, v) in &[
            (0u16, 0u16),
            (1, 2),
            (0x00FF, 0x7F00),
            (0x7FFE, 0x7FFE),
            ((POOL_MAX_SIZE - 1) as u16, (POOL_MAX_SIZE - 1) as u16),
        ] {
            let entry = pack_entry(k, v);
            assert_eq!(unpack_key(entry), k, "key for ({k}, {v})");
            assert_eq!(unpack_value(entry), v, "value for ({k}, {v})");
        }
    }

    #[test]
    fn test_pack_layout() {
        // Key in the upper 16 bits, value in the lower 16 bits.
        let entry = pack_entry(0x0102, 0x0304);
        assert_eq!(entry, 0x0102_0304);
    }

    #[test]
    fn test_pack_masks_both_halves() {
        // Bits above the 15-bit mask never leak into the entry.
        let entry = pack_entry(0xFFFF, 0xFFFF);
        assert_eq!(unpack_key(entry), 0x7FFF);
        assert_eq!(unpack_value(entry), 0x7FFF);
    }

    #[test]
    fn test_every_valid_handle_roundtrips() {
        // Exhaustive sweep over the full handle range.
        for h in 0..POOL_MAX_SIZE as u16 {
            let entry = pack_entry(h, h);
            assert_eq!(unpack_key(entry), h);
            assert_eq!(unpack_value(entry), h);
        }
    }
}
