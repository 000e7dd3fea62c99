//! Version-1 binary framing.
//!
//! All multi-byte integers are Big Endian. A request frame is laid out as:
//!
//! ```text
//! ┌──────┬────────────┬─────────────────┬──────────┬─────────┬─────────┬──────┐
//! │ Head │ Request ID │ 5 field handles │ Timeout  │ Params  │ Options │ Pool │
//! │ 1 B  │ 8 B        │ 5 x 2 B         │ 4 B (i32)│ cnt+4B* │ cnt+4B* │ ...  │
//! └──────┴────────────┴─────────────────┴──────────┴─────────┴─────────┴──────┘
//! ```
//!
//! Entry lists are a `u16` count followed by one `u32` packed entry each.
//! The pool is a `u16` slot count followed by one `i32` length prefix per
//! slot (`-1` marks an absent slot) and the raw payload bytes.
//!
//! A response frame replaces the five field handles and timeout with the
//! serialize-type handle, return-data handle, and `u16` status.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::Framing;
use crate::block::{RequestBlock, ResponseBlock, ValuePool, POOL_MAX_SIZE};
use crate::error::{Result, WireError};

/// Absent pool slot marker in the length prefix.
const ABSENT_SLOT: i32 = -1;

/// Version-1 framing for request blocks.
pub struct RequestFraming;

/// Version-1 framing for response blocks.
pub struct ResponseFraming;

impl Framing<RequestBlock> for RequestFraming {
    fn encode(&self, block: &RequestBlock, out: &mut BytesMut) -> Result<()> {
        out.put_u8(block.head);
        out.put_u64(block.request_id);
        out.put_u16(block.service_group);
        out.put_u16(block.service_name);
        out.put_u16(block.service_version);
        out.put_u16(block.target_method);
        out.put_u16(block.serialize_type);
        out.put_i32(block.client_timeout);
        encode_entries(block.parameters(), out)?;
        encode_entries(block.options(), out)?;
        encode_pool(block.pool(), out)
    }

    fn decode(&self, src: &mut Bytes) -> Result<RequestBlock> {
        need(src, 1 + 8 + 5 * 2 + 4, "request frame header")?;
        let mut block = RequestBlock::new(src.get_u8());
        block.request_id = src.get_u64();
        block.service_group = src.get_u16();
        block.service_name = src.get_u16();
        block.service_version = src.get_u16();
        block.target_method = src.get_u16();
        block.serialize_type = src.get_u16();
        block.client_timeout = src.get_i32();

        for entry in decode_entries(src, "parameter")? {
            block.push_packed_parameter(entry);
        }
        for entry in decode_entries(src, "option")? {
            block.push_packed_option(entry);
        }
        decode_pool(src, block.pool_mut())?;
        Ok(block)
    }
}

impl Framing<ResponseBlock> for ResponseFraming {
    fn encode(&self, block: &ResponseBlock, out: &mut BytesMut) -> Result<()> {
        out.put_u8(block.head);
        out.put_u64(block.request_id);
        out.put_u16(block.serialize_type);
        out.put_u16(block.return_data);
        out.put_u16(block.status);
        encode_entries(block.options(), out)?;
        encode_pool(block.pool(), out)
    }

    fn decode(&self, src: &mut Bytes) -> Result<ResponseBlock> {
        need(src, 1 + 8 + 3 * 2, "response frame header")?;
        let mut block = ResponseBlock::new();
        block.head = src.get_u8();
        block.request_id = src.get_u64();
        block.serialize_type = src.get_u16();
        block.return_data = src.get_u16();
        block.status = src.get_u16();

        for entry in decode_entries(src, "option")? {
            block.push_packed_option(entry);
        }
        decode_pool(src, block.pool_mut())?;
        Ok(block)
    }
}

fn need(src: &Bytes, n: usize, what: &str) -> Result<()> {
    if src.remaining() < n {
        return Err(WireError::Protocol(format!(
            "truncated frame: {} more bytes needed for {what}",
            n - src.remaining()
        )));
    }
    Ok(())
}

fn encode_entries(entries: &[u32], out: &mut BytesMut) -> Result<()> {
    if entries.len() > u16::MAX as usize {
        return Err(WireError::Protocol(format!(
            "{} packed entries exceed the frame entry limit",
            entries.len()
        )));
    }
    out.put_u16(entries.len() as u16);
    for &entry in entries {
        out.put_u32(entry);
    }
    Ok(())
}

fn decode_entries(src: &mut Bytes, what: &str) -> Result<Vec<u32>> {
    need(src, 2, "entry count")?;
    let count = src.get_u16() as usize;
    need(src, count * 4, what)?;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(src.get_u32());
    }
    Ok(entries)
}

fn encode_pool(pool: &ValuePool, out: &mut BytesMut) -> Result<()> {
    // Pool capacity guarantees the count fits u16.
    out.put_u16(pool.len() as u16);
    for slot in pool.slots() {
        match slot {
            Some(data) => {
                if data.len() > i32::MAX as usize {
                    return Err(WireError::Protocol(
                        "pool payload exceeds frame length limit".to_string(),
                    ));
                }
                out.put_i32(data.len() as i32);
                out.put_slice(data);
            }
            None => out.put_i32(ABSENT_SLOT),
        }
    }
    Ok(())
}

fn decode_pool(src: &mut Bytes, pool: &mut ValuePool) -> Result<()> {
    need(src, 2, "pool slot count")?;
    let count = src.get_u16() as usize;
    if count > POOL_MAX_SIZE {
        return Err(WireError::Protocol(format!(
            "pool slot count {count} exceeds capacity {POOL_MAX_SIZE}"
        )));
    }
    for _ in 0..count {
        need(src, 4, "pool slot length")?;
        let len = src.get_i32();
        if len < ABSENT_SLOT {
            return Err(WireError::Protocol(format!(
                "invalid pool slot length {len}"
            )));
        }
        if len == ABSENT_SLOT {
            pool.push(None)?;
        } else {
            let len = len as usize;
            need(src, len, "pool slot payload")?;
            // Zero-copy slice out of the frame buffer.
            pool.push(Some(src.split_to(len)))?;
        }
    }
    Ok(())
}
