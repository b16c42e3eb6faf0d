//! LEB128 varints and zig-zag signed varints.
//!
//! The network tag format and most message fields encode integers this way.
//! Writers append to a `Vec<u8>`; readers take a slice and return the decoded
//! value together with the number of bytes consumed.

use crate::error::{TagError, TagResult};

const MAX_VARU32_BYTES: usize = 5;
const MAX_VARU64_BYTES: usize = 10;

/// Writes an unsigned 32-bit varint.
pub fn write_varu32(buf: &mut Vec<u8>, mut value: u32) {
    loop {
        if value & !0x7F == 0 {
            buf.push(value as u8);
            return;
        }
        buf.push((value & 0x7F | 0x80) as u8);
        value >>= 7;
    }
}

/// Writes an unsigned 64-bit varint.
pub fn write_varu64(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        if value & !0x7F == 0 {
            buf.push(value as u8);
            return;
        }
        buf.push((value & 0x7F | 0x80) as u8);
        value >>= 7;
    }
}

/// Writes a zig-zag encoded signed 32-bit varint.
pub fn write_vari32(buf: &mut Vec<u8>, value: i32) {
    write_varu32(buf, ((value << 1) ^ (value >> 31)) as u32);
}

/// Writes a zig-zag encoded signed 64-bit varint.
pub fn write_vari64(buf: &mut Vec<u8>, value: i64) {
    write_varu64(buf, ((value << 1) ^ (value >> 63)) as u64);
}

/// Reads an unsigned 32-bit varint, returning `(value, bytes_read)`.
pub fn read_varu32(data: &[u8]) -> TagResult<(u32, usize)> {
    let (value, len) = read_varint(data, MAX_VARU32_BYTES)?;
    let value = u32::try_from(value).map_err(|_| TagError::InvalidVarint)?;
    Ok((value, len))
}

/// Reads an unsigned 64-bit varint, returning `(value, bytes_read)`.
pub fn read_varu64(data: &[u8]) -> TagResult<(u64, usize)> {
    read_varint(data, MAX_VARU64_BYTES)
}

/// Reads a zig-zag encoded signed 32-bit varint.
pub fn read_vari32(data: &[u8]) -> TagResult<(i32, usize)> {
    let (raw, len) = read_varu32(data)?;
    Ok((((raw >> 1) as i32) ^ -((raw & 1) as i32), len))
}

/// Reads a zig-zag encoded signed 64-bit varint.
pub fn read_vari64(data: &[u8]) -> TagResult<(i64, usize)> {
    let (raw, len) = read_varu64(data)?;
    Ok((((raw >> 1) as i64) ^ -((raw & 1) as i64), len))
}

fn read_varint(data: &[u8], max_bytes: usize) -> TagResult<(u64, usize)> {
    let mut value = 0u64;
    for (idx, byte) in data.iter().take(max_bytes).enumerate() {
        value |= u64::from(byte & 0x7F) << (7 * idx);
        if byte & 0x80 == 0 {
            return Ok((value, idx + 1));
        }
    }
    if data.len() < max_bytes {
        return Err(TagError::UnexpectedEof {
            requested: data.len() + 1,
            available: data.len(),
        });
    }
    Err(TagError::InvalidVarint)
}
