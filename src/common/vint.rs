//! VByte encoding for integers.
//!
//! Integers are encoded 7 bits per byte, least-significant group first,
//! with the high bit of every byte except the last set as a continuation
//! flag. Small values therefore use fewer bytes:
//!
//! - `[0, 127]` → 1 byte
//! - `[128, 16383]` → 2 bytes
//! - `[16384, 2097151]` → 3 bytes
//!
//! Signed values are zig-zag mapped first, so that integers of small
//! magnitude stay short regardless of sign.

use error::{ErrorKind, Result};

/// Maximum number of bytes of an encoded `u32`.
pub const MAX_U32_VINT_LEN: usize = 5;

/// Maximum number of bytes of an encoded `u64`.
pub const MAX_U64_VINT_LEN: usize = 10;

/// Encodes a `u32`, returning the number of bytes written (1 to 5).
pub fn encode_u32(value: u32, output: &mut [u8]) -> usize {
    let mut value = value;
    let mut num_bytes = 0;
    while value >= 0x80 {
        output[num_bytes] = (value & 0x7F) as u8 | 0x80;
        value >>= 7;
        num_bytes += 1;
    }
    output[num_bytes] = value as u8;
    num_bytes + 1
}

/// Encodes a `u64`, returning the number of bytes written (1 to 10).
pub fn encode_u64(value: u64, output: &mut [u8]) -> usize {
    let mut value = value;
    let mut num_bytes = 0;
    while value >= 0x80 {
        output[num_bytes] = (value & 0x7F) as u8 | 0x80;
        value >>= 7;
        num_bytes += 1;
    }
    output[num_bytes] = value as u8;
    num_bytes + 1
}

/// Encodes an `i32` after zig-zag mapping.
pub fn encode_i32(value: i32, output: &mut [u8]) -> usize {
    let zigzag = ((value << 1) ^ (value >> 31)) as u32;
    encode_u32(zigzag, output)
}

/// Encodes an `i64` after zig-zag mapping.
pub fn encode_i64(value: i64, output: &mut [u8]) -> usize {
    let zigzag = ((value << 1) ^ (value >> 63)) as u64;
    encode_u64(zigzag, output)
}

/// Decodes a `u32`, returning `(value, bytes consumed)`.
///
/// Fails with `CorruptEncoding` if the input is truncated or if the
/// encoding runs past 5 bytes.
pub fn decode_u32(input: &[u8]) -> Result<(u32, usize)> {
    let mut value = 0u32;
    let mut shift = 0u32;
    for num_bytes in 0..MAX_U32_VINT_LEN {
        let byte = *input
            .get(num_bytes)
            .ok_or_else(|| ErrorKind::CorruptEncoding("truncated varint".to_string()))?;
        value |= u32::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, num_bytes + 1));
        }
        shift += 7;
    }
    Err(ErrorKind::CorruptEncoding("overlong u32 varint".to_string()).into())
}

/// Decodes a `u64`, returning `(value, bytes consumed)`.
///
/// Fails with `CorruptEncoding` if the input is truncated or if the
/// encoding runs past 10 bytes.
pub fn decode_u64(input: &[u8]) -> Result<(u64, usize)> {
    let mut value = 0u64;
    let mut shift = 0u32;
    for num_bytes in 0..MAX_U64_VINT_LEN {
        let byte = *input
            .get(num_bytes)
            .ok_or_else(|| ErrorKind::CorruptEncoding("truncated varint".to_string()))?;
        value |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, num_bytes + 1));
        }
        shift += 7;
    }
    Err(ErrorKind::CorruptEncoding("overlong u64 varint".to_string()).into())
}

/// Decodes a zig-zag encoded `i32`.
pub fn decode_i32(input: &[u8]) -> Result<(i32, usize)> {
    let (zigzag, num_bytes) = decode_u32(input)?;
    let value = (zigzag >> 1) as i32 ^ -((zigzag & 1) as i32);
    Ok((value, num_bytes))
}

/// Decodes a zig-zag encoded `i64`.
pub fn decode_i64(input: &[u8]) -> Result<(i64, usize)> {
    let (zigzag, num_bytes) = decode_u64(input)?;
    let value = (zigzag >> 1) as i64 ^ -((zigzag & 1) as i64);
    Ok((value, num_bytes))
}

/// Number of bytes `encode_u32` would write, without encoding.
pub fn encoded_size_u32(value: u32) -> usize {
    let mut value = value;
    let mut num_bytes = 1;
    while value >= 0x80 {
        num_bytes += 1;
        value >>= 7;
    }
    num_bytes
}

/// Number of bytes `encode_u64` would write, without encoding.
pub fn encoded_size_u64(value: u64) -> usize {
    let mut value = value;
    let mut num_bytes = 1;
    while value >= 0x80 {
        num_bytes += 1;
        value >>= 7;
    }
    num_bytes
}
