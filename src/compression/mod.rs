//! Block-oriented integer compression.
//!
//! The only codec in this module is StreamVByte, which encodes groups of
//! four `u32` values behind a single control byte so that a whole group
//! can be decoded with one table-driven byte shuffle.

mod stream_vbyte;

pub use self::stream_vbyte::{decode, decode4, decode_bulk, encode, encode_group};

/// Number of values per StreamVByte group.
pub const GROUP_SIZE: usize = 4;

/// Worst-case encoded size of one group: 1 control byte + 4 × 4 data bytes.
pub const MAX_GROUP_LEN: usize = 17;
