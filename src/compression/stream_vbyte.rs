//! StreamVByte group codec.
//!
//! Four `u32` values are encoded as one control byte followed by 4 to 16
//! data bytes. The control byte packs four 2-bit codes, value 0 in the
//! low bits; code `c` means the value occupies `c + 1` little-endian
//! bytes. Keeping all four lengths in one byte lets the decoder pick a
//! shuffle mask for the whole group in a single table lookup.

use compression::{GROUP_SIZE, MAX_GROUP_LEN};
use error::{ErrorKind, Result};

lazy_static! {
    /// Total data bytes of a group, indexed by control byte.
    static ref GROUP_DATA_LEN: [u8; 256] = {
        let mut table = [0u8; 256];
        for control in 0..256 {
            let mut len = 0u8;
            for i in 0..GROUP_SIZE {
                len += ((control >> (2 * i)) & 0b11) as u8 + 1;
            }
            table[control] = len;
        }
        table
    };

    /// Shuffle masks turning 16 raw input bytes into 4 little-endian
    /// `u32` lanes, indexed by control byte. `0x80` lanes become zero
    /// under `pshufb`; the scalar path interprets them the same way.
    static ref DECODE_SHUFFLE: [[u8; 16]; 256] = {
        let mut table = [[0u8; 16]; 256];
        for control in 0..256 {
            let mut input_offset = 0u8;
            for i in 0..GROUP_SIZE {
                let len = ((control >> (2 * i)) & 0b11) as u8 + 1;
                for j in 0..4u8 {
                    table[control][4 * i + j as usize] = if j < len {
                        input_offset + j
                    } else {
                        0x80
                    };
                }
                input_offset += len;
            }
        }
        table
    };
}

#[cfg(target_arch = "x86_64")]
lazy_static! {
    static ref HAS_SSSE3: bool = is_x86_feature_detected!("ssse3");
}

fn code_of(value: u32) -> u8 {
    if value < 1 << 8 {
        0
    } else if value < 1 << 16 {
        1
    } else if value < 1 << 24 {
        2
    } else {
        3
    }
}

/// Encodes exactly 4 values into `output`, returning the number of bytes
/// written (5 to 17). `output` must hold at least `MAX_GROUP_LEN` bytes.
pub fn encode_group(values: &[u32], output: &mut [u8]) -> usize {
    assert_eq!(values.len(), GROUP_SIZE);
    let mut control = 0u8;
    let mut written = 1;
    for (i, &value) in values.iter().enumerate() {
        let code = code_of(value);
        control |= code << (2 * i);
        let num_bytes = code as usize + 1;
        for j in 0..num_bytes {
            output[written + j] = (value >> (8 * j)) as u8;
        }
        written += num_bytes;
    }
    output[0] = control;
    written
}

/// Encodes an arbitrary number of values, appending to `output` and
/// returning the number of bytes written.
///
/// The encoder always emits complete groups: when `values.len()` is not
/// a multiple of 4, the last group is padded with zeros. The decoder is
/// told how many values to return and discards the padding.
pub fn encode(values: &[u32], output: &mut Vec<u8>) -> usize {
    let mut buffer = [0u8; MAX_GROUP_LEN];
    let mut written = 0;
    for chunk in values.chunks(GROUP_SIZE) {
        let len = if chunk.len() == GROUP_SIZE {
            encode_group(chunk, &mut buffer)
        } else {
            let mut padded = [0u32; GROUP_SIZE];
            padded[..chunk.len()].copy_from_slice(chunk);
            encode_group(&padded, &mut buffer)
        };
        output.extend_from_slice(&buffer[..len]);
        written += len;
    }
    written
}

fn scalar_decode_group(control: u8, data: &[u8], output: &mut [u32]) {
    let shuffle = &DECODE_SHUFFLE[control as usize];
    for i in 0..GROUP_SIZE {
        let mut value = 0u32;
        for j in 0..4 {
            let index = shuffle[4 * i + j];
            if index != 0x80 {
                value |= u32::from(data[index as usize]) << (8 * j);
            }
        }
        output[i] = value;
    }
}

#[cfg(target_arch = "x86_64")]
mod ssse3 {
    use super::DECODE_SHUFFLE;
    use std::arch::x86_64::{__m128i, _mm_loadu_si128, _mm_shuffle_epi8, _mm_storeu_si128};

    /// Decodes one group with a single byte shuffle.
    ///
    /// `data` must hold at least 16 readable bytes; the caller checks
    /// this before taking the fast path.
    #[target_feature(enable = "ssse3")]
    pub unsafe fn decode_group(control: u8, data: &[u8], output: &mut [u32]) {
        debug_assert!(data.len() >= 16);
        debug_assert!(output.len() >= 4);
        let raw = _mm_loadu_si128(data.as_ptr() as *const __m128i);
        let mask = _mm_loadu_si128(DECODE_SHUFFLE[control as usize].as_ptr() as *const __m128i);
        let decoded = _mm_shuffle_epi8(raw, mask);
        _mm_storeu_si128(output.as_mut_ptr() as *mut __m128i, decoded);
    }
}

/// Decodes exactly 4 values from `input` into `output`, returning the
/// number of bytes consumed (control byte included).
pub fn decode4(input: &[u8], output: &mut [u32]) -> Result<usize> {
    assert!(output.len() >= GROUP_SIZE);
    if input.is_empty() {
        return Err(ErrorKind::CorruptEncoding("missing control byte".to_string()).into());
    }
    let control = input[0];
    let data_len = GROUP_DATA_LEN[control as usize] as usize;
    if input.len() < 1 + data_len {
        return Err(ErrorKind::CorruptEncoding("truncated group".to_string()).into());
    }
    scalar_decode_group(control, &input[1..1 + data_len], &mut output[..GROUP_SIZE]);
    Ok(1 + data_len)
}

/// Decodes `count` values (a multiple of 4) from `input` into `output`,
/// returning the number of bytes consumed.
///
/// Takes the SSSE3 shuffle path whenever the CPU supports it and at
/// least 16 input bytes remain past the control byte; the scalar path
/// produces byte-for-byte identical output.
pub fn decode_bulk(input: &[u8], count: usize, output: &mut [u32]) -> Result<usize> {
    assert_eq!(count % GROUP_SIZE, 0);
    assert!(output.len() >= count);
    let mut consumed = 0;
    let mut decoded = 0;
    while decoded < count {
        if consumed >= input.len() {
            return Err(ErrorKind::CorruptEncoding("missing control byte".to_string()).into());
        }
        let control = input[consumed];
        let data_len = GROUP_DATA_LEN[control as usize] as usize;
        let data = &input[consumed + 1..];
        if data.len() < data_len {
            return Err(ErrorKind::CorruptEncoding("truncated group".to_string()).into());
        }
        #[cfg(target_arch = "x86_64")]
        {
            if *HAS_SSSE3 && data.len() >= 16 {
                unsafe {
                    ssse3::decode_group(control, data, &mut output[decoded..decoded + GROUP_SIZE]);
                }
                consumed += 1 + data_len;
                decoded += GROUP_SIZE;
                continue;
            }
        }
        scalar_decode_group(control, &data[..data_len], &mut output[decoded..decoded + GROUP_SIZE]);
        consumed += 1 + data_len;
        decoded += GROUP_SIZE;
    }
    Ok(consumed)
}

/// Decodes an arbitrary number of values, returning the number of bytes
/// consumed. The encoder wrote complete groups, so the zero padding of
/// the last group is read and discarded.
pub fn decode(input: &[u8], count: usize, output: &mut [u32]) -> Result<usize> {
    assert!(output.len() >= count);
    let full = count / GROUP_SIZE * GROUP_SIZE;
    let mut consumed = decode_bulk(input, full, output)?;
    if full < count {
        let mut last_group = [0u32; GROUP_SIZE];
        consumed += decode4(&input[consumed..], &mut last_group)?;
        output[full..count].copy_from_slice(&last_group[..count - full]);
    }
    Ok(consumed)
}

#[cfg(test)]
mod tests {

    use super::*;
    use rand::{thread_rng, Rng};

    fn round_trip(values: &[u32]) {
        let mut encoded: Vec<u8> = Vec::new();
        let written = encode(values, &mut encoded);
        assert_eq!(written, encoded.len());
        let mut decoded = vec![0u32; values.len()];
        let consumed = decode(&encoded, values.len(), &mut decoded).unwrap();
        assert_eq!(consumed, encoded.len());
        assert_eq!(&decoded[..], values);
    }

    #[test]
    fn test_mixed_width_group_uses_ten_bytes() {
        let values = [100u32, 1_000, 100_000, 10_000_000];
        let mut buffer = [0u8; MAX_GROUP_LEN];
        let written = encode_group(&values, &mut buffer);
        assert_eq!(written, 10);
        let mut decoded = [0u32; 4];
        let consumed = decode4(&buffer[..written], &mut decoded).unwrap();
        assert_eq!(consumed, 10);
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_all_zero_group() {
        let values = [0u32; 4];
        let mut buffer = [0u8; MAX_GROUP_LEN];
        let written = encode_group(&values, &mut buffer);
        assert_eq!(written, 5);
        assert_eq!(buffer[0], 0);
        let mut decoded = [0xFFFF_FFFFu32; 4];
        decode4(&buffer[..written], &mut decoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_all_max_group() {
        let values = [u32::max_value(); 4];
        let mut buffer = [0u8; MAX_GROUP_LEN];
        let written = encode_group(&values, &mut buffer);
        assert_eq!(written, 17);
        assert_eq!(buffer[0], 0xFF);
        let mut decoded = [0u32; 4];
        decode4(&buffer[..written], &mut decoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_byte_length_boundaries() {
        round_trip(&[0xFF, 0x100, 0xFFFF, 0x1_0000]);
        round_trip(&[0xFF_FFFF, 0x100_0000, u32::max_value(), 0]);
    }

    #[test]
    fn test_arbitrary_count() {
        for count in 0..23 {
            let values: Vec<u32> = (0..count as u32).map(|i| i * 77 + 13).collect();
            round_trip(&values);
        }
    }

    #[test]
    fn test_bulk_matches_group_at_a_time() {
        let mut rng = thread_rng();
        let values: Vec<u32> = (0..64)
            .map(|_| {
                let width: u32 = rng.gen_range(0, 4);
                rng.gen::<u32>() >> (8 * width)
            })
            .collect();
        let mut encoded: Vec<u8> = Vec::new();
        encode(&values, &mut encoded);

        let mut bulk = vec![0u32; values.len()];
        let bulk_consumed = decode_bulk(&encoded, values.len(), &mut bulk).unwrap();
        assert_eq!(bulk_consumed, encoded.len());
        assert_eq!(&bulk[..], &values[..]);

        let mut one_at_a_time = vec![0u32; values.len()];
        let mut consumed = 0;
        for group in 0..values.len() / 4 {
            consumed +=
                decode4(&encoded[consumed..], &mut one_at_a_time[group * 4..group * 4 + 4]).unwrap();
        }
        assert_eq!(consumed, bulk_consumed);
        assert_eq!(one_at_a_time, bulk);
    }

    #[test]
    fn test_truncated_input() {
        let values = [100u32, 1_000, 100_000, 10_000_000];
        let mut buffer = [0u8; MAX_GROUP_LEN];
        let written = encode_group(&values, &mut buffer);
        let mut decoded = [0u32; 4];
        assert!(decode4(&buffer[..written - 1], &mut decoded).is_err());
        assert!(decode4(&[], &mut decoded).is_err());
        assert!(decode_bulk(&buffer[..written], 8, &mut [0u32; 8]).is_err());
    }

    #[test]
    fn test_random_round_trips() {
        let mut rng = thread_rng();
        for _ in 0..100 {
            let count: usize = rng.gen_range(0, 130);
            let values: Vec<u32> = (0..count)
                .map(|_| {
                    let width: u32 = rng.gen_range(0, 4);
                    rng.gen::<u32>() >> (8 * width)
                })
                .collect();
            round_trip(&values);
        }
    }
}
