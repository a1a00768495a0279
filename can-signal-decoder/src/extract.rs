//! Byte and bit extraction from frame payloads
//!
//! Both extractors read little-endian and zero-fill anything outside the
//! buffer, so truncated or short frames decode to zero-derived values
//! instead of interrupting a live stream.

use byteorder::{ByteOrder, LittleEndian};

/// Read `length` bytes starting at `offset` as a little-endian unsigned
/// integer.
///
/// Returns 0 when the requested range does not fit entirely inside `data`,
/// when `length` is 0, or when `length` exceeds 8 (a u64 cannot hold more;
/// classic frames never need more). Never indexes out of bounds.
pub fn extract_bytes(data: &[u8], offset: usize, length: usize) -> u64 {
    if length == 0 || length > 8 {
        return 0;
    }
    match offset
        .checked_add(length)
        .and_then(|end| data.get(offset..end))
    {
        Some(bytes) => LittleEndian::read_uint(bytes, length),
        None => 0,
    }
}

/// Extract `bit_length` bits starting at `start_bit`, treating the whole
/// buffer as one little-endian integer.
///
/// Equivalent to `(int_from_le_bytes(data) >> start_bit) & ((1 << bit_length) - 1)`.
/// Bits beyond the end of the buffer read as zero, so the span may legally
/// run past the payload. `bit_length` is capped at 64.
pub fn extract_bits(data: &[u8], start_bit: u32, bit_length: u32) -> u64 {
    let mut result: u64 = 0;

    for i in 0..bit_length.min(64) {
        let bit_pos = start_bit as usize + i as usize;
        let byte_idx = bit_pos / 8;
        let bit_in_byte = bit_pos % 8;

        if byte_idx < data.len() {
            let bit = (data[byte_idx] >> bit_in_byte) & 0x01;
            result |= (bit as u64) << i;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bytes_single() {
        let data = [0xAB, 0xCD, 0xEF, 0x12];
        assert_eq!(extract_bytes(&data, 0, 1), 0xAB);
        assert_eq!(extract_bytes(&data, 2, 1), 0xEF);
    }

    #[test]
    fn test_extract_bytes_little_endian_order() {
        let data = [0x10, 0x27, 0x00, 0x00];
        assert_eq!(extract_bytes(&data, 0, 2), 0x2710);

        let data = [0xAB, 0xCD, 0xEF, 0x12];
        assert_eq!(extract_bytes(&data, 1, 3), 0x12EFCD);
    }

    #[test]
    fn test_extract_bytes_full_width() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        assert_eq!(extract_bytes(&data, 0, 8), 0x0807060504030201);
    }

    #[test]
    fn test_extract_bytes_out_of_range_is_zero() {
        let data = [0xAB, 0xCD];
        assert_eq!(extract_bytes(&data, 1, 2), 0);
        assert_eq!(extract_bytes(&data, 2, 1), 0);
        assert_eq!(extract_bytes(&data, 100, 1), 0);
        assert_eq!(extract_bytes(&data, usize::MAX, 2), 0);
        assert_eq!(extract_bytes(&[], 0, 1), 0);
    }

    #[test]
    fn test_extract_bytes_degenerate_lengths() {
        let data = [0xAB, 0xCD, 0xEF, 0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC];
        assert_eq!(extract_bytes(&data, 0, 0), 0);
        assert_eq!(extract_bytes(&data, 0, 9), 0);
    }

    #[test]
    fn test_extract_bits_within_byte() {
        // Upper nibble of 0xAB
        assert_eq!(extract_bits(&[0xAB], 4, 4), 0xA);
        // Lower nibble
        assert_eq!(extract_bits(&[0xAB], 0, 4), 0xB);
    }

    #[test]
    fn test_extract_bits_cross_byte_boundary() {
        // 0xCDAB as one LE integer; 8 bits starting at bit 4
        let data = [0xAB, 0xCD];
        assert_eq!(extract_bits(&data, 4, 8), 0xDA);
    }

    #[test]
    fn test_extract_bits_matches_shift_mask_law() {
        let data = [0x10, 0x27, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00];
        let as_int = u64::from_le_bytes(data);
        for start in 0..32 {
            for len in 0..24 {
                let expected = (as_int >> start) & ((1u64 << len) - 1);
                assert_eq!(extract_bits(&data, start, len), expected);
            }
        }
    }

    #[test]
    fn test_extract_bits_zero_length() {
        assert_eq!(extract_bits(&[0xFF, 0xFF], 3, 0), 0);
    }

    #[test]
    fn test_extract_bits_past_buffer_reads_zero() {
        // Span runs past the payload: missing bits are zero
        assert_eq!(extract_bits(&[0xFF], 4, 8), 0x0F);
        assert_eq!(extract_bits(&[0xFF], 8, 8), 0);
        assert_eq!(extract_bits(&[], 0, 8), 0);
    }
}
