//! Bit-Packer: packs an ordered list of non-negative integers at a fixed bit width per value,
//! little-endian bit order within each byte.
//!
//! This is the leaf component [crate::codec] builds on. It has no notion of slots, presence,
//! or pages — just a dense run of fixed-width values.

use {
    crate::{
        constants::MAX_BIT_WIDTH,
        error::{CodecError, CodecResult},
    },
    std::io::{Read, Write},
};

/// Number of bytes needed to hold `count` values of `bit_width` bits each.
pub fn packed_byte_len(count: usize, bit_width: u32) -> usize {
    (count * bit_width as usize).div_ceil(8)
}

/// Packs `values` into `sink`, `bit_width` bits per value, little-endian bit order.
///
/// The first value's low bit is bit 0 of the first byte; a value that straddles a byte boundary
/// contributes its high bits to the following byte(s). Writes exactly
/// `ceil(values.len() * bit_width / 8)` bytes.
///
/// # Errors
/// Returns [CodecError::InvalidBitWidth] if `bit_width` is not in `1..=32`, or
/// [CodecError::ValueTooWide] if some value does not fit in `bit_width` bits.
pub fn pack<W: Write>(sink: &mut W, values: &[u32], bit_width: u32) -> CodecResult<()> {
    if bit_width < 1 || bit_width > MAX_BIT_WIDTH {
        return Err(CodecError::InvalidBitWidth(bit_width));
    }

    let mask = crate::bits::mask_for(bit_width);
    let mut buf = vec![0u8; packed_byte_len(values.len(), bit_width)];

    for (i, &value) in values.iter().enumerate() {
        if value & !mask != 0 {
            return Err(CodecError::ValueTooWide(value, bit_width));
        }

        let bit_pos = i * bit_width as usize;
        let byte_pos = bit_pos / 8;
        let bit_offset = bit_pos % 8;

        // Widen into a 64-bit accumulator: at bit_offset=7 and bit_width=32 the value can touch
        // up to 5 bytes, which a u64 always has room for.
        let accumulator = (value as u64) << bit_offset;
        let bytes = accumulator.to_le_bytes();
        let bytes_needed = (bit_offset + bit_width as usize).div_ceil(8);
        for (j, &b) in bytes.iter().take(bytes_needed).enumerate() {
            buf[byte_pos + j] |= b;
        }
    }

    sink.write_all(&buf)?;
    Ok(())
}

/// Inverse of [pack]. Reads exactly `ceil(count * bit_width / 8)` bytes from `source` and
/// returns `count` unpacked values.
///
/// # Errors
/// Returns [CodecError::InvalidBitWidth] if `bit_width` is not in `1..=32`, or
/// [CodecError::TruncatedStream] if `source` does not yield enough bytes.
pub fn unpack<R: Read>(source: &mut R, count: usize, bit_width: u32) -> CodecResult<Vec<u32>> {
    if bit_width < 1 || bit_width > MAX_BIT_WIDTH {
        return Err(CodecError::InvalidBitWidth(bit_width));
    }

    let total_bytes = packed_byte_len(count, bit_width);
    let mut buf = vec![0u8; total_bytes];
    source.read_exact(&mut buf).map_err(|_| CodecError::TruncatedStream("packed payload"))?;

    let mask = crate::bits::mask_for(bit_width) as u64;
    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        let bit_pos = i * bit_width as usize;
        let byte_pos = bit_pos / 8;
        let bit_offset = bit_pos % 8;

        let mut window = [0u8; 8];
        let available = buf.len() - byte_pos;
        let to_copy = available.min(8);
        window[..to_copy].copy_from_slice(&buf[byte_pos..byte_pos + to_copy]);

        let word = u64::from_le_bytes(window);
        let value = (word >> bit_offset) & mask;
        values.push(value as u32);
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq, rand::{Rng, SeedableRng}, rand::rngs::StdRng, test_log::test};

    #[test]
    fn empty_input_writes_nothing() {
        let mut buf = Vec::new();
        pack(&mut buf, &[], 7).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn one_bit_width_packs_eight_per_byte() {
        let values: Vec<u32> = vec![1, 0, 1, 1, 0, 0, 0, 1];
        let mut buf = Vec::new();
        pack(&mut buf, &values, 1).unwrap();
        assert_eq!(buf, vec![0b1000_1101]);

        let mut cursor = &buf[..];
        let unpacked = unpack(&mut cursor, values.len(), 1).unwrap();
        assert_eq!(unpacked, values);
    }

    #[test]
    fn two_adjacent_values_two_bits() {
        let mut buf = Vec::new();
        pack(&mut buf, &[1, 2], 2).unwrap();
        assert_eq!(buf, vec![0b0000_1001]);
    }

    #[test]
    fn thirty_two_bit_width_does_not_overflow_the_mask() {
        let values = vec![0, 1, u32::MAX, 0x8000_0000];
        let mut buf = Vec::new();
        pack(&mut buf, &values, 32).unwrap();
        assert_eq!(buf.len(), 16);

        let mut cursor = &buf[..];
        let unpacked = unpack(&mut cursor, values.len(), 32).unwrap();
        assert_eq!(unpacked, values);
    }

    #[test]
    fn rejects_bit_width_out_of_range() {
        let mut buf = Vec::new();
        assert!(matches!(pack(&mut buf, &[0], 0), Err(CodecError::InvalidBitWidth(0))));
        assert!(matches!(pack(&mut buf, &[0], 33), Err(CodecError::InvalidBitWidth(33))));
    }

    #[test]
    fn rejects_values_too_wide_for_bit_width() {
        let mut buf = Vec::new();
        assert!(matches!(pack(&mut buf, &[4], 2), Err(CodecError::ValueTooWide(4, 2))));
    }

    #[test]
    fn truncated_source_is_a_fatal_decode_error() {
        let mut buf = Vec::new();
        pack(&mut buf, &[5, 6, 7], 4).unwrap();
        buf.pop();
        let mut cursor = &buf[..];
        assert!(matches!(unpack(&mut cursor, 3, 4), Err(CodecError::TruncatedStream(_))));
    }

    #[test]
    fn byte_count_matches_the_ceiling_formula() {
        for bit_width in 1..=32u32 {
            for count in [0usize, 1, 7, 8, 9, 63, 1024] {
                let expected = (count * bit_width as usize).div_ceil(8);
                assert_eq!(packed_byte_len(count, bit_width), expected);
            }
        }
    }

    #[test]
    fn round_trips_random_sequences_at_every_bit_width() {
        let mut rng = StdRng::seed_from_u64(0xB17_0ACC);
        for bit_width in 1..=32u32 {
            let mask = crate::bits::mask_for(bit_width);
            let values: Vec<u32> = (0..200).map(|_| rng.gen::<u32>() & mask).collect();

            let mut buf = Vec::new();
            pack(&mut buf, &values, bit_width).unwrap();
            assert_eq!(buf.len(), packed_byte_len(values.len(), bit_width));

            let mut cursor = &buf[..];
            let unpacked = unpack(&mut cursor, values.len(), bit_width).unwrap();
            assert_eq!(unpacked, values);
        }
    }
}
