//! Presence bitmap: which slots on a page are populated.
//!
//! Wire format: a 32-bit signed big-endian word count `W`, followed by `W` 64-bit
//! little-endian words. Bit `b` of word `w` means slot `64*w + b` is populated. This is a
//! pre-existing wire quirk — the count is big-endian, the words are little-endian — and both
//! must be preserved exactly.

use {
    crate::{
        constants::{BITMAP_WORD_BITS, SLOT_COUNT},
        error::{CodecError, CodecResult},
    },
    bitvec::prelude::{BitVec, Lsb0},
    std::io::{Read, Write},
};

/// Writes the presence bitmap for `populated` (ascending slot indices) to `sink`.
///
/// Emits the minimum number of words covering the highest set bit, per the wire format's
/// convention that encoders never write trailing all-zero words.
pub fn write_bitmap<W: Write>(sink: &mut W, populated: &[usize]) -> CodecResult<()> {
    let mut bits: BitVec<u64, Lsb0> = BitVec::repeat(false, SLOT_COUNT);
    for &index in populated {
        bits.set(index, true);
    }

    let highest = populated.iter().copied().max();
    let word_count = match highest {
        Some(index) => index / BITMAP_WORD_BITS + 1,
        None => 0,
    };

    sink.write_all(&(word_count as i32).to_be_bytes())?;
    let words = bits.as_raw_slice();
    for word in &words[..word_count] {
        sink.write_all(&word.to_le_bytes())?;
    }

    Ok(())
}

/// Reads a presence bitmap from `source`, returning the populated slot indices in ascending order.
///
/// # Errors
/// [CodecError::TruncatedStream] if the word count or any word cannot be fully read, or
/// [CodecError::BitmapIndexOutOfRange] if a set bit falls at or beyond [SLOT_COUNT] — a
/// conforming encoder never emits one, so this always indicates a corrupt or foreign stream.
pub fn read_bitmap<R: Read>(source: &mut R) -> CodecResult<Vec<usize>> {
    let mut count_buf = [0u8; 4];
    source.read_exact(&mut count_buf).map_err(|_| CodecError::TruncatedStream("bitmap word count"))?;
    let word_count = i32::from_be_bytes(count_buf).max(0) as usize;

    let mut bits: BitVec<u64, Lsb0> = BitVec::repeat(false, SLOT_COUNT);
    let capacity_words = SLOT_COUNT.div_ceil(BITMAP_WORD_BITS);

    for w in 0..word_count {
        let mut word_buf = [0u8; 8];
        source.read_exact(&mut word_buf).map_err(|_| CodecError::TruncatedStream("bitmap word"))?;
        let word = u64::from_le_bytes(word_buf);

        if w >= capacity_words {
            if word != 0 {
                let bit = word.trailing_zeros() as usize;
                return Err(CodecError::BitmapIndexOutOfRange(w * BITMAP_WORD_BITS + bit));
            }
            continue;
        }

        for bit in 0..BITMAP_WORD_BITS {
            if word & (1u64 << bit) != 0 {
                let index = w * BITMAP_WORD_BITS + bit;
                if index >= SLOT_COUNT {
                    return Err(CodecError::BitmapIndexOutOfRange(index));
                }
                bits.set(index, true);
            }
        }
    }

    Ok(bits.iter_ones().collect())
}
