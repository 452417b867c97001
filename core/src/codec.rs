//! Slot-Offset Codec: encodes a fixed-size array of slot offsets (`-1` for empty, `>= 0` for a
//! populated byte offset) into the presence-bitmap-plus-packed-payload wire format, and decodes
//! it back.
//!
//! This is the component the surrounding page layer actually calls; [crate::bitmap] and
//! [crate::packed] are its building blocks.

use {
    crate::{
        bitmap::{read_bitmap, write_bitmap},
        bits::bits_required,
        constants::SLOT_COUNT,
        error::{CodecError, CodecResult},
        packed::{pack, unpack},
    },
    log::error,
    std::{
        cell::RefCell,
        io::{Read, Write},
    },
};

thread_local! {
    // Worst case is every slot populated: SLOT_COUNT entries in the offset scratch, SLOT_COUNT
    // indices in the presence scratch. Cleared (not just truncated) on entry so one encode call
    // never observes another's leftovers.
    static OFFSET_SCRATCH: RefCell<Vec<u32>> = const { RefCell::new(Vec::new()) };
    static PRESENCE_SCRATCH: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Encodes `slot_offsets` to `sink`.
///
/// # Errors
/// Returns [CodecError::WrongSlotCount] if `slot_offsets.len() != `[SLOT_COUNT], or an
/// [CodecError::Io] if `sink` reports a write failure.
pub fn encode<W: Write>(sink: &mut W, slot_offsets: &[i32]) -> CodecResult<()> {
    if slot_offsets.len() != SLOT_COUNT {
        return Err(CodecError::WrongSlotCount(slot_offsets.len()));
    }

    PRESENCE_SCRATCH.with(|presence_cell| {
        OFFSET_SCRATCH.with(|offsets_cell| {
            let mut presence = presence_cell.borrow_mut();
            let mut offsets = offsets_cell.borrow_mut();
            presence.clear();
            offsets.clear();

            let mut max_offset: u32 = 0;
            for (index, &value) in slot_offsets.iter().enumerate() {
                if value >= 0 {
                    let offset = value as u32;
                    presence.push(index);
                    offsets.push(offset);
                    max_offset = max_offset.max(offset);
                }
            }

            write_bitmap(sink, &presence)?;

            if offsets.is_empty() {
                return Ok(());
            }

            let bit_width = bits_required(max_offset);
            sink.write_all(&[bit_width as u8])?;
            pack(sink, &offsets, bit_width)
        })
    })
}

/// Decodes a slot-offset array from `source`, returning a freshly allocated length-[SLOT_COUNT]
/// array of offsets with `-1` in every unpopulated slot.
///
/// # Errors
/// Returns [CodecError::TruncatedStream] on a short read, [CodecError::InvalidBitWidth] if the
/// bit-width byte is outside `1..=32`, or [CodecError::BitmapIndexOutOfRange] if the bitmap sets
/// a bit at or beyond [SLOT_COUNT]. A failed decode never returns a partial array.
pub fn decode<R: Read>(source: &mut R) -> CodecResult<Vec<i32>> {
    let populated = read_bitmap(source).map_err(|err| {
        error!("failed to read slot presence bitmap: {err}");
        err
    })?;

    let mut slot_offsets = vec![-1i32; SLOT_COUNT];
    if populated.is_empty() {
        return Ok(slot_offsets);
    }

    let mut width_buf = [0u8; 1];
    source.read_exact(&mut width_buf).map_err(|_| CodecError::TruncatedStream("bit width"))?;
    let bit_width = width_buf[0] as u32;
    if bit_width < 1 || bit_width > 32 {
        error!("decoded bit width {bit_width} outside the legal range 1..=32");
        return Err(CodecError::InvalidBitWidth(bit_width));
    }

    let values = unpack(source, populated.len(), bit_width).map_err(|err| {
        error!("failed to read packed slot offsets: {err}");
        err
    })?;

    for (slot_index, value) in populated.into_iter().zip(values) {
        slot_offsets[slot_index] = value as i32;
    }

    Ok(slot_offsets)
}
