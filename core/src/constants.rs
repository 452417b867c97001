//! Wire-format constants for the slot-offset page codec.
//!
//! These pin the on-disk layout; changing any of them changes the byte-exact format that
//! [crate::codec] reads and writes, not just an in-memory limit.

/// Number of slots on a page. Both encoder and decoder must agree on this value out of band;
/// it is not itself recorded on the wire.
pub const SLOT_COUNT: usize = 1024;

/// Width, in bits, of a presence-bitmap word. The bitmap is serialized as a run of these.
pub const BITMAP_WORD_BITS: usize = 64;

/// Smallest legal bit width for a populated page's packed payload.
pub const MIN_BIT_WIDTH: u32 = 1;

/// Largest legal bit width for a populated page's packed payload.
pub const MAX_BIT_WIDTH: u32 = 32;
