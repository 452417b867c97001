use {
    crate::constants::SLOT_COUNT,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
        io::Error as IoError,
    },
};

/// Errors that can occur while packing or unpacking a slot-offset page.
#[derive(Debug)]
pub enum CodecError {
    /// `encode` was given an array whose length did not match [SLOT_COUNT].
    WrongSlotCount(usize /* actual */),

    /// A bit width read from or requested of the bit-packer was outside the legal `1..=32` range.
    InvalidBitWidth(u32),

    /// A value handed to the bit-packer did not fit in the requested bit width.
    ValueTooWide(u32 /* value */, u32 /* bit_width */),

    /// The presence bitmap in a decoded stream set a bit at or beyond [SLOT_COUNT].
    BitmapIndexOutOfRange(usize),

    /// The stream ended before a length-delimited field could be fully read.
    TruncatedStream(&'static str /* field */),

    /// An I/O failure was reported by the caller's byte sink or byte source.
    Io(IoError),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::WrongSlotCount(actual) => {
                write!(f, "slot offset array has {actual} entries, expected {SLOT_COUNT}")
            }
            Self::InvalidBitWidth(width) => write!(f, "bit width {width} is outside the legal range 1..=32"),
            Self::ValueTooWide(value, width) => write!(f, "value {value} does not fit in {width} bits"),
            Self::BitmapIndexOutOfRange(index) => {
                write!(f, "presence bitmap set bit {index}, but only {SLOT_COUNT} slots exist")
            }
            Self::TruncatedStream(field) => write!(f, "stream ended while reading {field}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IoError> for CodecError {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

/// A type alias for a `Result` with a [CodecError].
pub type CodecResult<T> = Result<T, CodecError>;
