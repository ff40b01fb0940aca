//! Error types for brevity

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("output buffer too small: capacity of {capacity} bytes exceeded")]
    OutputBufferTooSmall { capacity: usize },

    #[error("truncated stream at bit {bit_pos}")]
    TruncatedStream { bit_pos: usize },

    #[error("invalid code at bit {bit_pos}: {reason}")]
    InvalidCode { bit_pos: usize, reason: &'static str },

    #[error("input too large: {len} bytes exceeds limit of {max}")]
    InputTooLarge { len: usize, max: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Raised when a static code table fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodebookError {
    #[error("codebook {name} is empty")]
    Empty { name: &'static str },

    #[error("codebook {name}: entry {index} has invalid length {len}")]
    InvalidLength {
        name: &'static str,
        index: usize,
        len: u32,
    },

    #[error("codebook {name}: entry {shorter} is a prefix of entry {longer}")]
    NotPrefixFree {
        name: &'static str,
        shorter: usize,
        longer: usize,
    },
}
