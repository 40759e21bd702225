use std::fmt;

use thiserror::Error;

/// Structural failures. Any of these aborts the block being decoded and
/// nothing else; offsets are absolute positions in the input buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("tag truncated at offset {offset}")]
    TagTruncated { offset: usize },

    #[error("tag number at offset {offset} does not fit in 32 bits")]
    TagOverflow { offset: usize },

    #[error("length truncated at offset {offset}")]
    LengthTruncated { offset: usize },

    #[error("length at offset {offset} uses {octets} octets, more than supported")]
    LengthOverflow { offset: usize, octets: usize },

    #[error("value truncated at offset {offset}: need {needed} bytes, {available} available")]
    ValueTruncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("nesting deeper than {limit} levels at offset {offset}")]
    DepthExceeded { offset: usize, limit: usize },

    #[error("diameter header truncated at offset {offset}: {available} bytes available")]
    HeaderTruncated { offset: usize, available: usize },

    #[error("invalid diameter header at offset {offset}: {fault}")]
    HeaderInvalid { offset: usize, fault: HeaderFault },

    #[error("diameter message at offset {offset} truncated: need {needed} bytes, {available} available")]
    MessageTruncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("avp header truncated at offset {offset}")]
    AvpTruncated { offset: usize },

    #[error("avp at offset {offset} declares invalid length {length}")]
    AvpLengthInvalid { offset: usize, length: usize },

    #[error("avp {code} at offset {offset} has rejected flags {flags:#04x}")]
    AvpFlagsRejected { offset: usize, code: u32, flags: u8 },
}

impl DecodeError {
    /// Absolute offset of the fault.
    pub fn offset(&self) -> usize {
        match *self {
            DecodeError::TagTruncated { offset }
            | DecodeError::TagOverflow { offset }
            | DecodeError::LengthTruncated { offset }
            | DecodeError::LengthOverflow { offset, .. }
            | DecodeError::ValueTruncated { offset, .. }
            | DecodeError::DepthExceeded { offset, .. }
            | DecodeError::HeaderTruncated { offset, .. }
            | DecodeError::HeaderInvalid { offset, .. }
            | DecodeError::MessageTruncated { offset, .. }
            | DecodeError::AvpTruncated { offset }
            | DecodeError::AvpLengthInvalid { offset, .. }
            | DecodeError::AvpFlagsRejected { offset, .. } => offset,
        }
    }
}

/// Which Diameter header check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFault {
    Version(u8),
    CommandCode(u32),
    ReservedFlags(u8),
    MessageLength(u32),
}

impl fmt::Display for HeaderFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderFault::Version(v) => write!(f, "version {} (must be 1)", v),
            HeaderFault::CommandCode(c) => {
                write!(f, "command code {} (expected 271 for accounting)", c)
            }
            HeaderFault::ReservedFlags(b) => write!(f, "reserved command flag bits set: {:#04x}", b),
            HeaderFault::MessageLength(l) => write!(f, "message length {} below header size", l),
        }
    }
}

/// Rejection of a single primitive value. Never aborts a block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("expected {expected} bytes, got {actual}")]
    Size { expected: usize, actual: usize },

    #[error("expected {min}..={max} bytes, got {actual}")]
    SizeRange {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: u32 },

    #[error("non-utf8 payload")]
    NonUtf8,

    #[error("non-ascii payload")]
    NonAscii,

    #[error("unknown enumeration value {0}")]
    UnknownEnum(u64),
}

/// A block that could not be decoded, kept alongside the successful records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFailure {
    /// Start of the block in the input buffer.
    pub offset: usize,
    pub error: DecodeError,
}

impl fmt::Display for BlockFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block at offset {}: {}", self.offset, self.error)
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
