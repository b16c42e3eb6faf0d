//! Error types for tag encoding and decoding.

use std::fmt;

/// Result type for tag operations.
pub type TagResult<T> = Result<T, TagError>;

/// Errors that can occur while encoding or decoding binary tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// A varint ran past its maximum encoded length.
    InvalidVarint,

    /// Tag type byte is not one this codec understands.
    UnknownTagType { id: u8 },

    /// The root of a tag stream must be a compound.
    InvalidRootType { id: u8 },

    /// A length prefix decoded to a negative value.
    NegativeLength { len: i32 },

    /// A configured limit was exceeded.
    LimitExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// String bytes were not valid UTF-8.
    InvalidUtf8,

    /// Bytes remained after the root compound was fully read.
    TrailingBytes { remaining: usize },
}

/// Specific tag limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Depth,
    StringLength,
    ArrayLength,
    CompoundEntries,
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::InvalidVarint => write!(f, "invalid varint"),
            Self::UnknownTagType { id } => write!(f, "unknown tag type: 0x{id:02X}"),
            Self::InvalidRootType { id } => {
                write!(f, "root tag must be a compound, found type 0x{id:02X}")
            }
            Self::NegativeLength { len } => write!(f, "negative length prefix: {len}"),
            Self::LimitExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::InvalidUtf8 => write!(f, "string is not valid UTF-8"),
            Self::TrailingBytes { remaining } => {
                write!(f, "{remaining} trailing bytes after root compound")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Depth => "nesting depth",
            Self::StringLength => "string length",
            Self::ArrayLength => "array length",
            Self::CompoundEntries => "compound entries",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for TagError {}
