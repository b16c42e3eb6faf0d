//! Error types for message encoding.

use std::fmt;

use tag::TagError;

/// Result type for message encoding.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors that can occur while encoding an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A nested tag payload failed to encode.
    Tag(TagError),

    /// A string field is longer than the protocol allows.
    StringTooLong { len: usize, max: usize },

    /// A length prefix does not fit its field.
    LengthOverflow { length: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(err) => write!(f, "tag payload error: {err}"),
            Self::StringTooLong { len, max } => {
                write!(f, "string too long: {len} bytes, max {max}")
            }
            Self::LengthOverflow { length } => {
                write!(f, "length overflow: {length}")
            }
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tag(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TagError> for EncodeError {
    fn from(err: TagError) -> Self {
        Self::Tag(err)
    }
}
