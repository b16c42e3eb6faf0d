//! Block registry errors.

use std::fmt;

/// Result type for registry construction.
pub type WorldResult<T> = Result<T, WorldError>;

/// Errors that can occur when building a block registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The table has no blocks.
    EmptyTable,

    /// The first block must be air.
    AirNotFirst { found: String },

    /// Two blocks share an identifier.
    DuplicateIdentifier { identifier: String },

    /// A block has a negative hardness other than the unbreakable marker.
    InvalidHardness { identifier: String },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTable => write!(f, "block table is empty"),
            Self::AirNotFirst { found } => {
                write!(f, "block 0 must be minecraft:air, found {found}")
            }
            Self::DuplicateIdentifier { identifier } => {
                write!(f, "duplicate block identifier: {identifier}")
            }
            Self::InvalidHardness { identifier } => {
                write!(f, "invalid hardness for {identifier}")
            }
        }
    }
}

impl std::error::Error for WorldError {}
