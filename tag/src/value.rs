//! Typed tag values.

use std::fmt;

use crate::compound::Compound;
use crate::error::{TagError, TagResult};

/// Tag type identifiers as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    String = 8,
    Compound = 10,
    IntArray = 11,
}

impl TagType {
    /// Parses a tag type from its wire byte.
    pub fn parse(id: u8) -> TagResult<Self> {
        match id {
            0 => Ok(Self::End),
            1 => Ok(Self::Byte),
            2 => Ok(Self::Short),
            3 => Ok(Self::Int),
            4 => Ok(Self::Long),
            5 => Ok(Self::Float),
            6 => Ok(Self::Double),
            8 => Ok(Self::String),
            10 => Ok(Self::Compound),
            11 => Ok(Self::IntArray),
            _ => Err(TagError::UnknownTagType { id }),
        }
    }

    /// Returns the wire byte for this type.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// A single typed tag value.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    IntArray(Vec<i32>),
    Compound(Compound),
}

impl Tag {
    /// Returns the wire type of this value.
    #[must_use]
    pub const fn tag_type(&self) -> TagType {
        match self {
            Self::Byte(_) => TagType::Byte,
            Self::Short(_) => TagType::Short,
            Self::Int(_) => TagType::Int,
            Self::Long(_) => TagType::Long,
            Self::Float(_) => TagType::Float,
            Self::Double(_) => TagType::Double,
            Self::String(_) => TagType::String,
            Self::IntArray(_) => TagType::IntArray,
            Self::Compound(_) => TagType::Compound,
        }
    }
}

impl From<Compound> for Tag {
    fn from(value: Compound) -> Self {
        Self::Compound(value)
    }
}

impl From<bool> for Tag {
    fn from(value: bool) -> Self {
        Self::Byte(i8::from(value))
    }
}

impl From<i32> for Tag {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for Tag {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte(v) => write!(f, "{v}b"),
            Self::Short(v) => write!(f, "{v}s"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}L"),
            Self::Float(v) => write!(f, "{v:?}f"),
            Self::Double(v) => write!(f, "{v:?}d"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::IntArray(values) => {
                write!(f, "[I;")?;
                for (idx, v) in values.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Self::Compound(compound) => write!(f, "{compound}"),
        }
    }
}
