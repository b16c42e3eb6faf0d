//! Bounded network tag reader.

use crate::compound::Compound;
use crate::error::{LimitKind, TagError, TagResult};
use crate::limits::TagLimits;
use crate::value::{Tag, TagType};
use crate::varint::{read_vari32, read_vari64, read_varu32};

/// Reads network-format tags from a byte slice.
///
/// All reads are bounds-checked against the input and against
/// [`TagLimits`]. The reader never panics on malformed input.
#[derive(Debug)]
pub struct TagReader<'a> {
    data: &'a [u8],
    pos: usize,
    limits: &'a TagLimits,
}

impl<'a> TagReader<'a> {
    /// Creates a reader over `data`.
    #[must_use]
    pub const fn new(data: &'a [u8], limits: &'a TagLimits) -> Self {
        Self {
            data,
            pos: 0,
            limits,
        }
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Reads a root compound and returns it with its name.
    pub fn read_root(&mut self) -> TagResult<(String, Compound)> {
        let id = self.read_u8()?;
        if id != TagType::Compound.id() {
            return Err(TagError::InvalidRootType { id });
        }
        let name = self.read_string()?;
        let compound = self.read_compound(1)?;
        Ok((name, compound))
    }

    fn read_compound(&mut self, depth: usize) -> TagResult<Compound> {
        if depth > self.limits.max_depth {
            return Err(TagError::LimitExceeded {
                kind: LimitKind::Depth,
                limit: self.limits.max_depth,
                actual: depth,
            });
        }
        let mut compound = Compound::new();
        loop {
            let tag_type = TagType::parse(self.read_u8()?)?;
            if tag_type == TagType::End {
                return Ok(compound);
            }
            if compound.len() >= self.limits.max_compound_entries {
                return Err(TagError::LimitExceeded {
                    kind: LimitKind::CompoundEntries,
                    limit: self.limits.max_compound_entries,
                    actual: compound.len() + 1,
                });
            }
            let key = self.read_string()?;
            let value = self.read_payload(tag_type, depth)?;
            compound.insert(key, value);
        }
    }

    fn read_payload(&mut self, tag_type: TagType, depth: usize) -> TagResult<Tag> {
        let value = match tag_type {
            TagType::Byte => Tag::Byte(self.read_u8()? as i8),
            TagType::Short => Tag::Short(i16::from_le_bytes(self.read_array::<2>()?)),
            TagType::Int => Tag::Int(self.read_vari32()?),
            TagType::Long => {
                let (value, len) = read_vari64(&self.data[self.pos..])?;
                self.pos += len;
                Tag::Long(value)
            }
            TagType::Float => Tag::Float(f32::from_le_bytes(self.read_array::<4>()?)),
            TagType::Double => Tag::Double(f64::from_le_bytes(self.read_array::<8>()?)),
            TagType::String => Tag::String(self.read_string()?),
            TagType::IntArray => {
                let len = self.read_vari32()?;
                let len = usize::try_from(len).map_err(|_| TagError::NegativeLength { len })?;
                if len > self.limits.max_array_len {
                    return Err(TagError::LimitExceeded {
                        kind: LimitKind::ArrayLength,
                        limit: self.limits.max_array_len,
                        actual: len,
                    });
                }
                // Every element takes at least one byte.
                let mut values = Vec::with_capacity(len.min(self.remaining()));
                for _ in 0..len {
                    values.push(self.read_vari32()?);
                }
                Tag::IntArray(values)
            }
            TagType::Compound => Tag::Compound(self.read_compound(depth + 1)?),
            TagType::End => return Err(TagError::UnknownTagType { id: 0 }),
        };
        Ok(value)
    }

    fn read_string(&mut self) -> TagResult<String> {
        let (len, read) = read_varu32(&self.data[self.pos..])?;
        self.pos += read;
        let len = len as usize;
        if len > self.limits.max_string_len {
            return Err(TagError::LimitExceeded {
                kind: LimitKind::StringLength,
                limit: self.limits.max_string_len,
                actual: len,
            });
        }
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| TagError::InvalidUtf8)
    }

    fn read_vari32(&mut self) -> TagResult<i32> {
        let (value, len) = read_vari32(&self.data[self.pos..])?;
        self.pos += len;
        Ok(value)
    }

    fn read_u8(&mut self) -> TagResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_array<const N: usize>(&mut self) -> TagResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    fn read_bytes(&mut self, len: usize) -> TagResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(TagError::UnexpectedEof {
                requested: len,
                available: self.remaining(),
            });
        }
        let data: &'a [u8] = self.data;
        let bytes = &data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}

/// Decodes a complete network tag, rejecting trailing bytes.
///
/// The root name is discarded; payloads sent by the target protocol always
/// use an empty one.
pub fn decode_network(data: &[u8], limits: &TagLimits) -> TagResult<Compound> {
    let mut reader = TagReader::new(data, limits);
    let (_, root) = reader.read_root()?;
    if reader.remaining() > 0 {
        return Err(TagError::TrailingBytes {
            remaining: reader.remaining(),
        });
    }
    Ok(root)
}
