//! Network tag writer.

use crate::compound::Compound;
use crate::error::{LimitKind, TagError, TagResult};
use crate::value::{Tag, TagType};
use crate::varint::{write_vari32, write_vari64, write_varu32};

/// Longest string the network format accepts.
pub const MAX_STRING_LEN: usize = i16::MAX as usize;

/// Writes compounds in the network little-endian varint tag format.
///
/// The root is written as a compound type byte followed by its name (empty
/// for every payload the target protocol sends). Entries follow in insertion
/// order and each compound ends with an [`TagType::End`] byte.
#[derive(Debug, Default)]
pub struct TagWriter {
    bytes: Vec<u8>,
}

impl TagWriter {
    /// Creates a new empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Writes `root` as an unnamed root compound.
    pub fn write_root(&mut self, root: &Compound) -> TagResult<()> {
        self.write_named_root("", root)
    }

    /// Writes `root` as a root compound with the given name.
    pub fn write_named_root(&mut self, name: &str, root: &Compound) -> TagResult<()> {
        self.bytes.push(TagType::Compound.id());
        self.write_string(name)?;
        self.write_compound(root)
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    /// Appends the written bytes to `out`.
    pub fn finish_into(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.bytes);
    }

    fn write_compound(&mut self, compound: &Compound) -> TagResult<()> {
        for (key, value) in compound.iter() {
            self.bytes.push(value.tag_type().id());
            self.write_string(key)?;
            self.write_payload(value)?;
        }
        self.bytes.push(TagType::End.id());
        Ok(())
    }

    fn write_payload(&mut self, value: &Tag) -> TagResult<()> {
        match value {
            Tag::Byte(v) => self.bytes.push(*v as u8),
            Tag::Short(v) => self.bytes.extend_from_slice(&v.to_le_bytes()),
            Tag::Int(v) => write_vari32(&mut self.bytes, *v),
            Tag::Long(v) => write_vari64(&mut self.bytes, *v),
            Tag::Float(v) => self.bytes.extend_from_slice(&v.to_le_bytes()),
            Tag::Double(v) => self.bytes.extend_from_slice(&v.to_le_bytes()),
            Tag::String(v) => self.write_string(v)?,
            Tag::IntArray(values) => {
                let len = i32::try_from(values.len()).map_err(|_| TagError::LimitExceeded {
                    kind: LimitKind::ArrayLength,
                    limit: i32::MAX as usize,
                    actual: values.len(),
                })?;
                write_vari32(&mut self.bytes, len);
                for v in values {
                    write_vari32(&mut self.bytes, *v);
                }
            }
            Tag::Compound(inner) => self.write_compound(inner)?,
        }
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> TagResult<()> {
        if value.len() > MAX_STRING_LEN {
            return Err(TagError::LimitExceeded {
                kind: LimitKind::StringLength,
                limit: MAX_STRING_LEN,
                actual: value.len(),
            });
        }
        write_varu32(&mut self.bytes, value.len() as u32);
        self.bytes.extend_from_slice(value.as_bytes());
        Ok(())
    }
}

/// Encodes `root` as an unnamed network tag.
pub fn encode_network(root: &Compound) -> TagResult<Vec<u8>> {
    let mut writer = TagWriter::with_capacity(64);
    writer.write_root(root)?;
    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_root() {
        let bytes = encode_network(&Compound::new()).unwrap();
        assert_eq!(bytes, vec![0x0A, 0x00, 0x00]);
    }

    #[test]
    fn single_int_zigzag() {
        let root = Compound::builder().put_int("x", -3).build();
        let bytes = encode_network(&root).unwrap();
        // root, empty name, int tag, "x", zigzag(-3) = 5, end
        assert_eq!(bytes, vec![0x0A, 0x00, 0x03, 0x01, b'x', 0x05, 0x00]);
    }

    #[test]
    fn float_little_endian() {
        let root = Compound::builder().put_float("p", 1.0).build();
        let bytes = encode_network(&root).unwrap();
        assert_eq!(
            bytes,
            vec![0x0A, 0x00, 0x05, 0x01, b'p', 0x00, 0x00, 0x80, 0x3F, 0x00]
        );
    }

    #[test]
    fn named_root() {
        let mut writer = TagWriter::new();
        writer
            .write_named_root("ab", &Compound::new())
            .unwrap();
        assert_eq!(writer.finish(), vec![0x0A, 0x02, b'a', b'b', 0x00]);
    }

    #[test]
    fn string_too_long_rejected() {
        let long = "a".repeat(MAX_STRING_LEN + 1);
        let root = Compound::builder().put_string("s", long).build();
        let err = encode_network(&root).unwrap_err();
        assert!(matches!(
            err,
            TagError::LimitExceeded {
                kind: LimitKind::StringLength,
                ..
            }
        ));
    }

    #[test]
    fn finish_into_appends() {
        let mut out = vec![0xFF];
        let mut writer = TagWriter::new();
        writer.write_root(&Compound::new()).unwrap();
        assert_eq!(writer.len(), 3);
        writer.finish_into(&mut out);
        assert_eq!(out, vec![0xFF, 0x0A, 0x00, 0x00]);
    }
}
