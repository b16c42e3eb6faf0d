//! Ordered compound tags and their builder.

use std::fmt;

use crate::value::Tag;

/// An ordered key-value compound.
///
/// Entries keep their insertion order, which is also the order they are
/// encoded in. Clients of the target protocol compare some payloads
/// field-by-field in order, so the order is part of the value: two compounds
/// with the same entries in a different order are not equal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    entries: Vec<(String, Tag)>,
}

impl Compound {
    /// Creates an empty compound.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Starts building a compound.
    #[must_use]
    pub fn builder() -> CompoundBuilder {
        CompoundBuilder::default()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the compound has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a value.
    ///
    /// Replacing an existing key keeps the key's original position and
    /// returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Tag) -> Option<Tag> {
        let key = key.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn get_byte(&self, key: &str) -> Option<i8> {
        match self.get(key) {
            Some(Tag::Byte(v)) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.get(key) {
            Some(Tag::Int(v)) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.get(key) {
            Some(Tag::Float(v)) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Tag::String(v)) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_int_array(&self, key: &str) -> Option<&[i32]> {
        match self.get(key) {
            Some(Tag::IntArray(v)) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_compound(&self, key: &str) -> Option<&Self> {
        match self.get(key) {
            Some(Tag::Compound(v)) => Some(v),
            _ => None,
        }
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, (key, value)) in self.entries.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{key}:{value}")?;
        }
        write!(f, "}}")
    }
}

impl<K: Into<String>> FromIterator<(K, Tag)> for Compound {
    fn from_iter<I: IntoIterator<Item = (K, Tag)>>(iter: I) -> Self {
        let mut compound = Self::new();
        for (key, value) in iter {
            compound.insert(key, value);
        }
        compound
    }
}

/// Chained builder for [`Compound`].
///
/// ```
/// use tag::Compound;
///
/// let tag = Compound::builder()
///     .put_string("id", "PistonArm")
///     .put_float("Progress", 0.5)
///     .put_bool("Sticky", true)
///     .build();
///
/// assert_eq!(tag.get_string("id"), Some("PistonArm"));
/// assert_eq!(tag.get_byte("Sticky"), Some(1));
/// ```
#[derive(Debug, Default)]
pub struct CompoundBuilder {
    compound: Compound,
}

impl CompoundBuilder {
    #[must_use]
    pub fn put(mut self, key: impl Into<String>, value: Tag) -> Self {
        self.compound.insert(key, value);
        self
    }

    #[must_use]
    pub fn put_byte(self, key: impl Into<String>, value: i8) -> Self {
        self.put(key, Tag::Byte(value))
    }

    /// Stores a boolean as a `0`/`1` byte.
    #[must_use]
    pub fn put_bool(self, key: impl Into<String>, value: bool) -> Self {
        self.put(key, Tag::from(value))
    }

    #[must_use]
    pub fn put_short(self, key: impl Into<String>, value: i16) -> Self {
        self.put(key, Tag::Short(value))
    }

    #[must_use]
    pub fn put_int(self, key: impl Into<String>, value: i32) -> Self {
        self.put(key, Tag::Int(value))
    }

    #[must_use]
    pub fn put_long(self, key: impl Into<String>, value: i64) -> Self {
        self.put(key, Tag::Long(value))
    }

    #[must_use]
    pub fn put_float(self, key: impl Into<String>, value: f32) -> Self {
        self.put(key, Tag::Float(value))
    }

    #[must_use]
    pub fn put_double(self, key: impl Into<String>, value: f64) -> Self {
        self.put(key, Tag::Double(value))
    }

    #[must_use]
    pub fn put_string(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.put(key, Tag::String(value.into()))
    }

    #[must_use]
    pub fn put_int_array(self, key: impl Into<String>, value: impl Into<Vec<i32>>) -> Self {
        self.put(key, Tag::IntArray(value.into()))
    }

    #[must_use]
    pub fn put_compound(self, key: impl Into<String>, value: Compound) -> Self {
        self.put(key, Tag::Compound(value))
    }

    #[must_use]
    pub fn build(self) -> Compound {
        self.compound
    }
}
