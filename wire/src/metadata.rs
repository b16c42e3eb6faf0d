//! Entity metadata and attributes.

use glam::Vec3;

use crate::flags::EntityFlags;

/// Metadata keys this engine sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MetadataKey {
    Flags = 0,
    BoundingBoxWidth = 53,
    BoundingBoxHeight = 54,
}

impl MetadataKey {
    #[must_use]
    pub const fn id(self) -> u32 {
        self as u32
    }
}

/// A typed metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Float(f32),
    String(String),
    Long(i64),
    Vec3(Vec3),
}

impl MetadataValue {
    /// Returns the wire type id of this value.
    #[must_use]
    pub const fn type_id(&self) -> u32 {
        match self {
            Self::Byte(_) => 0,
            Self::Short(_) => 1,
            Self::Int(_) => 2,
            Self::Float(_) => 3,
            Self::String(_) => 4,
            Self::Long(_) => 7,
            Self::Vec3(_) => 8,
        }
    }
}

/// Ordered entity metadata.
///
/// Setting a key that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMetadata {
    entries: Vec<(MetadataKey, MetadataValue)>,
}

impl EntityMetadata {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets `key` to `value`.
    pub fn set(&mut self, key: MetadataKey, value: MetadataValue) {
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            *slot = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Sets the flags word.
    pub fn set_flags(&mut self, flags: EntityFlags) {
        self.set(MetadataKey::Flags, MetadataValue::Long(flags.raw() as i64));
    }

    /// Sets the bounding box dimensions.
    pub fn set_bounding_box(&mut self, width: f32, height: f32) {
        self.set(MetadataKey::BoundingBoxWidth, MetadataValue::Float(width));
        self.set(MetadataKey::BoundingBoxHeight, MetadataValue::Float(height));
    }

    #[must_use]
    pub fn get(&self, key: MetadataKey) -> Option<&MetadataValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Returns the flags word, if present.
    #[must_use]
    pub fn flags(&self) -> Option<EntityFlags> {
        match self.get(MetadataKey::Flags) {
            Some(MetadataValue::Long(raw)) => Some(EntityFlags::from_raw(*raw as u64)),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetadataKey, &MetadataValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

/// An entity attribute such as health.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub min: f32,
    pub value: f32,
    pub max: f32,
    pub default: f32,
}

impl Attribute {
    /// The health attribute with the given maximum, starting full.
    #[must_use]
    pub fn health(max: f32) -> Self {
        Self {
            name: "minecraft:health".to_owned(),
            min: 0.0,
            value: max,
            max,
            default: max,
        }
    }
}
