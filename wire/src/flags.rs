//! Entity flag bits and block update flags.

/// Individual entity flags and their bit index in the flags word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityFlag {
    OnFire = 0,
    Sneaking = 1,
    Invisible = 5,
    NoAi = 16,
    Silent = 17,
    Sitting = 24,
    FireImmune = 49,
}

impl EntityFlag {
    /// Returns the bit index of this flag.
    #[must_use]
    pub const fn bit(self) -> u8 {
        self as u8
    }
}

/// The entity flags word sent in entity metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EntityFlags(u64);

impl EntityFlags {
    /// Creates flags from a raw value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw flag bits.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns `true` if `flag` is set.
    #[must_use]
    pub const fn contains(self, flag: EntityFlag) -> bool {
        self.0 & (1 << flag.bit()) != 0
    }

    /// Sets or clears `flag`.
    pub fn set(&mut self, flag: EntityFlag, value: bool) {
        if value {
            self.0 |= 1 << flag.bit();
        } else {
            self.0 &= !(1 << flag.bit());
        }
    }

    /// Returns these flags with `flag` set.
    #[must_use]
    pub const fn with(self, flag: EntityFlag) -> Self {
        Self(self.0 | (1 << flag.bit()))
    }
}

impl FromIterator<EntityFlag> for EntityFlags {
    fn from_iter<I: IntoIterator<Item = EntityFlag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), Self::with)
    }
}

/// Propagation flags of a block update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UpdateBlockFlags(u32);

impl UpdateBlockFlags {
    /// Notify neighboring blocks.
    pub const NEIGHBORS: u32 = 1 << 0;

    /// Send the update over the network.
    pub const NETWORK: u32 = 1 << 1;

    /// Skip rendering the change.
    pub const NO_GRAPHIC: u32 = 1 << 2;

    /// Render the change with priority.
    pub const PRIORITY: u32 = 1 << 3;

    /// Creates flags from a raw value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw flag bits.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The flags every piston-driven block update carries.
    #[must_use]
    pub const fn neighbors_network() -> Self {
        Self(Self::NEIGHBORS | Self::NETWORK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear() {
        let mut flags = EntityFlags::default();
        flags.set(EntityFlag::Sitting, true);
        assert!(flags.contains(EntityFlag::Sitting));
        assert_eq!(flags.raw(), 1 << 24);
        flags.set(EntityFlag::Sitting, false);
        assert!(!flags.contains(EntityFlag::Sitting));
        assert_eq!(flags.raw(), 0);
    }

    #[test]
    fn high_bits_fit() {
        let flags = EntityFlags::default().with(EntityFlag::FireImmune);
        assert_eq!(flags.raw(), 1u64 << 49);
    }

    #[test]
    fn collect_flags() {
        let flags: EntityFlags = [EntityFlag::Invisible, EntityFlag::FireImmune]
            .into_iter()
            .collect();
        assert!(flags.contains(EntityFlag::Invisible));
        assert!(flags.contains(EntityFlag::FireImmune));
        assert!(!flags.contains(EntityFlag::Silent));
    }

    #[test]
    fn neighbors_network_value() {
        assert_eq!(UpdateBlockFlags::neighbors_network().raw(), 0b11);
    }
}
