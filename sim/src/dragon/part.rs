//! Hitbox parts of the dragon.

use glam::Vec3;
use world::EntityId;

/// Number of hitbox parts.
pub const PART_COUNT: usize = 8;

/// Number of tail segments.
pub const TAIL_SEGMENTS: usize = 3;

/// The named hitbox parts, in bulk-operation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Head,
    Neck,
    Body,
    LeftWing,
    RightWing,
    Tail(u8),
}

impl PartKind {
    /// Every part in the order used for spawning, position broadcasts and
    /// despawning.
    pub const ALL: [Self; PART_COUNT] = [
        Self::Head,
        Self::Neck,
        Self::Body,
        Self::LeftWing,
        Self::RightWing,
        Self::Tail(0),
        Self::Tail(1),
        Self::Tail(2),
    ];

    /// Bounding box `(width, height)`.
    #[must_use]
    pub const fn dimensions(self) -> (f32, f32) {
        match self {
            Self::Head => (1.0, 1.0),
            Self::Neck => (3.0, 3.0),
            Self::Body => (5.0, 3.0),
            Self::LeftWing | Self::RightWing => (4.0, 2.0),
            Self::Tail(_) => (2.0, 2.0),
        }
    }

    /// Position of this part in [`PartKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Head => 0,
            Self::Neck => 1,
            Self::Body => 2,
            Self::LeftWing => 3,
            Self::RightWing => 4,
            Self::Tail(i) => 5 + i as usize,
        }
    }
}

/// One spawned hitbox part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Part {
    pub kind: PartKind,
    pub id: EntityId,
    /// Absolute position last broadcast for this part.
    pub position: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_order() {
        for (idx, kind) in PartKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), idx);
        }
    }

    #[test]
    fn dimensions_table() {
        assert_eq!(PartKind::Head.dimensions(), (1.0, 1.0));
        assert_eq!(PartKind::Neck.dimensions(), (3.0, 3.0));
        assert_eq!(PartKind::Body.dimensions(), (5.0, 3.0));
        assert_eq!(PartKind::LeftWing.dimensions(), (4.0, 2.0));
        assert_eq!(PartKind::Tail(2).dimensions(), (2.0, 2.0));
    }

    #[test]
    fn tail_count_matches() {
        let tails = PartKind::ALL
            .iter()
            .filter(|k| matches!(k, PartKind::Tail(_)))
            .count();
        assert_eq!(tails, TAIL_SEGMENTS);
    }
}
