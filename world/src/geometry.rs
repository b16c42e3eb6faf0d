//! Block positions, axis directions and dimensions.

use glam::{IVec3, Vec3};

/// Integer position of a block in the grid.
pub type BlockPos = IVec3;

/// One of the six axis-aligned directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    /// Every direction in neighbor scan order: +x, +y, +z, -x, -y, -z.
    pub const ALL: [Self; 6] = [
        Self::East,
        Self::Up,
        Self::South,
        Self::West,
        Self::Down,
        Self::North,
    ];

    /// Returns the unit offset of this direction.
    #[must_use]
    pub const fn offset(self) -> IVec3 {
        match self {
            Self::Down => IVec3::new(0, -1, 0),
            Self::Up => IVec3::new(0, 1, 0),
            Self::North => IVec3::new(0, 0, -1),
            Self::South => IVec3::new(0, 0, 1),
            Self::West => IVec3::new(-1, 0, 0),
            Self::East => IVec3::new(1, 0, 0),
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }
}

/// Horizontal unit vector for a yaw angle in degrees: `(sin a, 0, cos a)`.
#[must_use]
pub fn direction_deg(yaw: f32) -> Vec3 {
    let (sin, cos) = yaw.to_radians().sin_cos();
    Vec3::new(sin, 0.0, cos)
}

/// World dimension, used by dimension-scoped particle messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Dimension {
    #[default]
    Overworld,
    Nether,
    End,
}

impl Dimension {
    /// Returns the target protocol's id for this dimension.
    #[must_use]
    pub const fn bedrock_id(self) -> u8 {
        match self {
            Self::Overworld => 0,
            Self::Nether => 1,
            Self::End => 2,
        }
    }
}
