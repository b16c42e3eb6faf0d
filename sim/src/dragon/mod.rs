//! Multi-part dragon controller.
//!
//! A dragon owns eight invisible hitbox entities. Their poses lag behind the
//! dragon through a [`SegmentHistory`](crate::SegmentHistory) of its recent
//! yaw and height, which makes the neck and tail trail through turns and
//! climbs.

mod controller;
pub mod effects;
mod part;
pub mod phase;
mod pose;

pub use controller::{
    DragonEvent, DragonSpawn, EnderDragon, DRAGON_IDENTIFIER, MAX_HEALTH, PART_IDENTIFIER,
};
pub use part::{Part, PartKind, PART_COUNT, TAIL_SEGMENTS};
pub use pose::{part_offsets, BASE_LOOKBACK, PITCH_LOOKBACK, TAIL_LOOKBACK};
