//! Outbound message kinds.

use glam::{IVec3, Vec3};
use tag::Compound;

use crate::flags::UpdateBlockFlags;
use crate::metadata::{Attribute, EntityMetadata};

/// Packet ids of the messages this engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageKind {
    AddEntity = 0x0D,
    RemoveEntity = 0x0E,
    MoveEntityAbsolute = 0x12,
    UpdateBlock = 0x15,
    LevelEvent = 0x19,
    EntityEvent = 0x1B,
    SetEntityData = 0x27,
    BlockEntityData = 0x38,
    PlaySound = 0x56,
    SpawnParticleEffect = 0x76,
}

impl MessageKind {
    /// All kinds, in packet id order.
    pub const ALL: [Self; 10] = [
        Self::AddEntity,
        Self::RemoveEntity,
        Self::MoveEntityAbsolute,
        Self::UpdateBlock,
        Self::LevelEvent,
        Self::EntityEvent,
        Self::SetEntityData,
        Self::BlockEntityData,
        Self::PlaySound,
        Self::SpawnParticleEffect,
    ];

    /// Returns the packet id.
    #[must_use]
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Parses a kind from its packet id.
    #[must_use]
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Returns a short snake-case name for logs and tool output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AddEntity => "add_entity",
            Self::RemoveEntity => "remove_entity",
            Self::MoveEntityAbsolute => "move_entity_absolute",
            Self::UpdateBlock => "update_block",
            Self::LevelEvent => "level_event",
            Self::EntityEvent => "entity_event",
            Self::SetEntityData => "set_entity_data",
            Self::BlockEntityData => "block_entity_data",
            Self::PlaySound => "play_sound",
            Self::SpawnParticleEffect => "spawn_particle_effect",
        }
    }
}

/// Entity event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityEventKind {
    EnderDragonDeath = 37,
    DragonFlaming = 68,
}

impl EntityEventKind {
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// Level event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelEventKind {
    ParticleExplosion,
    ParticleDragonsBreath,
}

impl LevelEventKind {
    /// Level events at or above this value spawn the particle whose id is
    /// in the low bits.
    pub const PARTICLE_BASE: i32 = 0x4000;

    const DRAGON_BREATH_PARTICLE: i32 = 30;

    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::ParticleExplosion => 2025,
            Self::ParticleDragonsBreath => Self::PARTICLE_BASE | Self::DRAGON_BREATH_PARTICLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddEntity {
    pub unique_id: i64,
    pub runtime_id: u64,
    pub identifier: String,
    pub position: Vec3,
    pub motion: Vec3,
    /// Pitch, yaw and head yaw in degrees.
    pub rotation: Vec3,
    pub attributes: Vec<Attribute>,
    pub metadata: EntityMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveEntity {
    pub unique_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEntityAbsolute {
    pub runtime_id: u64,
    pub position: Vec3,
    /// Pitch, yaw and head yaw in degrees.
    pub rotation: Vec3,
    pub on_ground: bool,
    pub teleported: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityEvent {
    pub runtime_id: u64,
    pub kind: EntityEventKind,
    pub data: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateBlock {
    pub position: IVec3,
    pub runtime_id: u32,
    pub data_layer: u32,
    pub flags: UpdateBlockFlags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockEntityData {
    pub position: IVec3,
    pub data: Compound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaySound {
    pub sound: String,
    pub position: Vec3,
    pub volume: f32,
    pub pitch: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelEvent {
    pub kind: LevelEventKind,
    pub position: Vec3,
    pub data: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnParticleEffect {
    pub dimension_id: u8,
    pub identifier: String,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetEntityData {
    pub runtime_id: u64,
    pub metadata: EntityMetadata,
}

/// A single outbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    AddEntity(AddEntity),
    RemoveEntity(RemoveEntity),
    MoveEntityAbsolute(MoveEntityAbsolute),
    EntityEvent(EntityEvent),
    UpdateBlock(UpdateBlock),
    BlockEntityData(BlockEntityData),
    PlaySound(PlaySound),
    LevelEvent(LevelEvent),
    SpawnParticleEffect(SpawnParticleEffect),
    SetEntityData(SetEntityData),
}

impl Message {
    /// Returns the kind of this message.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::AddEntity(_) => MessageKind::AddEntity,
            Self::RemoveEntity(_) => MessageKind::RemoveEntity,
            Self::MoveEntityAbsolute(_) => MessageKind::MoveEntityAbsolute,
            Self::EntityEvent(_) => MessageKind::EntityEvent,
            Self::UpdateBlock(_) => MessageKind::UpdateBlock,
            Self::BlockEntityData(_) => MessageKind::BlockEntityData,
            Self::PlaySound(_) => MessageKind::PlaySound,
            Self::LevelEvent(_) => MessageKind::LevelEvent,
            Self::SpawnParticleEffect(_) => MessageKind::SpawnParticleEffect,
            Self::SetEntityData(_) => MessageKind::SetEntityData,
        }
    }
}

macro_rules! impl_from_message {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Message {
                fn from(msg: $variant) -> Self {
                    Self::$variant(msg)
                }
            }
        )*
    };
}

impl_from_message!(
    AddEntity,
    RemoveEntity,
    MoveEntityAbsolute,
    EntityEvent,
    UpdateBlock,
    BlockEntityData,
    PlaySound,
    LevelEvent,
    SpawnParticleEffect,
    SetEntityData,
);
