//! Outbound messages of the mimic behavior engine.
//!
//! This crate describes the messages the engine emits toward the target
//! protocol client, their fixed byte layouts, and the fire-and-forget sink
//! they are sent through. It knows nothing about why a message is sent.
//!
//! # Design Principles
//!
//! - **Stable layouts** - Each message has one fixed field order; see [`encode_message`].
//! - **Fire and forget** - [`MessageSink::send`] never blocks and never reports delivery.
//! - **No domain knowledge** - Pistons and dragons live in higher layers.

mod encode;
mod error;
mod flags;
mod message;
mod metadata;
mod sink;

pub use encode::{encode_message, encode_to_vec, MAX_STRING_BYTES};
pub use error::{EncodeError, EncodeResult};
pub use flags::{EntityFlag, EntityFlags, UpdateBlockFlags};
pub use message::{
    AddEntity, BlockEntityData, EntityEvent, EntityEventKind, LevelEvent, LevelEventKind, Message,
    MessageKind, MoveEntityAbsolute, PlaySound, RemoveEntity, SetEntityData, SpawnParticleEffect,
    UpdateBlock,
};
pub use metadata::{Attribute, EntityMetadata, MetadataKey, MetadataValue};
pub use sink::{MessageSink, RecordingSink};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = RecordingSink::new();
        let _ = EntityMetadata::new();
        let _ = UpdateBlockFlags::neighbors_network();
        let _ = MessageKind::ALL;
        let _: EncodeResult<()> = Ok(());
    }

    #[test]
    fn every_message_encodes_with_its_id() {
        use glam::{IVec3, Vec3};

        let messages: Vec<Message> = vec![
            RemoveEntity { unique_id: 1 }.into(),
            EntityEvent {
                runtime_id: 1,
                kind: EntityEventKind::EnderDragonDeath,
                data: 0,
            }
            .into(),
            UpdateBlock {
                position: IVec3::ZERO,
                runtime_id: 0,
                data_layer: 0,
                flags: UpdateBlockFlags::neighbors_network(),
            }
            .into(),
            SpawnParticleEffect {
                dimension_id: 2,
                identifier: "minecraft:huge_explosion_emitter".to_owned(),
                position: Vec3::ONE,
            }
            .into(),
            SetEntityData {
                runtime_id: 1,
                metadata: EntityMetadata::new(),
            }
            .into(),
        ];
        for msg in &messages {
            let bytes = encode_to_vec(msg).unwrap();
            let (id, _) = tag::varint::read_varu32(&bytes).unwrap();
            assert_eq!(MessageKind::from_id(id), Some(msg.kind()));
        }
    }
}
