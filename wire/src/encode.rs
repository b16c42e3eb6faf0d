//! Byte layout of each outbound message.
//!
//! Every message starts with its packet id as an unsigned varint. Fields
//! follow in declaration order:
//!
//! - integers use the varint forms from [`tag::varint`]
//! - floats are little-endian
//! - strings are an unsigned varint length followed by UTF-8 bytes
//! - block positions are `(vari32 x, varu32 y, vari32 z)`
//! - nested tags use the network tag format

use glam::{IVec3, Vec3};
use tag::varint::{write_vari32, write_vari64, write_varu32, write_varu64};
use tag::TagWriter;

use crate::error::{EncodeError, EncodeResult};
use crate::message::{
    AddEntity, BlockEntityData, EntityEvent, LevelEvent, Message, MoveEntityAbsolute, PlaySound,
    RemoveEntity, SetEntityData, SpawnParticleEffect, UpdateBlock,
};
use crate::metadata::{EntityMetadata, MetadataValue};

/// Longest string field accepted.
pub const MAX_STRING_BYTES: usize = i16::MAX as usize;

/// Unique id used by particle messages that are not bound to an entity.
const NO_ENTITY: i64 = -1;

const MOVE_FLAG_ON_GROUND: u8 = 0x01;
const MOVE_FLAG_TELEPORT: u8 = 0x02;

/// Degrees per byte step of a packed rotation.
const ROTATION_STEP: f32 = 360.0 / 256.0;

/// Appends the encoded form of `message` to `out`.
///
/// On error `out` may hold a partially written message; callers that reuse
/// the buffer should truncate it.
pub fn encode_message(message: &Message, out: &mut Vec<u8>) -> EncodeResult<()> {
    write_varu32(out, message.kind().id());
    match message {
        Message::AddEntity(msg) => encode_add_entity(msg, out),
        Message::RemoveEntity(msg) => {
            encode_remove_entity(msg, out);
            Ok(())
        }
        Message::MoveEntityAbsolute(msg) => {
            encode_move_entity(msg, out);
            Ok(())
        }
        Message::EntityEvent(msg) => {
            encode_entity_event(msg, out);
            Ok(())
        }
        Message::UpdateBlock(msg) => {
            encode_update_block(msg, out);
            Ok(())
        }
        Message::BlockEntityData(msg) => encode_block_entity_data(msg, out),
        Message::PlaySound(msg) => encode_play_sound(msg, out),
        Message::LevelEvent(msg) => {
            encode_level_event(msg, out);
            Ok(())
        }
        Message::SpawnParticleEffect(msg) => encode_spawn_particle(msg, out),
        Message::SetEntityData(msg) => encode_set_entity_data(msg, out),
    }
}

/// Encodes `message` into a fresh buffer.
pub fn encode_to_vec(message: &Message) -> EncodeResult<Vec<u8>> {
    let mut out = Vec::with_capacity(32);
    encode_message(message, &mut out)?;
    Ok(out)
}

fn encode_add_entity(msg: &AddEntity, out: &mut Vec<u8>) -> EncodeResult<()> {
    write_vari64(out, msg.unique_id);
    write_varu64(out, msg.runtime_id);
    write_string(out, &msg.identifier)?;
    write_vec3(out, msg.position);
    write_vec3(out, msg.motion);
    // pitch, yaw, head yaw, body yaw
    write_f32(out, msg.rotation.x);
    write_f32(out, msg.rotation.y);
    write_f32(out, msg.rotation.z);
    write_f32(out, msg.rotation.y);
    write_len(out, msg.attributes.len())?;
    for attr in &msg.attributes {
        write_string(out, &attr.name)?;
        write_f32(out, attr.min);
        write_f32(out, attr.value);
        write_f32(out, attr.max);
    }
    write_metadata(out, &msg.metadata)?;
    // entity links
    write_varu32(out, 0);
    Ok(())
}

fn encode_remove_entity(msg: &RemoveEntity, out: &mut Vec<u8>) {
    write_vari64(out, msg.unique_id);
}

fn encode_move_entity(msg: &MoveEntityAbsolute, out: &mut Vec<u8>) {
    write_varu64(out, msg.runtime_id);
    let mut flags = 0u8;
    if msg.on_ground {
        flags |= MOVE_FLAG_ON_GROUND;
    }
    if msg.teleported {
        flags |= MOVE_FLAG_TELEPORT;
    }
    out.push(flags);
    write_vec3(out, msg.position);
    out.push(pack_rotation(msg.rotation.x));
    out.push(pack_rotation(msg.rotation.y));
    out.push(pack_rotation(msg.rotation.z));
}

fn encode_entity_event(msg: &EntityEvent, out: &mut Vec<u8>) {
    write_varu64(out, msg.runtime_id);
    out.push(msg.kind.id());
    write_vari32(out, msg.data);
}

fn encode_update_block(msg: &UpdateBlock, out: &mut Vec<u8>) {
    write_block_position(out, msg.position);
    write_varu32(out, msg.runtime_id);
    write_varu32(out, msg.flags.raw());
    write_varu32(out, msg.data_layer);
}

fn encode_block_entity_data(msg: &BlockEntityData, out: &mut Vec<u8>) -> EncodeResult<()> {
    write_block_position(out, msg.position);
    let mut writer = TagWriter::with_capacity(64);
    writer.write_root(&msg.data)?;
    writer.finish_into(out);
    Ok(())
}

fn encode_play_sound(msg: &PlaySound, out: &mut Vec<u8>) -> EncodeResult<()> {
    write_string(out, &msg.sound)?;
    // Sound positions travel as block coordinates scaled by 8.
    let scaled = (msg.position * 8.0).as_ivec3();
    write_block_position(out, scaled);
    write_f32(out, msg.volume);
    write_f32(out, msg.pitch);
    Ok(())
}

fn encode_level_event(msg: &LevelEvent, out: &mut Vec<u8>) {
    write_vari32(out, msg.kind.id());
    write_vec3(out, msg.position);
    write_vari32(out, msg.data);
}

fn encode_spawn_particle(msg: &SpawnParticleEffect, out: &mut Vec<u8>) -> EncodeResult<()> {
    out.push(msg.dimension_id);
    write_vari64(out, NO_ENTITY);
    write_vec3(out, msg.position);
    write_string(out, &msg.identifier)
}

fn encode_set_entity_data(msg: &SetEntityData, out: &mut Vec<u8>) -> EncodeResult<()> {
    write_varu64(out, msg.runtime_id);
    write_metadata(out, &msg.metadata)?;
    // tick
    write_varu64(out, 0);
    Ok(())
}

fn write_metadata(out: &mut Vec<u8>, metadata: &EntityMetadata) -> EncodeResult<()> {
    write_len(out, metadata.len())?;
    for (key, value) in metadata.iter() {
        write_varu32(out, key.id());
        write_varu32(out, value.type_id());
        match value {
            MetadataValue::Byte(v) => out.push(*v as u8),
            MetadataValue::Short(v) => out.extend_from_slice(&v.to_le_bytes()),
            MetadataValue::Int(v) => write_vari32(out, *v),
            MetadataValue::Float(v) => write_f32(out, *v),
            MetadataValue::String(v) => write_string(out, v)?,
            MetadataValue::Long(v) => write_vari64(out, *v),
            MetadataValue::Vec3(v) => write_vec3(out, *v),
        }
    }
    Ok(())
}

fn write_string(out: &mut Vec<u8>, value: &str) -> EncodeResult<()> {
    if value.len() > MAX_STRING_BYTES {
        return Err(EncodeError::StringTooLong {
            len: value.len(),
            max: MAX_STRING_BYTES,
        });
    }
    write_varu32(out, value.len() as u32);
    out.extend_from_slice(value.as_bytes());
    Ok(())
}

fn write_len(out: &mut Vec<u8>, len: usize) -> EncodeResult<()> {
    let len = u32::try_from(len).map_err(|_| EncodeError::LengthOverflow { length: len })?;
    write_varu32(out, len);
    Ok(())
}

fn write_f32(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn write_vec3(out: &mut Vec<u8>, value: Vec3) {
    write_f32(out, value.x);
    write_f32(out, value.y);
    write_f32(out, value.z);
}

fn write_block_position(out: &mut Vec<u8>, pos: IVec3) {
    write_vari32(out, pos.x);
    write_varu32(out, pos.y as u32);
    write_vari32(out, pos.z);
}

fn pack_rotation(degrees: f32) -> u8 {
    (degrees / ROTATION_STEP).rem_euclid(256.0) as u8
}
