use glam::IVec3;
use proptest::prelude::*;
use tag::varint::{read_vari32, read_varu32};
use tag::{decode_network, Compound, TagLimits};
use wire::{encode_to_vec, BlockEntityData, Message, MessageKind, UpdateBlock, UpdateBlockFlags};

fn block_pos() -> impl Strategy<Value = IVec3> {
    (any::<i32>(), -64i32..320, any::<i32>()).prop_map(|(x, y, z)| IVec3::new(x, y, z))
}

/// Reads a block position, returning it with the bytes consumed.
fn read_block_pos(data: &[u8]) -> (IVec3, usize) {
    let (x, a) = read_vari32(data).unwrap();
    let (y, b) = read_varu32(&data[a..]).unwrap();
    let (z, c) = read_vari32(&data[a + b..]).unwrap();
    (IVec3::new(x, y as i32, z), a + b + c)
}

proptest! {
    #[test]
    fn prop_update_block_layout(pos in block_pos(), runtime_id in any::<u32>(), layer in 0u32..2) {
        let msg = Message::UpdateBlock(UpdateBlock {
            position: pos,
            runtime_id,
            data_layer: layer,
            flags: UpdateBlockFlags::neighbors_network(),
        });
        let bytes = encode_to_vec(&msg).unwrap();
        let (id, mut offset) = read_varu32(&bytes).unwrap();
        prop_assert_eq!(id, MessageKind::UpdateBlock.id());
        let (decoded_pos, read) = read_block_pos(&bytes[offset..]);
        offset += read;
        prop_assert_eq!(decoded_pos, pos);
        let (decoded_runtime, read) = read_varu32(&bytes[offset..]).unwrap();
        offset += read;
        prop_assert_eq!(decoded_runtime, runtime_id);
        let (flags, read) = read_varu32(&bytes[offset..]).unwrap();
        offset += read;
        prop_assert_eq!(flags, 3);
        let (decoded_layer, read) = read_varu32(&bytes[offset..]).unwrap();
        offset += read;
        prop_assert_eq!(decoded_layer, layer);
        prop_assert_eq!(offset, bytes.len());
    }

    #[test]
    fn prop_block_entity_tag_decodes(pos in block_pos(), progress in 0.0f32..=1.0, blocks in prop::collection::vec(any::<i32>(), 0..12)) {
        let data = Compound::builder()
            .put_string("id", "PistonArm")
            .put_int_array("AttachedBlocks", blocks)
            .put_float("Progress", progress)
            .build();
        let msg = Message::BlockEntityData(BlockEntityData { position: pos, data: data.clone() });
        let bytes = encode_to_vec(&msg).unwrap();
        let (_, offset) = read_varu32(&bytes).unwrap();
        let (decoded_pos, read) = read_block_pos(&bytes[offset..]);
        prop_assert_eq!(decoded_pos, pos);
        let decoded = decode_network(&bytes[offset + read..], &TagLimits::default()).unwrap();
        prop_assert_eq!(decoded, data);
    }
}
