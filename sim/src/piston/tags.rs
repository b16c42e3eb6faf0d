//! Block-entity tags for piston arms and moving blocks.

use tag::Compound;
use world::BlockPos;

use super::action::ArmProgress;

pub const PISTON_ARM_ID: &str = "PistonArm";
pub const MOVING_BLOCK_ID: &str = "MovingBlock";

/// Piston reference used by a carried piston once it has landed.
pub const DETACHED_PISTON_POS: BlockPos = BlockPos::new(0, -1, 0);

/// Tag of an animating piston arm.
#[must_use]
pub fn piston_arm_tag(
    position: BlockPos,
    arm: &ArmProgress,
    sticky: bool,
    attached: &[i32],
) -> Compound {
    let state = arm.state().as_byte();
    Compound::builder()
        .put_string("id", PISTON_ARM_ID)
        .put_int_array("AttachedBlocks", attached)
        .put_float("Progress", arm.progress())
        .put_float("LastProgress", arm.last_progress())
        .put_byte("NewState", state)
        .put_byte("State", state)
        .put_bool("Sticky", sticky)
        .put_byte("isMovable", 0)
        .put_int("x", position.x)
        .put_int("y", position.y)
        .put_int("z", position.z)
        .build()
}

/// Tag of a piston at rest, fully extended or fully retracted.
#[must_use]
pub fn static_piston_tag(position: BlockPos, extended: bool, sticky: bool) -> Compound {
    let (progress, state) = if extended { (1.0, 2) } else { (0.0, 0) };
    Compound::builder()
        .put_string("id", PISTON_ARM_ID)
        .put_float("Progress", progress)
        .put_float("LastProgress", progress)
        .put_byte("NewState", state)
        .put_byte("State", state)
        .put_bool("Sticky", sticky)
        .put_byte("isMovable", 0)
        .put_int("x", position.x)
        .put_int("y", position.y)
        .put_int("z", position.z)
        .build()
}

/// Tag of a moving-block placeholder at `position`.
///
/// `moving_block` is the block-state compound of the carried block and
/// `extra` the state compound of air. `moving_entity` is the carried block's
/// own block-entity tag, if it has one.
#[must_use]
pub fn moving_block_tag(
    position: BlockPos,
    moving_block: Compound,
    extra: Compound,
    moving_entity: Option<Compound>,
    piston_position: BlockPos,
) -> Compound {
    let builder = Compound::builder()
        .put_string("id", MOVING_BLOCK_ID)
        .put_compound("movingBlock", moving_block)
        .put_compound("movingBlockExtra", extra)
        .put_byte("isMovable", 1)
        .put_int("pistonPosX", piston_position.x)
        .put_int("pistonPosY", piston_position.y)
        .put_int("pistonPosZ", piston_position.z)
        .put_int("x", position.x)
        .put_int("y", position.y)
        .put_int("z", position.z);
    match moving_entity {
        Some(entity) => builder.put_compound("movingEntity", entity),
        None => builder,
    }
    .build()
}
