//! The block-move simulator of one piston.

use tag::Compound;
use tracing::{debug, trace, warn};
use wire::{BlockEntityData, UpdateBlock, UpdateBlockFlags};
use world::{BlockId, BlockPos, Direction};

use super::action::{ArmProgress, PistonAction};
use super::cache::Registration;
use super::search::{find_affected_blocks, movement, AttachedBlocks};
use super::tags::{moving_block_tag, piston_arm_tag, static_piston_tag, DETACHED_PISTON_POS};
use crate::context::SimContext;
use crate::driver::{Simulated, StopReason, TickFlow};

/// Animates one piston and the blocks it moves.
///
/// Every action and every tick ends with the arm tag being sent for the
/// piston base. Blocks in motion are replaced by moving-block placeholders
/// until the arm settles, then restored at their destination.
///
/// Without chunk caching the grid is never read and the arm animates
/// without moving any blocks.
#[derive(Debug)]
pub struct PistonSimulator {
    ctx: SimContext,
    position: BlockPos,
    orientation: Direction,
    sticky: bool,
    arm: ArmProgress,
    attached: AttachedBlocks,
    registration: Option<Registration>,
}

impl PistonSimulator {
    /// Creates a simulator for the piston at `position`.
    ///
    /// The starting arm state is read from the grid: an extended piston
    /// starts fully out, anything else fully in.
    pub fn new(ctx: SimContext, position: BlockPos, orientation: Direction) -> Self {
        let mut sticky = false;
        let mut arm = ArmProgress::retracted();
        if ctx.config.cache_chunks {
            let id = ctx.grid.block_at(position);
            match ctx.blocks.get(id).and_then(|def| def.piston) {
                Some(state) => {
                    sticky = state.sticky;
                    if state.extended {
                        arm = ArmProgress::extended();
                    }
                }
                None => warn!(?position, id = id.raw(), "no piston at piston position"),
            }
        }
        Self {
            ctx,
            position,
            orientation,
            sticky,
            arm,
            attached: AttachedBlocks::new(),
            registration: None,
        }
    }

    pub(crate) fn with_registration(mut self, registration: Registration) -> Self {
        self.registration = Some(registration);
        self
    }

    #[must_use]
    pub const fn position(&self) -> BlockPos {
        self.position
    }

    #[must_use]
    pub const fn orientation(&self) -> Direction {
        self.orientation
    }

    #[must_use]
    pub const fn is_sticky(&self) -> bool {
        self.sticky
    }

    #[must_use]
    pub const fn arm(&self) -> &ArmProgress {
        &self.arm
    }

    /// Blocks currently in motion.
    #[must_use]
    pub const fn attached(&self) -> &AttachedBlocks {
        &self.attached
    }

    /// Applies an action and sends the resulting update.
    ///
    /// Returns [`TickFlow::Stop`] once the piston has settled.
    pub fn apply(&mut self, action: PistonAction) -> TickFlow {
        self.set_action(action);
        self.send_update()
    }

    /// Advances the arm by one tick and sends the resulting update.
    pub fn tick(&mut self) -> TickFlow {
        self.arm.step();
        self.send_update()
    }

    fn set_action(&mut self, action: PistonAction) {
        debug!(position = ?self.position, ?action, "piston action");
        self.arm.set_action(action);
        let moves_blocks = match action {
            PistonAction::Pushing => true,
            PistonAction::Pulling => self.sticky,
            PistonAction::CancelledMidPush => false,
        };
        if !moves_blocks {
            return;
        }
        self.attached = if self.ctx.config.cache_chunks {
            if action.is_pushing() {
                self.remove_piston_head();
            }
            find_affected_blocks(
                self.ctx.grid.as_ref(),
                &self.ctx.blocks,
                self.position,
                self.orientation,
                action,
            )
        } else {
            AttachedBlocks::new()
        };
        trace!(position = ?self.position, blocks = self.attached.len(), "affected blocks");
        self.remove_blocks();
        self.create_moving_blocks();
    }

    fn send_update(&mut self) -> TickFlow {
        self.ctx.send(BlockEntityData {
            position: self.position,
            data: piston_arm_tag(
                self.position,
                &self.arm,
                self.sticky,
                self.attached.flattened(),
            ),
        });

        if !self.arm.is_done() {
            if self.arm.action() == PistonAction::CancelledMidPush && self.arm.progress() == 1.0 {
                self.finish_moving_blocks();
                self.attached.clear();
            }
            return TickFlow::Continue;
        }

        if !self.arm.action().is_pushing() {
            self.remove_piston_head();
        }
        self.finish_moving_blocks();
        debug!(position = ?self.position, "piston settled");
        TickFlow::Stop
    }

    fn movement(&self) -> BlockPos {
        movement(self.orientation, self.arm.action())
    }

    /// Clears a leftover piston head in front of the piston from the grid.
    fn remove_piston_head(&self) {
        if !self.ctx.config.cache_chunks {
            return;
        }
        let front = self.position + self.orientation.offset();
        let id = self.ctx.grid.block_at(front);
        if self
            .ctx
            .blocks
            .get(id)
            .is_some_and(world::BlockDef::is_piston_head)
        {
            self.ctx.grid.update_block(front, BlockId::AIR);
        }
    }

    fn update_block(&self, position: BlockPos, runtime_id: u32) {
        self.ctx.send(UpdateBlock {
            position,
            runtime_id,
            data_layer: 0,
            flags: UpdateBlockFlags::neighbors_network(),
        });
    }

    fn remove_blocks(&self) {
        let air = self.ctx.blocks.air_runtime_id();
        for pos in self.attached.positions() {
            self.update_block(pos, air);
        }
    }

    fn create_moving_blocks(&self) {
        let motion = self.movement();
        let moving = self.ctx.blocks.moving_block_runtime_id();
        for (pos, id) in self.attached.iter() {
            let destination = pos + motion;
            self.update_block(destination, moving);
            let data = moving_block_tag(
                destination,
                self.state_tag(id),
                self.air_tag(),
                self.carried_piston_tag(id, destination),
                self.position,
            );
            self.ctx.send(BlockEntityData {
                position: destination,
                data,
            });
        }
    }

    fn finish_moving_blocks(&self) {
        let motion = self.movement();
        for (pos, id) in self.attached.iter() {
            let destination = pos + motion;
            let carried = self.carried_piston_tag(id, destination);
            if let Some(piston) = &carried {
                self.ctx.send(BlockEntityData {
                    position: destination,
                    data: moving_block_tag(
                        destination,
                        self.state_tag(id),
                        self.air_tag(),
                        Some(piston.clone()),
                        DETACHED_PISTON_POS,
                    ),
                });
            }
            match self.ctx.blocks.runtime_id(id) {
                Some(runtime_id) => self.update_block(destination, runtime_id),
                None => warn!(id = id.raw(), "moved block has no runtime id"),
            }
            if let Some(piston) = carried {
                self.ctx.send(BlockEntityData {
                    position: destination,
                    data: piston,
                });
            }
        }
    }

    fn state_tag(&self, id: BlockId) -> Compound {
        self.ctx.blocks.block_state_tag(id).unwrap_or_default()
    }

    fn air_tag(&self) -> Compound {
        self.state_tag(BlockId::AIR)
    }

    /// Static arm tag of `id` when it is a piston, placed at `position`.
    fn carried_piston_tag(&self, id: BlockId, position: BlockPos) -> Option<Compound> {
        let state = self.ctx.blocks.get(id)?.piston?;
        Some(static_piston_tag(position, state.extended, state.sticky))
    }
}

impl Simulated for PistonSimulator {
    type Event = PistonAction;

    fn on_event(&mut self, action: PistonAction) -> TickFlow {
        self.apply(action)
    }

    fn on_tick(&mut self) -> TickFlow {
        self.tick()
    }

    fn is_valid(&self) -> bool {
        !self.ctx.sink.is_closed()
    }

    fn on_stop(&mut self, reason: StopReason, leftovers: Vec<PistonAction>) {
        if let Some(registration) = self.registration.take() {
            registration.release(reason, leftovers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use std::sync::Arc;
    use wire::{Message, MessageKind, RecordingSink};
    use world::{BlockGrid, BlockRegistry, EntityCache, MemoryGrid};

    struct Scene {
        sink: Arc<RecordingSink>,
        grid: Arc<MemoryGrid>,
        blocks: Arc<BlockRegistry>,
        ctx: SimContext,
    }

    fn scene(config: SimConfig, blocks: &[(BlockPos, &str)]) -> Scene {
        let registry = Arc::new(BlockRegistry::vanilla_subset());
        let grid = Arc::new(MemoryGrid::with_blocks(
            blocks
                .iter()
                .map(|(pos, name)| (*pos, registry.id_of(name).unwrap())),
        ));
        let sink = Arc::new(RecordingSink::new());
        let ctx = SimContext::new(
            config,
            sink.clone(),
            grid.clone(),
            registry.clone(),
            Arc::new(EntityCache::new()),
        );
        Scene {
            sink,
            grid,
            blocks: registry,
            ctx,
        }
    }

    const PISTON: &str = "minecraft:piston[extended=false]";

    #[test]
    fn reads_initial_state_from_grid() {
        let s = scene(
            SimConfig::for_testing(),
            &[(BlockPos::ZERO, "minecraft:sticky_piston[extended=true]")],
        );
        let sim = PistonSimulator::new(s.ctx.clone(), BlockPos::ZERO, Direction::Up);
        assert!(sim.is_sticky());
        assert_eq!(*sim.arm(), ArmProgress::extended());
    }

    #[test]
    fn push_emits_clear_then_placeholder() {
        let s = scene(
            SimConfig::for_testing(),
            &[
                (BlockPos::ZERO, PISTON),
                (BlockPos::new(1, 0, 0), "minecraft:stone"),
            ],
        );
        let mut sim = PistonSimulator::new(s.ctx.clone(), BlockPos::ZERO, Direction::East);
        assert_eq!(sim.apply(PistonAction::Pushing), TickFlow::Continue);

        let kinds: Vec<MessageKind> = s.sink.messages().iter().map(Message::kind).collect();
        assert_eq!(
            kinds,
            [
                MessageKind::UpdateBlock,
                MessageKind::UpdateBlock,
                MessageKind::BlockEntityData,
                MessageKind::BlockEntityData,
            ]
        );
        let messages = s.sink.take();
        let Message::UpdateBlock(clear) = &messages[0] else {
            panic!("expected update block");
        };
        assert_eq!(clear.position, BlockPos::new(1, 0, 0));
        assert_eq!(clear.runtime_id, s.blocks.air_runtime_id());
        let Message::UpdateBlock(placeholder) = &messages[1] else {
            panic!("expected update block");
        };
        assert_eq!(placeholder.position, BlockPos::new(2, 0, 0));
        assert_eq!(placeholder.runtime_id, s.blocks.moving_block_runtime_id());
        let Message::BlockEntityData(arm) = &messages[3] else {
            panic!("expected block entity data");
        };
        assert_eq!(arm.position, BlockPos::ZERO);
        assert_eq!(arm.data.get_int_array("AttachedBlocks"), Some(&[1, 0, 0][..]));
    }

    #[test]
    fn push_settles_on_third_tick() {
        let s = scene(
            SimConfig::for_testing(),
            &[
                (BlockPos::ZERO, PISTON),
                (BlockPos::new(1, 0, 0), "minecraft:stone"),
            ],
        );
        let mut sim = PistonSimulator::new(s.ctx.clone(), BlockPos::ZERO, Direction::East);
        sim.apply(PistonAction::Pushing);
        assert_eq!(sim.tick(), TickFlow::Continue);
        assert_eq!(sim.tick(), TickFlow::Continue);
        s.sink.take();
        assert_eq!(sim.tick(), TickFlow::Stop);

        let messages = s.sink.take();
        assert_eq!(messages.len(), 2);
        let Message::UpdateBlock(done) = &messages[1] else {
            panic!("expected update block");
        };
        assert_eq!(done.position, BlockPos::new(2, 0, 0));
        let stone = s.blocks.id_of("minecraft:stone").unwrap();
        assert_eq!(Some(done.runtime_id), s.blocks.runtime_id(stone));
    }

    #[test]
    fn non_sticky_pull_moves_nothing() {
        let s = scene(
            SimConfig::for_testing(),
            &[
                (BlockPos::ZERO, "minecraft:piston[extended=true]"),
                (BlockPos::new(0, 0, 2), "minecraft:stone"),
            ],
        );
        let mut sim = PistonSimulator::new(s.ctx.clone(), BlockPos::ZERO, Direction::South);
        sim.apply(PistonAction::Pulling);
        assert!(sim.attached().is_empty());
        assert_eq!(s.sink.count(MessageKind::UpdateBlock), 0);
    }

    #[test]
    fn pull_settle_removes_head() {
        let s = scene(
            SimConfig::for_testing(),
            &[
                (BlockPos::ZERO, "minecraft:piston[extended=true]"),
                (BlockPos::new(0, 1, 0), "minecraft:piston_head[type=normal]"),
            ],
        );
        let mut sim = PistonSimulator::new(s.ctx.clone(), BlockPos::ZERO, Direction::Up);
        sim.apply(PistonAction::Pulling);
        let mut flow = TickFlow::Continue;
        for _ in 0..3 {
            flow = sim.tick();
        }
        assert_eq!(flow, TickFlow::Stop);
        assert!(s.grid.block_at(BlockPos::new(0, 1, 0)).is_air());
    }

    #[test]
    fn degraded_mode_never_reads_grid() {
        let config = SimConfig {
            cache_chunks: false,
            ..SimConfig::for_testing()
        };
        let s = scene(
            config,
            &[
                (BlockPos::ZERO, PISTON),
                (BlockPos::new(1, 0, 0), "minecraft:stone"),
            ],
        );
        let mut sim = PistonSimulator::new(s.ctx.clone(), BlockPos::ZERO, Direction::East);
        sim.apply(PistonAction::Pushing);
        while sim.tick() == TickFlow::Continue {}
        assert_eq!(s.grid.queries(), 0);
        assert_eq!(s.sink.count(MessageKind::UpdateBlock), 0);
        assert_eq!(
            s.sink.count(MessageKind::BlockEntityData),
            s.sink.len(),
            "only arm tags are sent"
        );
    }

    #[test]
    fn cancel_at_full_extension_finishes_blocks() {
        let s = scene(
            SimConfig::for_testing(),
            &[
                (BlockPos::ZERO, PISTON),
                (BlockPos::new(1, 0, 0), "minecraft:stone"),
            ],
        );
        let mut sim = PistonSimulator::new(s.ctx.clone(), BlockPos::ZERO, Direction::East);
        sim.apply(PistonAction::Pushing);
        sim.tick();
        s.sink.take();
        assert_eq!(sim.apply(PistonAction::CancelledMidPush), TickFlow::Continue);
        assert!(sim.attached().is_empty());
        let messages = s.sink.take();
        let Message::BlockEntityData(arm) = &messages[0] else {
            panic!("expected arm tag first");
        };
        assert_eq!(arm.data.get_byte("State"), Some(2));
        assert_eq!(arm.data.get_int_array("AttachedBlocks"), Some(&[1, 0, 0][..]));
        assert!(matches!(messages[1], Message::UpdateBlock(_)));
    }

    #[test]
    fn carried_piston_is_detached_on_finish() {
        let s = scene(
            SimConfig::for_testing(),
            &[
                (BlockPos::ZERO, PISTON),
                (BlockPos::new(1, 0, 0), PISTON),
            ],
        );
        let mut sim = PistonSimulator::new(s.ctx.clone(), BlockPos::ZERO, Direction::East);
        sim.apply(PistonAction::Pushing);
        sim.tick();
        sim.tick();
        s.sink.take();
        assert_eq!(sim.tick(), TickFlow::Stop);

        let messages = s.sink.take();
        let kinds: Vec<MessageKind> = messages.iter().map(Message::kind).collect();
        assert_eq!(
            kinds,
            [
                MessageKind::BlockEntityData,
                MessageKind::BlockEntityData,
                MessageKind::UpdateBlock,
                MessageKind::BlockEntityData,
            ]
        );
        let Message::BlockEntityData(detach) = &messages[1] else {
            unreachable!();
        };
        assert_eq!(detach.data.get_int("pistonPosY"), Some(-1));
        let Message::BlockEntityData(static_tag) = &messages[3] else {
            unreachable!();
        };
        assert_eq!(static_tag.data.get_string("id"), Some("PistonArm"));
        assert!(!static_tag.data.contains_key("AttachedBlocks"));
    }
}
