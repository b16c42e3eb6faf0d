//! Property tests for history indexing, arm progress and the block search.

use std::num::NonZeroUsize;

use proptest::prelude::*;
use sim::piston::{find_affected_blocks, ArmProgress, PistonAction};
use sim::{Segment, SegmentHistory};
use world::{BlockGrid, BlockPos, BlockRegistry, Direction, MemoryGrid};

fn action() -> impl Strategy<Value = PistonAction> {
    prop_oneof![
        Just(PistonAction::Pushing),
        Just(PistonAction::Pulling),
        Just(PistonAction::CancelledMidPush),
    ]
}

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

proptest! {
    #[test]
    fn history_returns_pushed_samples(
        capacity in 1usize..40,
        pushes in prop::collection::vec((-180.0f32..180.0, -64.0f32..320.0), 1..100),
    ) {
        let mut history = SegmentHistory::filled(
            NonZeroUsize::new(capacity).unwrap(),
            Segment::default(),
        );
        for &(yaw, y) in &pushes {
            history.push(Segment::new(yaw, y));
            prop_assert_eq!(history.get(0).unwrap(), Segment::new(yaw, y));
        }
        for k in 0..capacity.min(pushes.len()) {
            let (yaw, y) = pushes[pushes.len() - 1 - k];
            prop_assert_eq!(history.get(k).unwrap(), Segment::new(yaw, y));
        }
        prop_assert!(history.get(capacity).is_err());
    }

    #[test]
    fn arm_progress_stays_clamped(
        steps in prop::collection::vec(prop::option::of(action()), 1..60),
    ) {
        let mut arm = ArmProgress::retracted();
        for step in steps {
            match step {
                Some(action) => arm.set_action(action),
                None => arm.step(),
            }
            prop_assert!((0.0..=1.0).contains(&arm.progress()));
            prop_assert!((0.0..=1.0).contains(&arm.last_progress()));
            let end = if arm.action() == PistonAction::Pushing { 1.0 } else { 0.0 };
            prop_assert_eq!(
                arm.is_done(),
                arm.progress() == end && arm.last_progress() == end
            );
        }
    }

    #[test]
    fn search_never_lifts_piston_or_head(
        cells in prop::collection::vec(0usize..6, 125),
        orientation in direction(),
        action in action(),
    ) {
        const PALETTE: [&str; 6] = [
            "minecraft:air",
            "minecraft:stone",
            "minecraft:slime_block",
            "minecraft:honey_block",
            "minecraft:oak_planks",
            "minecraft:torch",
        ];
        let blocks = BlockRegistry::vanilla_subset();
        let grid = MemoryGrid::new();
        for (i, &cell) in cells.iter().enumerate() {
            let pos = BlockPos::new(i as i32 % 5 - 2, (i as i32 / 5) % 5 - 2, i as i32 / 25 - 2);
            grid.update_block(pos, blocks.id_of(PALETTE[cell]).unwrap());
        }
        let found = find_affected_blocks(&grid, &blocks, BlockPos::ZERO, orientation, action);
        prop_assert!(!found.contains(BlockPos::ZERO));
        if action == PistonAction::Pulling {
            prop_assert!(!found.contains(orientation.offset()));
        }
        prop_assert_eq!(found.flattened().len(), found.len() * 3);
        for pos in found.positions() {
            prop_assert!(!grid.block_at(pos).is_air());
        }
    }

    #[test]
    fn blocked_line_moves_nothing(
        line in prop::collection::vec(0usize..4, 1..12),
    ) {
        const LINE: [&str; 4] = [
            "minecraft:stone",
            "minecraft:oak_planks",
            "minecraft:torch",
            "minecraft:obsidian",
        ];
        let blocks = BlockRegistry::vanilla_subset();
        let grid = MemoryGrid::new();
        for (i, &cell) in line.iter().enumerate() {
            grid.update_block(BlockPos::new(i as i32 + 1, 0, 0), blocks.id_of(LINE[cell]).unwrap());
        }
        let found = find_affected_blocks(
            &grid,
            &blocks,
            BlockPos::ZERO,
            Direction::East,
            PistonAction::Pushing,
        );
        if line.contains(&3) {
            prop_assert!(found.is_empty());
        } else {
            let expected: Vec<BlockPos> = line
                .iter()
                .enumerate()
                .filter(|&(_, &cell)| cell != 2)
                .map(|(i, _)| BlockPos::new(i as i32 + 1, 0, 0))
                .collect();
            prop_assert_eq!(found.positions().collect::<Vec<_>>(), expected);
        }
    }
}
