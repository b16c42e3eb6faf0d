//! Affected-block search.
//!
//! Walks the grid from the face of the piston along the direction of motion,
//! collecting every block that moves with the arm. Sticky blocks drag their
//! attachable neighbours along, and a neighbour that is itself sticky is
//! expanded in turn. A block that can neither move nor break stops the whole
//! action and no block moves.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::warn;
use world::{BlockGrid, BlockId, BlockPos, BlockRegistry, Direction, PistonBehavior};

use super::action::PistonAction;

/// Blocks lifted by one piston action, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachedBlocks {
    blocks: Vec<(BlockPos, BlockId)>,
    index: HashMap<BlockPos, usize>,
    flattened: Vec<i32>,
}

impl AttachedBlocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[must_use]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.index.contains_key(&pos)
    }

    /// Returns the block lifted from `pos`.
    #[must_use]
    pub fn get(&self, pos: BlockPos) -> Option<BlockId> {
        self.index.get(&pos).map(|&i| self.blocks[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, BlockId)> + '_ {
        self.blocks.iter().copied()
    }

    pub fn positions(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.blocks.iter().map(|(pos, _)| *pos)
    }

    /// Positions as `x, y, z` triples, in discovery order.
    #[must_use]
    pub fn flattened(&self) -> &[i32] {
        &self.flattened
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.index.clear();
        self.flattened.clear();
    }

    fn insert(&mut self, pos: BlockPos, id: BlockId) {
        if let Some(&i) = self.index.get(&pos) {
            self.blocks[i].1 = id;
            return;
        }
        self.index.insert(pos, self.blocks.len());
        self.blocks.push((pos, id));
        self.flattened.extend_from_slice(&[pos.x, pos.y, pos.z]);
    }
}

/// Returns the offset blocks travel by for `action` on a piston facing
/// `orientation`.
#[must_use]
pub fn movement(orientation: Direction, action: PistonAction) -> BlockPos {
    match action {
        PistonAction::Pulling => orientation.opposite().offset(),
        PistonAction::Pushing | PistonAction::CancelledMidPush => orientation.offset(),
    }
}

/// Finds every block moved by `action` on the piston at `base`.
///
/// Returns an empty set when an immovable, unbreakable block is in the way.
pub fn find_affected_blocks(
    grid: &dyn BlockGrid,
    registry: &BlockRegistry,
    base: BlockPos,
    orientation: Direction,
    action: PistonAction,
) -> AttachedBlocks {
    let facing = orientation.offset();
    let head = base + facing;
    let motion = movement(orientation, action);
    let pushing = action.is_pushing();
    let pulling = action == PistonAction::Pulling;

    let mut attached = AttachedBlocks::new();
    let mut checked = HashSet::from([base]);
    let mut pending = VecDeque::new();
    if pulling {
        checked.insert(head);
        pending.push_back(base + facing * 2);
    } else {
        pending.push_back(head);
    }

    while let Some(pos) = pending.pop_front() {
        if !checked.insert(pos) {
            continue;
        }
        let id = grid.block_at(pos);
        if id.is_air() {
            continue;
        }

        if can_move(registry, id, pushing) {
            attached.insert(pos, id);
            if is_sticky(registry, id) {
                for direction in Direction::ALL {
                    let offset = direction.offset();
                    if offset == motion {
                        continue;
                    }
                    let neighbor = pos + offset;
                    if neighbor == base || (pulling && neighbor == head) {
                        continue;
                    }
                    let neighbor_id = grid.block_at(neighbor);
                    if neighbor_id.is_air()
                        || !is_attached(registry, id, neighbor_id)
                        || !can_move(registry, neighbor_id, false)
                    {
                        continue;
                    }
                    if is_sticky(registry, neighbor_id) {
                        pending.push_back(neighbor);
                    } else {
                        attached.insert(neighbor, neighbor_id);
                        checked.insert(neighbor);
                        pending.push_back(neighbor + motion);
                    }
                }
            }
        } else if !can_destroy(registry, id) {
            attached.clear();
            return attached;
        }
        pending.push_back(pos + motion);
    }
    attached
}

/// Whether a piston can move block `id`.
///
/// Push-only blocks move only when `pushing`. Unknown ids never move.
#[must_use]
pub fn can_move(registry: &BlockRegistry, id: BlockId, pushing: bool) -> bool {
    if id.is_air() {
        return true;
    }
    let Some(def) = registry.get(id) else {
        warn!(id = id.raw(), "unknown block id treated as immovable");
        return false;
    };
    if let Some(piston) = def.piston {
        return !piston.extended;
    }
    if def.hardness == -1.0 {
        return false;
    }
    match def.piston_behavior {
        PistonBehavior::Block | PistonBehavior::Destroy => false,
        PistonBehavior::PushOnly => pushing,
        PistonBehavior::Normal | PistonBehavior::Ignore => def.block_entity.is_none(),
    }
}

/// Whether a piston breaks block `id` instead of being stopped by it.
#[must_use]
pub fn can_destroy(registry: &BlockRegistry, id: BlockId) -> bool {
    registry
        .get(id)
        .is_some_and(|def| def.piston_behavior == PistonBehavior::Destroy)
}

#[must_use]
pub fn is_sticky(registry: &BlockRegistry, id: BlockId) -> bool {
    registry
        .get(id)
        .is_some_and(|def| def.sticky_kind().is_some())
}

/// Whether blocks `a` and `b` stick together.
///
/// Sticky blocks stick to any non-sticky block and to sticky blocks of the
/// same kind.
#[must_use]
pub fn is_attached(registry: &BlockRegistry, a: BlockId, b: BlockId) -> bool {
    let kind = |id| registry.get(id).and_then(|def| def.sticky_kind());
    match (kind(a), kind(b)) {
        (Some(x), Some(y)) => x == y,
        (a, b) => a.is_some() || b.is_some(),
    }
}
