//! Block grid collaborator.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::block::BlockId;
use crate::geometry::BlockPos;

/// Query-and-mutate access to the block grid of one session.
///
/// Implementations are shared between every simulated object of a session
/// and provide their own consistency; callers only rely on reads and writes
/// made within one tick being consistent with each other.
pub trait BlockGrid: Send + Sync {
    /// Returns the block at `pos`, or [`BlockId::AIR`] when unknown.
    fn block_at(&self, pos: BlockPos) -> BlockId;

    /// Replaces the block at `pos`.
    fn update_block(&self, pos: BlockPos, id: BlockId);
}

/// An in-memory sparse grid. Unset positions read as air.
#[derive(Debug, Default)]
pub struct MemoryGrid {
    blocks: RwLock<HashMap<BlockPos, BlockId>>,
    queries: AtomicUsize,
}

impl MemoryGrid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grid holding `blocks`.
    #[must_use]
    pub fn with_blocks(blocks: impl IntoIterator<Item = (BlockPos, BlockId)>) -> Self {
        let grid = Self::new();
        for (pos, id) in blocks {
            grid.update_block(pos, id);
        }
        grid
    }

    /// Number of [`block_at`](BlockGrid::block_at) calls served so far.
    #[must_use]
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    /// Number of non-air blocks stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlockGrid for MemoryGrid {
    fn block_at(&self, pos: BlockPos) -> BlockId {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.blocks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pos)
            .copied()
            .unwrap_or(BlockId::AIR)
    }

    fn update_block(&self, pos: BlockPos, id: BlockId) {
        let mut blocks = self.blocks.write().unwrap_or_else(PoisonError::into_inner);
        if id.is_air() {
            blocks.remove(&pos);
        } else {
            blocks.insert(pos, id);
        }
    }
}
