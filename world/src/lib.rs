//! World-side collaborators of the mimic behavior engine.
//!
//! Geometry helpers, block definitions and the [`BlockRegistry`], plus the
//! [`BlockGrid`] and [`EntityRegistry`] traits a session implements. The
//! in-memory implementations ([`MemoryGrid`], [`EntityCache`]) back tests and
//! the tools binary; they are not a chunk store.
//!
//! # Design Principles
//!
//! - **Traits at the seams** - Simulations see the world only through `Send + Sync` traits.
//! - **Unknown is air** - Unset grid positions read as [`BlockId::AIR`].
//! - **Data, not rules** - Movability rules live with the piston simulation.

mod block;
mod entity;
mod error;
mod geometry;
mod grid;
mod registry;

pub use block::{BlockDef, BlockId, PistonBehavior, PistonState, StateValue, StickyKind};
pub use entity::{EntityCache, EntityId, EntityRegistry, TrackedEntity};
pub use error::{WorldError, WorldResult};
pub use geometry::{direction_deg, BlockPos, Dimension, Direction};
pub use grid::{BlockGrid, MemoryGrid};
pub use registry::{BlockRegistry, BlockTable, BLOCK_STATE_VERSION};
