//! Tick-driven behavior emulation for a protocol translator.
//!
//! One side of the translator reports sparse state changes ("piston is
//! pushing", "dragon entered phase 5"); the other side needs a continuous
//! stream of poses, effects and block updates. This crate fills the gap by
//! simulating each object on its own fixed-rate tick driver.
//!
//! # Design Principles
//!
//! - **One task per object** - every simulated object owns its state and
//!   runs on a dedicated [`driver`] task, so its events and ticks never
//!   interleave.
//! - **Fire-and-forget output** - messages go to a [`wire::MessageSink`];
//!   nothing waits for delivery.
//! - **Nothing is fatal** - unknown blocks are treated as immovable, bad
//!   lookbacks skip a pose, and a missing chunk cache only disables block
//!   motion.
//! - **Reproducible** - randomness comes from a per-object [`SimRng`] that
//!   can be seeded through [`SimConfig`].

mod config;
mod context;
pub mod dragon;
pub mod driver;
mod error;
mod history;
pub mod piston;
mod rng;

pub use config::SimConfig;
pub use context::{ChannelSink, SimContext};
pub use dragon::{DragonEvent, DragonSpawn, EnderDragon};
pub use driver::{Simulated, StopReason, TickFlow, TickHandle, TICK_INTERVAL};
pub use error::{SimError, SimResult};
pub use history::{Segment, SegmentHistory};
pub use piston::{PistonAction, PistonCache, PistonSimulator};
pub use rng::SimRng;
