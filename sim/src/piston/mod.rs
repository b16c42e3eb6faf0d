//! Piston block-move simulation.
//!
//! A piston action lifts the blocks in front of the arm into moving-block
//! placeholders, animates the arm over a few ticks and finally drops the
//! blocks at their destination.

mod action;
mod cache;
mod search;
mod simulator;
pub mod tags;

pub use action::{ArmProgress, ArmState, PistonAction};
pub use cache::PistonCache;
pub use search::{
    can_destroy, can_move, find_affected_blocks, is_attached, is_sticky, movement, AttachedBlocks,
};
pub use simulator::PistonSimulator;
