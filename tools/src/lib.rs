//! Scenario runner and tag decoder for the mimic behavior engine.
//!
//! This crate drives the simulations outside a live session:
//!
//! - Run a piston scene tick by tick and list the emitted messages
//! - Run a scripted dragon, synchronously or on the real tick driver
//! - Decode network-format tags and print them depth-first
//!
//! # Design Principles
//!
//! - **Deterministic by default** - Synchronous runs use a seeded config and produce the same output every time.
//! - **Human-readable output** - Every message gets a one-line description; JSON is available for scripts.

mod dragon;
mod piston;
mod report;
mod tagdump;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use sim::SimConfig;
use world::{BlockRegistry, BlockTable};

pub use dragon::{run_dragon_realtime, run_dragon_script, DragonScript, ScriptedEvent};
pub use piston::{run_piston_scene, PistonScene, PlacedBlock, ScheduledAction};
pub use report::{format_summary, format_ticks_pretty, summarize, MessageRecord, TickRecord};
pub use tagdump::{collect_tag_files, decode_tag, format_tag_pretty, TagFile};

/// Loads a block table from JSON, or the built-in subset when `path` is
/// `None`.
pub fn load_blocks(path: Option<&Path>) -> Result<Arc<BlockRegistry>> {
    let Some(path) = path else {
        return Ok(Arc::new(BlockRegistry::vanilla_subset()));
    };
    let contents =
        fs::read_to_string(path).with_context(|| format!("read blocks {}", path.display()))?;
    let table: BlockTable = serde_json::from_str(&contents).context("parse block table json")?;
    let registry = BlockRegistry::new(table).context("build block registry")?;
    Ok(Arc::new(registry))
}

/// Picks the run configuration: an explicit file wins over the scenario's
/// own config, which wins over the seeded testing config. The result is
/// validated.
pub fn load_config(path: Option<&Path>, scenario: Option<&SimConfig>) -> Result<SimConfig> {
    let config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            serde_json::from_str(&contents).context("parse config json")?
        }
        None => scenario.cloned().unwrap_or_else(SimConfig::for_testing),
    };
    config.validate().context("validate config")?;
    Ok(config)
}
