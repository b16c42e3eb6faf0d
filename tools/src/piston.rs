//! Deterministic piston scenes.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sim::{PistonAction, PistonSimulator, SimConfig, SimContext, TickFlow};
use tracing::{debug, info};
use wire::RecordingSink;
use world::{BlockGrid, BlockPos, BlockRegistry, Direction, EntityCache, MemoryGrid};

use crate::report::TickRecord;

/// A block placed in a scene before the run.
#[derive(Debug, Clone, Deserialize)]
pub struct PlacedBlock {
    pub position: BlockPos,
    /// Java identifier, including any block state suffix.
    pub block: String,
}

/// An action delivered to the piston at a given tick.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScheduledAction {
    #[serde(default)]
    pub tick: u32,
    pub action: PistonAction,
}

/// A piston scene as read from JSON.
///
/// ```json
/// {
///   "blocks": [
///     { "position": [0, 0, 0], "block": "minecraft:sticky_piston[extended=false]" },
///     { "position": [1, 0, 0], "block": "minecraft:slime_block" }
///   ],
///   "piston": [0, 0, 0],
///   "orientation": "east",
///   "actions": [{ "tick": 0, "action": "pushing" }]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PistonScene {
    #[serde(default)]
    pub config: Option<SimConfig>,
    #[serde(default)]
    pub blocks: Vec<PlacedBlock>,
    pub piston: BlockPos,
    pub orientation: Direction,
    pub actions: Vec<ScheduledAction>,
    /// Upper bound on simulated ticks.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u32,
}

const fn default_max_ticks() -> u32 {
    40
}

impl PistonScene {
    pub fn from_json(json: &str) -> Result<Self> {
        let scene: Self = serde_json::from_str(json).context("parse piston scene")?;
        if scene.actions.is_empty() {
            bail!("piston scene has no actions");
        }
        Ok(scene)
    }
}

/// Runs `scene` tick by tick until the piston settles and no actions remain.
///
/// Tick 0 holds the messages of the first action. An action arriving while
/// the piston is still moving is routed to the running simulator; one
/// arriving after it settled starts a fresh simulator, as the active piston
/// cache does.
pub fn run_piston_scene(
    scene: &PistonScene,
    blocks: Arc<BlockRegistry>,
    config: SimConfig,
    with_bytes: bool,
) -> Result<Vec<TickRecord>> {
    let grid = Arc::new(MemoryGrid::new());
    for placed in &scene.blocks {
        let Some(id) = blocks.id_of(&placed.block) else {
            bail!("unknown block {} at {}", placed.block, placed.position);
        };
        grid.update_block(placed.position, id);
    }
    let sink = Arc::new(RecordingSink::new());
    let ctx = SimContext::new(
        config,
        sink.clone(),
        grid,
        blocks,
        Arc::new(EntityCache::new()),
    );

    let mut actions = scene.actions.clone();
    actions.sort_by_key(|scheduled| scheduled.tick);
    let last_action_tick = actions.last().map_or(0, |scheduled| scheduled.tick);

    let mut running: Option<PistonSimulator> = None;
    let mut records = Vec::new();
    for tick in 0..=scene.max_ticks {
        let mut acted = false;
        for scheduled in actions.iter().filter(|scheduled| scheduled.tick == tick) {
            acted = true;
            let sim = running.get_or_insert_with(|| {
                PistonSimulator::new(ctx.clone(), scene.piston, scene.orientation)
            });
            if sim.apply(scheduled.action) == TickFlow::Stop {
                running = None;
            }
        }
        if !acted {
            if let Some(sim) = running.as_mut() {
                if sim.tick() == TickFlow::Stop {
                    running = None;
                }
            }
        }
        records.push(TickRecord::new(tick, &sink.take(), with_bytes)?);
        if running.is_none() && tick >= last_action_tick {
            debug!(tick, "piston settled");
            break;
        }
    }
    if running.is_some() {
        bail!("piston still moving after {} ticks", scene.max_ticks);
    }
    info!(ticks = records.len(), "piston scene finished");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUSH_SCENE: &str = r#"{
        "blocks": [
            { "position": [0, 0, 0], "block": "minecraft:sticky_piston[extended=false]" },
            { "position": [1, 0, 0], "block": "minecraft:stone" }
        ],
        "piston": [0, 0, 0],
        "orientation": "east",
        "actions": [{ "action": "pushing" }]
    }"#;

    fn run(json: &str) -> Vec<TickRecord> {
        let scene = PistonScene::from_json(json).unwrap();
        run_piston_scene(
            &scene,
            Arc::new(BlockRegistry::vanilla_subset()),
            SimConfig::for_testing(),
            false,
        )
        .unwrap()
    }

    #[test]
    fn push_settles_after_three_ticks() {
        let records = run(PUSH_SCENE);
        assert_eq!(records.len(), 4);
        let last = &records[3].messages;
        let kinds: Vec<&str> = last.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, ["block_entity_data", "update_block"]);
    }

    #[test]
    fn first_tick_moves_the_stone() {
        let records = run(PUSH_SCENE);
        let kinds: Vec<&str> = records[0].messages.iter().map(|m| m.kind).collect();
        // stone cleared, moving block placed with its tag, then the arm
        assert_eq!(
            kinds,
            [
                "update_block",
                "update_block",
                "block_entity_data",
                "block_entity_data"
            ]
        );
    }

    #[test]
    fn rejects_unknown_blocks() {
        let scene = PistonScene::from_json(
            r#"{
                "blocks": [{ "position": [0, 0, 0], "block": "minecraft:nonsense" }],
                "piston": [0, 0, 0],
                "orientation": "up",
                "actions": [{ "action": "pushing" }]
            }"#,
        )
        .unwrap();
        let err = run_piston_scene(
            &scene,
            Arc::new(BlockRegistry::vanilla_subset()),
            SimConfig::for_testing(),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("minecraft:nonsense"));
    }

    #[test]
    fn rejects_scene_without_actions() {
        let err = PistonScene::from_json(
            r#"{ "piston": [0, 0, 0], "orientation": "up", "actions": [] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no actions"));
    }
}
