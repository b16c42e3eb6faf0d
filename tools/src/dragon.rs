//! Scripted dragon runs.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use sim::{ChannelSink, DragonEvent, DragonSpawn, EnderDragon, SimConfig, SimContext, TickFlow};
use tokio::time::Instant;
use tracing::{debug, info};
use wire::{Message, MessageSink, RecordingSink};
use world::{BlockRegistry, EntityCache, MemoryGrid};

use crate::report::{MessageRecord, TickRecord};

/// An event delivered to the dragon before the given tick runs.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedEvent {
    pub tick: u32,
    pub event: DragonEvent,
}

/// A dragon script as read from JSON.
///
/// ```json
/// {
///   "spawn": { "position": [0.0, 70.0, 0.0] },
///   "ticks": 100,
///   "events": [
///     { "tick": 0, "event": { "flags": { "no_ai": false, "silent": true } } },
///     { "tick": 20, "event": { "phase": 5 } },
///     { "tick": 80, "event": "despawn" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DragonScript {
    #[serde(default)]
    pub config: Option<SimConfig>,
    #[serde(default)]
    pub spawn: DragonSpawn,
    pub ticks: u32,
    #[serde(default)]
    pub events: Vec<ScriptedEvent>,
}

impl DragonScript {
    pub fn from_json(json: &str) -> Result<Self> {
        let mut script: Self = serde_json::from_str(json).context("parse dragon script")?;
        script.events.sort_by_key(|scripted| scripted.tick);
        Ok(script)
    }

    fn events_at(&self, tick: u32) -> impl Iterator<Item = &DragonEvent> {
        self.events
            .iter()
            .filter(move |scripted| scripted.tick == tick)
            .map(|scripted| &scripted.event)
    }
}

fn context(
    config: SimConfig,
    sink: Arc<dyn MessageSink>,
    blocks: Arc<BlockRegistry>,
) -> SimContext {
    SimContext::new(
        config,
        sink,
        Arc::new(MemoryGrid::new()),
        blocks,
        Arc::new(EntityCache::new()),
    )
}

/// Runs `script` synchronously, one record per tick.
///
/// The spawn messages land in the first record. A despawn ends the run.
pub fn run_dragon_script(
    script: &DragonScript,
    blocks: Arc<BlockRegistry>,
    config: SimConfig,
    with_bytes: bool,
) -> Result<Vec<TickRecord>> {
    let sink = Arc::new(RecordingSink::new());
    let mut dragon = EnderDragon::spawn(context(config, sink.clone(), blocks), script.spawn);

    let mut records = Vec::new();
    for tick in 0..script.ticks {
        let mut flow = TickFlow::Continue;
        for event in script.events_at(tick) {
            flow = dragon.handle(event.clone());
            if flow == TickFlow::Stop {
                break;
            }
        }
        if flow == TickFlow::Continue {
            dragon.tick();
        }
        records.push(TickRecord::new(tick, &sink.take(), with_bytes)?);
        if flow == TickFlow::Stop {
            debug!(tick, "dragon despawned");
            break;
        }
    }
    info!(ticks = records.len(), "dragon script finished");
    Ok(records)
}

/// Runs `script` on the tick driver against the wall clock.
///
/// Events are sent at their tick boundaries; messages are attributed to the
/// tick during which they were received, so attribution near a boundary
/// follows real scheduling. Cancelling the driver at the end despawns the
/// dragon; those messages are added to the last record.
pub fn run_dragon_realtime(
    script: &DragonScript,
    blocks: Arc<BlockRegistry>,
    config: SimConfig,
    with_bytes: bool,
) -> Result<Vec<TickRecord>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("build tokio runtime")?;
    runtime.block_on(async {
        let period = config.tick_interval();
        let (sink, mut rx) = ChannelSink::channel();
        let dragon = EnderDragon::spawn(context(config, Arc::new(sink), blocks), script.spawn);
        let start = Instant::now();
        let handle = dragon.start();

        let mut records = Vec::new();
        for tick in 0..script.ticks {
            for event in script.events_at(tick) {
                if handle.send(event.clone()).is_err() {
                    debug!(tick, "driver closed before event");
                }
            }
            tokio::time::sleep_until(start + period * (tick + 1) + Duration::from_millis(1)).await;
            let messages = drain(&mut rx);
            records.push(TickRecord::new(tick, &messages, with_bytes)?);
            if handle.is_finished() {
                break;
            }
        }
        handle.cancel();
        handle.join().await;
        if let Some(last) = records.last_mut() {
            for message in drain(&mut rx) {
                last.messages.push(MessageRecord::new(&message, with_bytes)?);
            }
        }
        info!(ticks = records.len(), "realtime dragon script finished");
        Ok::<_, anyhow::Error>(records)
    })
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Message>) -> Vec<Message> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::summarize;
    use sim::dragon::PART_COUNT;

    fn run(json: &str) -> Vec<TickRecord> {
        run_dragon_script(
            &DragonScript::from_json(json).unwrap(),
            Arc::new(BlockRegistry::vanilla_subset()),
            SimConfig::for_testing(),
            false,
        )
        .unwrap()
    }

    #[test]
    fn spawn_then_pose_every_tick() {
        let records = run(r#"{
            "spawn": { "position": [0.0, 70.0, 0.0] },
            "ticks": 5,
            "events": [{ "tick": 0, "event": { "flags": { "no_ai": false, "silent": true } } }]
        }"#);
        assert_eq!(records.len(), 5);
        let counts = summarize(&records);
        assert_eq!(counts.get("add_entity"), Some(&(PART_COUNT + 1)));
        assert_eq!(counts.get("move_entity_absolute"), Some(&(5 * PART_COUNT)));
    }

    #[test]
    fn despawn_ends_the_run() {
        let records = run(r#"{
            "ticks": 50,
            "events": [
                { "tick": 3, "event": "despawn" },
                { "tick": 0, "event": { "flags": { "no_ai": true, "silent": true } } }
            ]
        }"#);
        assert_eq!(records.len(), 4);
        let removed = records[3]
            .messages
            .iter()
            .filter(|m| m.kind == "remove_entity")
            .count();
        assert_eq!(removed, PART_COUNT + 1);
    }

    #[test]
    fn phase_change_emits_entity_event() {
        let records = run(r#"{
            "ticks": 2,
            "events": [
                { "tick": 0, "event": { "flags": { "no_ai": true, "silent": true } } },
                { "tick": 1, "event": { "phase": 5 } }
            ]
        }"#);
        assert!(records[1].messages.iter().any(|m| m.kind == "entity_event"));
    }
}
