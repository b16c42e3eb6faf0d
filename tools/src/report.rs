//! Message listings shared by the scenario runners.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Serialize;
use wire::{encode_to_vec, Message};

/// One emitted message as printed by the tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRecord {
    pub kind: &'static str,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<String>,
}

impl MessageRecord {
    /// Describes `message`, optionally with its encoded bytes in hex.
    pub fn new(message: &Message, with_bytes: bool) -> Result<Self> {
        let bytes = if with_bytes {
            let encoded = encode_to_vec(message)
                .with_context(|| format!("encode {}", message.kind().name()))?;
            Some(hex::encode(encoded))
        } else {
            None
        };
        Ok(Self {
            kind: message.kind().name(),
            detail: describe(message),
            bytes,
        })
    }
}

/// Messages emitted during one tick of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickRecord {
    pub tick: u32,
    pub messages: Vec<MessageRecord>,
}

impl TickRecord {
    pub fn new(tick: u32, messages: &[Message], with_bytes: bool) -> Result<Self> {
        let messages = messages
            .iter()
            .map(|message| MessageRecord::new(message, with_bytes))
            .collect::<Result<_>>()?;
        Ok(Self { tick, messages })
    }
}

/// Counts messages per kind across a run.
pub fn summarize(ticks: &[TickRecord]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for record in ticks.iter().flat_map(|tick| &tick.messages) {
        *counts.entry(record.kind).or_insert(0) += 1;
    }
    counts
}

/// Formats a run as a tick-by-tick listing. Ticks without messages are
/// skipped.
pub fn format_ticks_pretty(ticks: &[TickRecord]) -> String {
    let mut out = String::new();
    for tick in ticks.iter().filter(|tick| !tick.messages.is_empty()) {
        let _ = writeln!(out, "tick {}:", tick.tick);
        for message in &tick.messages {
            let _ = writeln!(out, "  {} {}", message.kind, message.detail);
            if let Some(bytes) = &message.bytes {
                let _ = writeln!(out, "    {bytes}");
            }
        }
    }
    out
}

/// Formats per-kind counts, one kind per line.
pub fn format_summary(counts: &BTreeMap<&'static str, usize>) -> String {
    let mut out = String::new();
    for (kind, count) in counts {
        let _ = writeln!(out, "{kind}: {count}");
    }
    let total: usize = counts.values().sum();
    let _ = writeln!(out, "total: {total}");
    out
}

fn describe(message: &Message) -> String {
    match message {
        Message::AddEntity(add) => format!(
            "runtime_id={} identifier={} position={}",
            add.runtime_id, add.identifier, add.position
        ),
        Message::RemoveEntity(remove) => format!("unique_id={}", remove.unique_id),
        Message::MoveEntityAbsolute(mv) => {
            format!("runtime_id={} position={}", mv.runtime_id, mv.position)
        }
        Message::EntityEvent(event) => format!(
            "runtime_id={} event={:?} data={}",
            event.runtime_id, event.kind, event.data
        ),
        Message::UpdateBlock(update) => format!(
            "position={} runtime_id={}",
            update.position, update.runtime_id
        ),
        Message::BlockEntityData(data) => format!("position={} {}", data.position, data.data),
        Message::PlaySound(sound) => format!(
            "{} position={} volume={} pitch={:.3}",
            sound.sound, sound.position, sound.volume, sound.pitch
        ),
        Message::LevelEvent(event) => format!(
            "{:?} position={} data={}",
            event.kind, event.position, event.data
        ),
        Message::SpawnParticleEffect(effect) => format!(
            "{} dimension={} position={}",
            effect.identifier, effect.dimension_id, effect.position
        ),
        Message::SetEntityData(data) => format!("runtime_id={}", data.runtime_id),
    }
}
