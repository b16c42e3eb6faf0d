//! The dragon controller.

use glam::Vec3;
use tracing::{debug, trace, warn};
use wire::{
    AddEntity, Attribute, EntityEvent, EntityEventKind, EntityFlag, EntityFlags, EntityMetadata,
    MoveEntityAbsolute, RemoveEntity, SetEntityData,
};
use world::{EntityId, TrackedEntity};

use super::effects;
use super::part::{Part, PartKind, PART_COUNT};
use super::phase;
use super::pose::part_offsets;
use crate::context::SimContext;
use crate::driver::{self, Simulated, StopReason, TickFlow, TickHandle};
use crate::history::{Segment, SegmentHistory};
use crate::rng::SimRng;

pub const DRAGON_IDENTIFIER: &str = "minecraft:ender_dragon";
pub const PART_IDENTIFIER: &str = "minecraft:armor_stand";

/// Maximum health advertised on spawn.
pub const MAX_HEALTH: f32 = 200.0;

/// Health before the first health update; positive so the dragon does not
/// start out dead.
const INITIAL_HEALTH: f32 = 10.0;

const DRAGON_DIMENSIONS: (f32, f32) = (16.0, 8.0);
const INITIAL_GROWL_COOLDOWN: i32 = 100;
const FLAP_THRESHOLD: f32 = -0.3;

/// Death ticks at which the emitter explosion may fire.
const EMITTER_WINDOW: std::ops::RangeInclusive<u32> = 180..=200;

/// Where and how a dragon appears.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DragonSpawn {
    pub position: Vec3,
    pub motion: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub head_yaw: f32,
}

/// State changes reported for a dragon.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DragonEvent {
    Phase(i32),
    Health(f32),
    Flags {
        no_ai: bool,
        silent: bool,
    },
    Move {
        position: Vec3,
        motion: Vec3,
        yaw: f32,
        pitch: f32,
        head_yaw: f32,
    },
    Despawn,
}

/// A dragon and the hitbox parts it owns.
///
/// The parts are spawned with the dragon and despawned with it. Every tick
/// the dragon plays its ambient effects and, while alive and simulating,
/// re-poses its parts from a rolling history of its own movement.
#[derive(Debug)]
pub struct EnderDragon {
    ctx: SimContext,
    id: EntityId,
    position: Vec3,
    motion: Vec3,
    yaw: f32,
    pitch: f32,
    head_yaw: f32,
    health: f32,
    flags: EntityFlags,
    parts: [Part; PART_COUNT],
    history: SegmentHistory,
    phase: i32,
    phase_ticks: u32,
    ticks_till_next_growl: i32,
    ticks_since_death: u32,
    wing_position: f32,
    last_wing_position: f32,
    death_emitter_sent: bool,
    despawned: bool,
    rng: SimRng,
}

impl EnderDragon {
    /// Spawns the dragon and its parts.
    ///
    /// Emits the dragon's add message followed by one per part, and
    /// registers every entity with the session.
    pub fn spawn(ctx: SimContext, spawn: DragonSpawn) -> Self {
        let id = ctx.entities.allocate_id();
        let flags = EntityFlags::default().with(EntityFlag::FireImmune);

        let mut metadata = EntityMetadata::new();
        metadata.set_flags(flags);
        ctx.send(AddEntity {
            unique_id: id.unique(),
            runtime_id: id.raw(),
            identifier: DRAGON_IDENTIFIER.to_owned(),
            position: spawn.position,
            motion: spawn.motion,
            rotation: Vec3::new(spawn.pitch, spawn.yaw, spawn.head_yaw),
            attributes: vec![Attribute::health(MAX_HEALTH)],
            metadata,
        });
        ctx.entities.register_spawned_entity(TrackedEntity {
            id,
            identifier: DRAGON_IDENTIFIER.to_owned(),
            position: spawn.position,
            dimensions: DRAGON_DIMENSIONS,
        });

        let parts = PartKind::ALL.map(|kind| spawn_part(&ctx, kind, spawn.position));

        let history = SegmentHistory::filled(
            ctx.config.history_capacity(),
            Segment::new(spawn.head_yaw, spawn.position.y),
        );
        let rng = SimRng::for_object(ctx.config.rng_seed, id.raw());
        debug!(id = id.raw(), position = %spawn.position, "dragon spawned");

        Self {
            ctx,
            id,
            position: spawn.position,
            motion: spawn.motion,
            yaw: spawn.yaw,
            pitch: spawn.pitch,
            head_yaw: spawn.head_yaw,
            health: INITIAL_HEALTH,
            flags,
            parts,
            history,
            phase: phase::HOLDING_PATTERN,
            phase_ticks: 0,
            ticks_till_next_growl: INITIAL_GROWL_COOLDOWN,
            ticks_since_death: 0,
            wing_position: 0.0,
            last_wing_position: 0.0,
            death_emitter_sent: false,
            despawned: false,
            rng,
        }
    }

    /// Starts ticking the dragon on its own driver.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn start(self) -> TickHandle<DragonEvent> {
        let period = self.ctx.config.tick_interval();
        driver::spawn(self, period)
    }

    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub const fn parts(&self) -> &[Part; PART_COUNT] {
        &self.parts
    }

    #[must_use]
    pub const fn phase(&self) -> i32 {
        self.phase
    }

    #[must_use]
    pub const fn flags(&self) -> EntityFlags {
        self.flags
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    #[must_use]
    pub const fn is_despawned(&self) -> bool {
        self.despawned
    }

    const fn is_sitting(&self) -> bool {
        phase::is_sitting(self.phase)
    }

    const fn is_hovering(&self) -> bool {
        phase::is_hovering(self.phase)
    }

    /// Applies one external event.
    pub fn handle(&mut self, event: DragonEvent) -> TickFlow {
        if self.despawned {
            return TickFlow::Stop;
        }
        match event {
            DragonEvent::Phase(phase) => self.set_phase(phase),
            DragonEvent::Health(health) => self.health = health,
            DragonEvent::Flags { no_ai, silent } => self.update_flags(|flags| {
                flags.set(EntityFlag::NoAi, no_ai);
                flags.set(EntityFlag::Silent, silent);
            }),
            DragonEvent::Move {
                position,
                motion,
                yaw,
                pitch,
                head_yaw,
            } => {
                self.position = position;
                self.motion = motion;
                self.yaw = yaw;
                self.pitch = pitch;
                self.head_yaw = head_yaw;
            }
            DragonEvent::Despawn => {
                self.despawn();
                return TickFlow::Stop;
            }
        }
        TickFlow::Continue
    }

    /// Advances the dragon by one tick.
    pub fn tick(&mut self) {
        if self.despawned {
            return;
        }
        self.effect_tick();
        if !self.flags.contains(EntityFlag::NoAi) && !self.is_dead() {
            self.update_pose();
        }
    }

    fn set_phase(&mut self, phase: i32) {
        self.phase = phase;
        self.phase_ticks = 0;
        match phase {
            phase::SITTING_FLAMING => self.entity_event(EntityEventKind::DragonFlaming),
            phase::DYING => self.entity_event(EntityEventKind::EnderDragonDeath),
            _ => {}
        }
        let sitting = self.is_sitting();
        self.update_flags(|flags| flags.set(EntityFlag::Sitting, sitting));
    }

    fn entity_event(&self, kind: EntityEventKind) {
        self.ctx.send(EntityEvent {
            runtime_id: self.id.raw(),
            kind,
            data: 0,
        });
    }

    fn update_flags(&mut self, update: impl FnOnce(&mut EntityFlags)) {
        let before = self.flags;
        update(&mut self.flags);
        if self.flags == before {
            return;
        }
        let mut metadata = EntityMetadata::new();
        metadata.set_flags(self.flags);
        self.ctx.send(SetEntityData {
            runtime_id: self.id.raw(),
            metadata,
        });
    }

    fn effect_tick(&mut self) {
        if !self.flags.contains(EntityFlag::Silent) {
            let wing = (self.wing_position * std::f32::consts::TAU).cos();
            let last_wing = (self.last_wing_position * std::f32::consts::TAU).cos();
            if wing <= FLAP_THRESHOLD && last_wing >= FLAP_THRESHOLD {
                self.ctx
                    .send(effects::flap_sound(self.position, &mut self.rng));
            }

            if !self.is_sitting() && !self.is_hovering() {
                let due = self.ticks_till_next_growl == 0;
                self.ticks_till_next_growl -= 1;
                if due {
                    self.play_growl();
                    self.ticks_till_next_growl = 200 + self.rng.range(0, 200) as i32;
                }
            }
            self.last_wing_position = self.wing_position;
        }

        if self.is_dead() {
            self.ticks_since_death += 1;
            if self.ticks_since_death % 10 == 0 {
                self.explode(false);
            }
            if !self.death_emitter_sent && EMITTER_WINDOW.contains(&self.ticks_since_death) {
                self.explode(true);
                self.death_emitter_sent = true;
            }
            return;
        }

        if self.flags.contains(EntityFlag::NoAi) {
            self.wing_position = 0.5;
        } else if self.is_hovering() || self.is_sitting() {
            self.wing_position += 0.1;
        } else {
            let speed = self.motion.length();
            self.wing_position += 0.2 / (speed * 10.0 + 1.0) * self.motion.y.exp2();
        }

        match self.phase {
            phase::LANDING => self.breathe(),
            phase::SITTING_FLAMING => {
                self.phase_ticks += 1;
                if self.phase_ticks % 2 == 0 && self.phase_ticks < 10 {
                    self.breathe();
                }
            }
            phase::SITTING_ATTACKING => self.play_growl(),
            phase::DYING => {
                if self.phase_ticks % 10 == 0 {
                    self.explode(true);
                }
                self.phase_ticks += 1;
            }
            _ => {}
        }
    }

    fn play_growl(&mut self) {
        self.ctx
            .send(effects::growl_sound(self.position, &mut self.rng));
    }

    fn explode(&mut self, emitter: bool) {
        let message =
            effects::explosion(self.position, self.ctx.config.dimension, emitter, &mut self.rng);
        self.ctx.send(message);
    }

    fn breathe(&mut self) {
        let head = &self.parts[PartKind::Head.index()];
        let center = head.position + Vec3::Y * (PartKind::Head.dimensions().1 * 0.5);
        for particle in effects::breath_burst(center, &mut self.rng) {
            self.ctx.send(particle);
        }
    }

    fn update_pose(&mut self) {
        self.history
            .push(Segment::new(self.head_yaw, self.position.y));
        let ducking = self.is_sitting() || self.is_hovering();
        let offsets = match part_offsets(&self.history, self.head_yaw, ducking) {
            Ok(offsets) => offsets,
            Err(err) => {
                warn!(id = self.id.raw(), error = %err, "skipping dragon pose");
                return;
            }
        };
        for (part, offset) in self.parts.iter_mut().zip(offsets) {
            part.position = self.position + offset;
            self.ctx.send(MoveEntityAbsolute {
                runtime_id: part.id.raw(),
                position: part.position,
                rotation: Vec3::ZERO,
                on_ground: false,
                teleported: false,
            });
        }
        trace!(id = self.id.raw(), "dragon posed");
    }

    fn despawn(&mut self) {
        for part in &self.parts {
            self.ctx.send(RemoveEntity {
                unique_id: part.id.unique(),
            });
            self.ctx.entities.remove_entity(part.id);
        }
        self.ctx.send(RemoveEntity {
            unique_id: self.id.unique(),
        });
        self.ctx.entities.remove_entity(self.id);
        self.despawned = true;
        debug!(id = self.id.raw(), "dragon despawned");
    }
}

fn spawn_part(ctx: &SimContext, kind: PartKind, position: Vec3) -> Part {
    let id = ctx.entities.allocate_id();
    let (width, height) = kind.dimensions();
    let mut metadata = EntityMetadata::new();
    metadata.set_flags(
        EntityFlags::default()
            .with(EntityFlag::Invisible)
            .with(EntityFlag::FireImmune),
    );
    metadata.set_bounding_box(width, height);
    ctx.send(AddEntity {
        unique_id: id.unique(),
        runtime_id: id.raw(),
        identifier: PART_IDENTIFIER.to_owned(),
        position,
        motion: Vec3::ZERO,
        rotation: Vec3::ZERO,
        attributes: Vec::new(),
        metadata,
    });
    ctx.entities.register_spawned_entity(TrackedEntity {
        id,
        identifier: PART_IDENTIFIER.to_owned(),
        position,
        dimensions: (width, height),
    });
    Part { kind, id, position }
}

impl Simulated for EnderDragon {
    type Event = DragonEvent;

    fn on_event(&mut self, event: DragonEvent) -> TickFlow {
        self.handle(event)
    }

    fn on_tick(&mut self) -> TickFlow {
        self.tick();
        TickFlow::Continue
    }

    fn is_valid(&self) -> bool {
        !self.despawned && !self.ctx.sink.is_closed()
    }

    fn on_stop(&mut self, reason: StopReason, leftovers: Vec<DragonEvent>) {
        if !self.despawned {
            debug!(id = self.id.raw(), ?reason, "driver stopped, despawning dragon");
            self.despawn();
        }
        if !leftovers.is_empty() {
            trace!(id = self.id.raw(), dropped = leftovers.len(), "dragon events after stop");
        }
    }
}
