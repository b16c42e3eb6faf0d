//! Sound and particle messages emitted by the dragon.

use glam::Vec3;
use wire::{LevelEvent, LevelEventKind, Message, PlaySound, SpawnParticleEffect};
use world::Dimension;

use crate::rng::SimRng;

pub const FLAP_SOUND: &str = "mob.enderdragon.flap";
pub const GROWL_SOUND: &str = "mob.enderdragon.growl";
pub const EXPLOSION_EMITTER: &str = "minecraft:huge_explosion_emitter";

/// Particles in one breath burst.
pub const BREATH_PARTICLES: usize = 8;

const FLAP_VOLUME: f32 = 5.0;
const GROWL_VOLUME: f32 = 2.5;

fn sound_pitch(rng: &mut SimRng) -> f32 {
    0.8 + rng.next_f32() * 0.3
}

pub fn flap_sound(position: Vec3, rng: &mut SimRng) -> PlaySound {
    PlaySound {
        sound: FLAP_SOUND.to_owned(),
        position,
        volume: FLAP_VOLUME,
        pitch: sound_pitch(rng),
    }
}

pub fn growl_sound(position: Vec3, rng: &mut SimRng) -> PlaySound {
    PlaySound {
        sound: GROWL_SOUND.to_owned(),
        position,
        volume: GROWL_VOLUME,
        pitch: sound_pitch(rng),
    }
}

/// Breath particles scattered around `center`.
pub fn breath_burst(center: Vec3, rng: &mut SimRng) -> Vec<LevelEvent> {
    (0..BREATH_PARTICLES)
        .map(|_| {
            let scatter = Vec3::new(rng.gaussian(), rng.gaussian(), rng.gaussian()) / 2.0;
            LevelEvent {
                kind: LevelEventKind::ParticleDragonsBreath,
                position: center + scatter,
                data: 0,
            }
        })
        .collect()
}

/// An explosion near `origin`.
///
/// `emitter` selects the large dimension-scoped emitter effect instead of a
/// single explosion particle.
pub fn explosion(origin: Vec3, dimension: Dimension, emitter: bool, rng: &mut SimRng) -> Message {
    let x = 8.0 * (rng.next_f32() - 0.5);
    let y = 4.0 * (rng.next_f32() - 0.5) + 2.0;
    let z = 8.0 * (rng.next_f32() - 0.5);
    let position = origin + Vec3::new(x, y, z);
    if emitter {
        SpawnParticleEffect {
            dimension_id: dimension.bedrock_id(),
            identifier: EXPLOSION_EMITTER.to_owned(),
            position,
        }
        .into()
    } else {
        LevelEvent {
            kind: LevelEventKind::ParticleExplosion,
            position,
            data: 0,
        }
        .into()
    }
}
