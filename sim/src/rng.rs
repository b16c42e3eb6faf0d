//! Seedable per-object randomness.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Random source owned by one simulated object.
///
/// With a session seed every object gets its own reproducible stream,
/// derived from the seed and a per-object salt (entity id or position).
#[derive(Debug, Clone)]
pub struct SimRng {
    inner: Pcg32,
    spare_gaussian: Option<f32>,
}

impl SimRng {
    /// Creates a generator for one object.
    #[must_use]
    pub fn for_object(seed: Option<u64>, salt: u64) -> Self {
        let seed = match seed {
            Some(seed) => seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15),
            None => rand::random(),
        };
        Self::from_seed(seed)
    }

    /// Creates a generator from an exact seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
            spare_gaussian: None,
        }
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        self.inner.random()
    }

    /// Uniform integer in `[low, high)`.
    pub fn range(&mut self, low: u32, high: u32) -> u32 {
        self.inner.random_range(low..high)
    }

    /// Standard normal sample (mean 0, deviation 1).
    pub fn gaussian(&mut self) -> f32 {
        if let Some(spare) = self.spare_gaussian.take() {
            return spare;
        }
        // Box-Muller; u1 is kept away from zero so ln stays finite.
        let u1 = 1.0 - self.inner.random::<f64>();
        let u2 = self.inner.random::<f64>();
        let radius = (-2.0 * u1.ln()).sqrt();
        let angle = std::f64::consts::TAU * u2;
        self.spare_gaussian = Some((radius * angle.sin()) as f32);
        (radius * angle.cos()) as f32
    }
}
