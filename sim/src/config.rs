//! Simulation configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

use world::Dimension;

use crate::dragon::{TAIL_LOOKBACK, TAIL_SEGMENTS};
use crate::error::{SimError, SimResult};

/// Shortest tick period a driver accepts.
pub const MIN_TICK_INTERVAL_MS: u64 = 1;

/// Smallest history that covers the deepest pose lookback.
pub const MIN_SEGMENT_HISTORY_LEN: usize = TAIL_LOOKBACK + 2 * (TAIL_SEGMENTS - 1) + 1;

/// Settings shared by every simulated object of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Whether the session caches chunks. Without a chunk cache the block
    /// grid cannot be queried and pistons run without moving blocks.
    pub cache_chunks: bool,

    /// Dimension the session is in.
    pub dimension: Dimension,

    /// Tick period in milliseconds.
    pub tick_interval_ms: u64,

    /// Number of pose samples a multi-part creature keeps.
    pub segment_history_len: usize,

    /// Seed for per-object random generators; `None` draws from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cache_chunks: true,
            dimension: Dimension::Overworld,
            // 20 ticks per second
            tick_interval_ms: 50,
            segment_history_len: 19,
            rng_seed: None,
        }
    }
}

impl SimConfig {
    /// Creates a configuration with a fixed seed for reproducible runs.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            rng_seed: Some(0x5EED_CAFE),
            ..Self::default()
        }
    }

    /// Checks values that would stall a driver or starve the pose lookbacks.
    pub fn validate(&self) -> SimResult<()> {
        if self.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(SimError::InvalidConfig {
                field: "tick_interval_ms",
                reason: format!("must be at least {MIN_TICK_INTERVAL_MS}"),
            });
        }
        if self.segment_history_len < MIN_SEGMENT_HISTORY_LEN {
            return Err(SimError::InvalidConfig {
                field: "segment_history_len",
                reason: format!("must be at least {MIN_SEGMENT_HISTORY_LEN}"),
            });
        }
        Ok(())
    }

    /// Returns the tick period, at least [`MIN_TICK_INTERVAL_MS`].
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(MIN_TICK_INTERVAL_MS))
    }

    /// Returns the history capacity, at least [`MIN_SEGMENT_HISTORY_LEN`].
    #[must_use]
    pub fn history_capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.segment_history_len.max(MIN_SEGMENT_HISTORY_LEN))
            .unwrap_or(NonZeroUsize::MIN)
    }
}
