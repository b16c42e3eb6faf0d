//! Error types for the simulation core.

use std::fmt;

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

/// Errors surfaced by the simulation core.
///
/// None of these are fatal: callers degrade to doing nothing for the tick,
/// or start a fresh driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A history lookback reached past the buffer capacity.
    LookbackOutOfRange { ticks_ago: usize, capacity: usize },

    /// The tick driver has stopped and no longer accepts events.
    DriverClosed,

    /// A configuration value is out of range.
    InvalidConfig { field: &'static str, reason: String },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LookbackOutOfRange {
                ticks_ago,
                capacity,
            } => {
                write!(
                    f,
                    "history lookback {ticks_ago} out of range for capacity {capacity}"
                )
            }
            Self::DriverClosed => write!(f, "tick driver closed"),
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid config {field}: {reason}")
            }
        }
    }
}

impl std::error::Error for SimError {}
