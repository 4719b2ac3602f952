//! Tracker configuration.

use std::time::Duration;

/// Smallest permitted bulk batch size.
pub const MIN_BATCH_SIZE: usize = 1;

/// Largest permitted bulk batch size. Bounds the per-call transfer
/// buffer.
pub const MAX_BATCH_SIZE: usize = 100;

/// Default number of aircraft fetched per bulk call.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Default minimum interval between expensive (text) pulls.
pub const DEFAULT_INFO_INTERVAL: Duration = Duration::from_secs(3);

/// Configuration for [`AircraftTracker`](super::AircraftTracker).
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Aircraft per bulk call. Clamped to
    /// [[`MIN_BATCH_SIZE`], [`MAX_BATCH_SIZE`]] at tracker construction.
    pub batch_size: usize,

    /// Minimum interval between expensive (text) pulls. Newly appearing
    /// aircraft trigger an immediate pull regardless, so fresh records
    /// are not left with empty text fields for up to a full interval.
    pub info_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            info_interval: DEFAULT_INFO_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.info_interval, Duration::from_secs(3));
    }
}
