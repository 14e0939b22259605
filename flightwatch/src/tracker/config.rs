//! Configuration for the tracking engine.

use std::time::Duration;

use super::trail::{DEFAULT_TRAIL_EPSILON_DEG, DEFAULT_TRAIL_LENGTH};
use crate::feed::FeedConfig;
use crate::search::SearchConfig;

/// Default interpolation rate.
pub const DEFAULT_TICK_RATE_HZ: u32 = 60;

/// Default staleness ceiling after which extrapolation freezes.
pub const DEFAULT_STALE_AFTER_SECS: u64 = 45;

/// Default number of consecutive merges an id may be absent before its
/// kinematic anchor and trail are evicted.
pub const DEFAULT_EVICT_AFTER_CYCLES: u64 = 10;

/// Interpolation, trail and retention settings.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Interpolator ticks per second.
    pub tick_rate_hz: u32,

    /// Staleness ceiling.
    pub stale_after: Duration,

    /// Maximum points per trail.
    pub trail_length: usize,

    /// Near-duplicate threshold for trail points, in degrees.
    pub trail_epsilon_deg: f64,

    /// Evict cache/trail entries for ids unseen in this many merges.
    pub evict_after_cycles: u64,
}

impl TrackerConfig {
    /// Interval between interpolator ticks.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate_hz.max(1)))
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            stale_after: Duration::from_secs(DEFAULT_STALE_AFTER_SECS),
            trail_length: DEFAULT_TRAIL_LENGTH,
            trail_epsilon_deg: DEFAULT_TRAIL_EPSILON_DEG,
            evict_after_cycles: DEFAULT_EVICT_AFTER_CYCLES,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub feed: FeedConfig,
    pub tracker: TrackerConfig,
    pub search: SearchConfig,
}
