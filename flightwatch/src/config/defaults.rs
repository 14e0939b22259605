//! Default values and limits for all configuration settings.
//!
//! Contains the `MIN_*`/`MAX_*` limits, the clamping helper,
//! and the `ConfigFile::default()` implementation.

use std::fmt::Display;

use super::file::config_directory;
use super::settings::*;
use crate::feed::{
    FeedFormat, DEFAULT_FEED_TIMEOUT_SECS, DEFAULT_FEED_URL, DEFAULT_MAX_ENTITIES,
    DEFAULT_POLL_INTERVAL_SECS,
};
use crate::search::{DEFAULT_MAX_RESULTS, DEFAULT_MIN_QUERY_LEN};
use crate::tracker::{
    DEFAULT_EVICT_AFTER_CYCLES, DEFAULT_STALE_AFTER_SECS, DEFAULT_TICK_RATE_HZ,
    DEFAULT_TRAIL_EPSILON_DEG, DEFAULT_TRAIL_LENGTH,
};
use crate::weather::DEFAULT_WEATHER_URL;

// =============================================================================
// Feed limits
// =============================================================================

/// Minimum poll interval in seconds.
pub const MIN_POLL_INTERVAL_SECS: u64 = 5;

/// Maximum poll interval in seconds.
pub const MAX_POLL_INTERVAL_SECS: u64 = 45;

/// Minimum per-snapshot entity cap.
pub const MIN_MAX_ENTITIES: usize = 1;

/// Maximum per-snapshot entity cap.
pub const MAX_MAX_ENTITIES: usize = 1000;

// =============================================================================
// Tracking limits
// =============================================================================

/// Minimum interpolator rate.
pub const MIN_TICK_RATE_HZ: u32 = 1;

/// Maximum interpolator rate.
pub const MAX_TICK_RATE_HZ: u32 = 240;

/// Minimum staleness ceiling in seconds.
pub const MIN_STALE_AFTER_SECS: u64 = 30;

/// Maximum staleness ceiling in seconds.
pub const MAX_STALE_AFTER_SECS: u64 = 60;

// =============================================================================
// Search limits
// =============================================================================

/// Minimum value for `min_query_len`.
pub const MIN_MIN_QUERY_LEN: usize = 1;

/// Maximum value for `min_query_len`.
pub const MAX_MIN_QUERY_LEN: usize = 2;

// =============================================================================
// Weather
// =============================================================================

/// Default weather request timeout in seconds.
pub const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 10;

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "flightwatch.log";

/// Clamp `value` to `[min, max]`, logging a warning if it was out of range.
pub(super) fn clamp_setting<T>(key: &str, value: T, min: T, max: T) -> T
where
    T: PartialOrd + Copy + Display,
{
    if value < min {
        tracing::warn!(
            key,
            requested = %value,
            min = %min,
            max = %max,
            "{} below minimum, clamping to {}",
            key,
            min
        );
        min
    } else if value > max {
        tracing::warn!(
            key,
            requested = %value,
            min = %min,
            max = %max,
            "{} above maximum, clamping to {}",
            key,
            max
        );
        max
    } else {
        value
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = config_directory();

        Self {
            feed: FeedSettings {
                url: DEFAULT_FEED_URL.to_string(),
                format: FeedFormat::Auto,
                api_key: None,
                poll_interval: DEFAULT_POLL_INTERVAL_SECS,
                max_entities: DEFAULT_MAX_ENTITIES,
                include_ground: false,
                timeout: DEFAULT_FEED_TIMEOUT_SECS,
            },
            tracking: TrackingSettings {
                tick_rate_hz: DEFAULT_TICK_RATE_HZ,
                stale_after: DEFAULT_STALE_AFTER_SECS,
                trail_length: DEFAULT_TRAIL_LENGTH,
                trail_epsilon_deg: DEFAULT_TRAIL_EPSILON_DEG,
                evict_after_cycles: DEFAULT_EVICT_AFTER_CYCLES,
            },
            search: SearchSettings {
                min_query_len: DEFAULT_MIN_QUERY_LEN,
                max_results: DEFAULT_MAX_RESULTS,
            },
            airports: AirportSettings::default(),
            weather: WeatherSettings {
                url: DEFAULT_WEATHER_URL.to_string(),
                timeout: DEFAULT_WEATHER_TIMEOUT_SECS,
            },
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
