//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::feed::FeedFormat;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Upstream feed settings
    pub feed: FeedSettings,
    /// Interpolation, trail and retention settings
    pub tracking: TrackingSettings,
    /// Search settings
    pub search: SearchSettings,
    /// Reference airport dataset
    pub airports: AirportSettings,
    /// Weather lookup settings
    pub weather: WeatherSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Upstream feed configuration.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// Upstream or proxy URL
    pub url: String,
    /// Payload format, or auto-detect
    pub format: FeedFormat,
    /// Optional credential
    pub api_key: Option<String>,
    /// Seconds between snapshot requests (5-45)
    pub poll_interval: u64,
    /// Records kept per snapshot (1-1000)
    pub max_entities: usize,
    /// Keep aircraft reported on the ground
    pub include_ground: bool,
    /// HTTP request timeout in seconds
    pub timeout: u64,
}

/// Tracking configuration.
#[derive(Debug, Clone)]
pub struct TrackingSettings {
    /// Interpolator ticks per second (1-240)
    pub tick_rate_hz: u32,
    /// Seconds after which extrapolation freezes (30-60)
    pub stale_after: u64,
    /// Maximum points per trail
    pub trail_length: usize,
    /// Near-duplicate threshold for trail points, in degrees
    pub trail_epsilon_deg: f64,
    /// Commits an id may be absent before its anchor and trail are dropped.
    /// 0 disables eviction.
    pub evict_after_cycles: u64,
}

/// Search configuration.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Minimum query length in characters (1-2)
    pub min_query_len: usize,
    /// Results kept per category
    pub max_results: usize,
}

/// Airport dataset configuration.
#[derive(Debug, Clone, Default)]
pub struct AirportSettings {
    /// Path to a JSON or JSON.gz dataset
    pub dataset: Option<PathBuf>,
}

/// Weather lookup configuration.
#[derive(Debug, Clone)]
pub struct WeatherSettings {
    /// Forecast endpoint
    pub url: String,
    /// HTTP request timeout in seconds
    pub timeout: u64,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
