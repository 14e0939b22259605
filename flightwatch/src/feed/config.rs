//! Configuration for the snapshot feed.

use std::str::FromStr;
use std::time::Duration;

/// Default upstream URL (OpenSky all-states endpoint).
pub const DEFAULT_FEED_URL: &str = "https://opensky-network.org/api/states/all";

/// Default poll interval (OpenSky anonymous access refreshes every ~10-15s).
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

/// Default cap on accepted records per snapshot.
pub const DEFAULT_MAX_ENTITIES: usize = 500;

/// Default HTTP timeout for a single snapshot request.
pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = 30;

/// Upstream payload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedFormat {
    /// Detect from the top-level key of the response.
    #[default]
    Auto,
    /// OpenSky `states/all`.
    OpenSky,
    /// AviationStack `flights`.
    AviationStack,
    /// ADS-B Exchange v2 (also readsb/tar1090 `aircraft.json` style).
    AdsbExchange,
}

impl FeedFormat {
    /// Config-file name of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::OpenSky => "opensky",
            Self::AviationStack => "aviationstack",
            Self::AdsbExchange => "adsbx",
        }
    }
}

impl std::fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "opensky" => Ok(Self::OpenSky),
            "aviationstack" => Ok(Self::AviationStack),
            "adsbx" | "adsbexchange" => Ok(Self::AdsbExchange),
            other => Err(format!("unknown feed format '{}'", other)),
        }
    }
}

/// Configuration for the snapshot feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Upstream (or proxy) URL.
    pub url: String,

    /// Expected payload format.
    pub format: FeedFormat,

    /// Optional API key, sent as `access_key` for AviationStack and as a
    /// bearer token otherwise.
    pub api_key: Option<String>,

    /// How often to poll.
    pub poll_interval: Duration,

    /// Maximum accepted records per snapshot, in upstream order.
    pub max_entities: usize,

    /// Keep aircraft reported on the ground.
    pub include_ground: bool,

    /// HTTP request timeout.
    pub timeout: Duration,
}

impl FeedConfig {
    /// Create a config pointing at a specific URL with defaults otherwise.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            format: FeedFormat::Auto,
            api_key: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_entities: DEFAULT_MAX_ENTITIES,
            include_ground: false,
            timeout: Duration::from_secs(DEFAULT_FEED_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FeedConfig::default();
        assert_eq!(config.url, DEFAULT_FEED_URL);
        assert_eq!(config.format, FeedFormat::Auto);
        assert!(config.api_key.is_none());
        assert_eq!(config.poll_interval, Duration::from_secs(15));
        assert_eq!(config.max_entities, 500);
        assert!(!config.include_ground);
    }

    #[test]
    fn test_format_round_trip_names() {
        for format in [
            FeedFormat::Auto,
            FeedFormat::OpenSky,
            FeedFormat::AviationStack,
            FeedFormat::AdsbExchange,
        ] {
            assert_eq!(format.as_str().parse::<FeedFormat>(), Ok(format));
        }
        assert_eq!("ADSBExchange".parse::<FeedFormat>(), Ok(FeedFormat::AdsbExchange));
        assert!("flightaware".parse::<FeedFormat>().is_err());
    }
}
