//! Configuration file handling for ~/.flightwatch/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], limits in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;
use crate::feed::FeedConfig;
use crate::search::SearchConfig;
use crate::tracker::{EngineConfig, TrackerConfig};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.flightwatch/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Write the commented INI form of this configuration to `path`,
    /// creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Feed client settings.
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            url: self.feed.url.clone(),
            format: self.feed.format,
            api_key: self.feed.api_key.clone(),
            poll_interval: Duration::from_secs(self.feed.poll_interval),
            max_entities: self.feed.max_entities,
            include_ground: self.feed.include_ground,
            timeout: Duration::from_secs(self.feed.timeout),
        }
    }

    /// Interpolation, trail and retention settings.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            tick_rate_hz: self.tracking.tick_rate_hz,
            stale_after: Duration::from_secs(self.tracking.stale_after),
            trail_length: self.tracking.trail_length,
            trail_epsilon_deg: self.tracking.trail_epsilon_deg,
            evict_after_cycles: self.tracking.evict_after_cycles,
        }
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            min_query_len: self.search.min_query_len,
            max_results: self.search.max_results,
        }
    }

    /// Complete engine configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            feed: self.feed_config(),
            tracker: self.tracker_config(),
            search: self.search_config(),
        }
    }
}

/// Get the path to the config directory (~/.flightwatch).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".flightwatch")
}

/// Get the path to the config file (~/.flightwatch/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedFormat, DEFAULT_FEED_URL};

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.feed.format, FeedFormat::Auto);
        assert!(config.feed.api_key.is_none());
        assert_eq!(config.feed.poll_interval, 15);
        assert_eq!(config.tracking.tick_rate_hz, 60);
        assert_eq!(config.tracking.stale_after, 45);
        assert_eq!(config.search.min_query_len, 2);
        assert!(config.airports.dataset.is_none());
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        let default = ConfigFile::default();

        assert_eq!(config.feed.url, default.feed.url);
        assert_eq!(config.tracking.trail_length, default.tracking.trail_length);
    }

    #[test]
    fn test_engine_config_conversion() {
        let mut config = ConfigFile::default();
        config.feed.poll_interval = 10;
        config.feed.max_entities = 250;
        config.tracking.stale_after = 30;
        config.search.max_results = 3;

        let engine = config.engine_config();
        assert_eq!(engine.feed.poll_interval, Duration::from_secs(10));
        assert_eq!(engine.feed.max_entities, 250);
        assert_eq!(engine.tracker.stale_after, Duration::from_secs(30));
        assert_eq!(engine.search.max_results, 3);
    }

    #[test]
    fn test_config_path_under_home() {
        let path = config_file_path();
        assert!(path.ends_with(".flightwatch/config.ini"));
    }
}
