//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization, engine creation, and dataset loading
//! to reduce duplication across command handlers.

use std::path::PathBuf;
use std::time::Duration;

use flightwatch::airport::AirportIndex;
use flightwatch::config::ConfigFile;
use flightwatch::feed::HttpFeedClient;
use flightwatch::logging::{init_logging, split_log_path, LoggingGuard};
use flightwatch::tracker::TrackingEngine;
use flightwatch::weather::WeatherClient;
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// When stdout is a TTY, stdout logging is disabled so log lines do not
    /// interleave with the command's own tables.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging if RUST_LOG is unset
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let stdout_enabled = !atty::is(atty::Stream::Stdout);

        let logging_guard = init_logging(log_dir, log_file, stdout_enabled, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("FlightWatch v{}", flightwatch::VERSION);
        info!("FlightWatch CLI: {} command", command);
    }

    /// Create a tracking engine against the configured feed.
    ///
    /// `poll_interval` overrides the configured interval (still clamped to 5-45 s).
    pub fn create_engine(
        &self,
        poll_interval: Option<u64>,
    ) -> Result<TrackingEngine<HttpFeedClient>, CliError> {
        let mut engine_config = self.config.engine_config();
        if let Some(secs) = poll_interval {
            engine_config.feed.poll_interval = Duration::from_secs(secs.clamp(5, 45));
        }

        let client = HttpFeedClient::new(&engine_config.feed)?;
        info!(
            url = client.url(),
            format = %engine_config.feed.format,
            "Feed client created"
        );

        Ok(TrackingEngine::new(client, engine_config))
    }

    /// Load the airport dataset.
    ///
    /// `dataset` overrides the configured path. With no dataset configured,
    /// an empty index is returned.
    pub fn load_airports(&self, dataset: Option<PathBuf>) -> Result<AirportIndex, CliError> {
        match dataset.or_else(|| self.config.airports.dataset.clone()) {
            Some(path) => Ok(AirportIndex::from_path(&path)?),
            None => {
                info!("No airport dataset configured");
                Ok(AirportIndex::new())
            }
        }
    }

    /// Create a weather client for the configured endpoint.
    pub fn weather_client(&self) -> Result<WeatherClient, CliError> {
        Ok(WeatherClient::new(
            self.config.weather.url.clone(),
            Duration::from_secs(self.config.weather.timeout),
        )?)
    }
}
