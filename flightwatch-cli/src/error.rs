//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use flightwatch::airport::AirportIndexError;
use flightwatch::config::ConfigFileError;
use flightwatch::feed::FeedError;
use flightwatch::tracker::EngineError;
use flightwatch::weather::WeatherError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to create the feed client or fetch a snapshot
    Feed(FeedError),
    /// Engine lifecycle error
    Engine(EngineError),
    /// Failed to load the airport dataset
    Airports(AirportIndexError),
    /// Airport code not in the dataset
    AirportNotFound(String),
    /// Weather lookup failed
    Weather(WeatherError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Feed(FeedError::Status { status: 401 | 403 }) => {
                eprintln!();
                eprintln!("The feed rejected the request. Check that:");
                eprintln!("  1. api_key is set in the [feed] section of config.ini");
                eprintln!("  2. format matches the upstream (aviationstack keys go in the query)");
            }
            CliError::Feed(FeedError::Status { status: 429 }) => {
                eprintln!();
                eprintln!("The feed is rate limiting requests.");
                eprintln!("Raise poll_interval in the [feed] section of config.ini (max 45).");
            }
            CliError::Feed(FeedError::UnrecognizedPayload) => {
                eprintln!();
                eprintln!("Set format explicitly in the [feed] section of config.ini:");
                eprintln!("  opensky, aviationstack or adsbx");
            }
            CliError::Airports(AirportIndexError::NotFound(_)) | CliError::AirportNotFound(_) => {
                eprintln!();
                eprintln!("Airport data comes from the dataset configured in config.ini:");
                eprintln!("  [airports]");
                eprintln!("  dataset = ~/.flightwatch/airports.json.gz");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Feed(e) => write!(f, "Feed error: {}", e),
            CliError::Engine(e) => write!(f, "Tracking engine error: {}", e),
            CliError::Airports(e) => write!(f, "Failed to load airports: {}", e),
            CliError::AirportNotFound(code) => {
                write!(f, "Airport '{}' not found in the dataset", code)
            }
            CliError::Weather(e) => write!(f, "Weather lookup failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Feed(e) => Some(e),
            CliError::Engine(e) => Some(e),
            CliError::Airports(e) => Some(e),
            CliError::Weather(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<FeedError> for CliError {
    fn from(e: FeedError) -> Self {
        CliError::Feed(e)
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        CliError::Engine(e)
    }
}

impl From<AirportIndexError> for CliError {
    fn from(e: AirportIndexError) -> Self {
        CliError::Airports(e)
    }
}

impl From<WeatherError> for CliError {
    fn from(e: WeatherError) -> Self {
        CliError::Weather(e)
    }
}
