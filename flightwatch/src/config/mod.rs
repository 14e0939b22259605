//! User configuration for FlightWatch.
//!
//! Configuration lives in `~/.flightwatch/config.ini`, one `[section]` per
//! concern. Missing files and keys fall back to defaults; out-of-range
//! numbers are clamped with a warning; unparseable values are rejected.
//!
//! # Example
//!
//! ```ignore
//! use flightwatch::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let engine_config = config.engine_config();
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::*;
