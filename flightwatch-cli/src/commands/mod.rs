//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`airport`] - Airport lookup with optional weather
//! - [`config`] - Configuration management (path, init, show)
//! - [`search`] - Ranked search over live aircraft and airports
//! - [`track`] - Live aircraft table

pub mod airport;
pub mod config;
pub mod output;
pub mod search;
pub mod track;
