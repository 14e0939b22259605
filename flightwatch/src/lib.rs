//! FlightWatch - live aircraft tracking engine
//!
//! This library keeps a smoothly moving picture of live air traffic from a
//! telemetry source that only reports every few seconds. It merges each
//! snapshot into a keyed entity set, dead-reckons every aircraft between
//! snapshots, keeps a short trail per aircraft, and ranks free-text queries
//! across aircraft and a reference airport dataset.
//!
//! # High-Level API
//!
//! The [`tracker`] module provides the engine context:
//!
//! ```ignore
//! use flightwatch::feed::{FeedConfig, HttpFeedClient};
//! use flightwatch::tracker::{EngineConfig, TrackingEngine};
//!
//! let config = EngineConfig::default();
//! let client = HttpFeedClient::new(&config.feed)?;
//! let engine = TrackingEngine::new(client, config);
//!
//! engine.start()?;
//! for entity in engine.entities() {
//!     println!("{} at {:?}", entity.callsign, entity.display_position);
//! }
//! engine.stop().await;
//! ```

pub mod airport;
pub mod config;
pub mod entity;
pub mod feed;
pub mod logging;
pub mod search;
pub mod tracker;
pub mod weather;

/// Version of the FlightWatch library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
