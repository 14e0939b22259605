//! Snapshot feed - upstream telemetry polling and normalization.
//!
//! The feed obtains a full snapshot of live flights from an upstream API (or a
//! trusted intermediary holding the credential) and turns it into the single
//! internal [`Entity`](crate::entity::Entity) shape.
//!
//! # Supported Upstreams
//!
//! - **OpenSky**: `/api/states/all` state vectors (m/s)
//! - **AviationStack**: `/v1/flights` records with a `live` block (km/h)
//! - **ADS-B Exchange v2**: `ac` aircraft list (knots, ft/min)
//!
//! # Architecture
//!
//! ```text
//! FeedClient trait → HttpFeedClient (reqwest)
//!     │
//!     └── UpstreamPayload (one variant per upstream shape)
//!             │
//!             └── normalize() → Vec<Entity> + NormalizeReport
//!                     │
//!                     └── TrackingEngine merge
//! ```
//!
//! The poll loop itself lives in the [`tracker`](crate::tracker) engine so
//! that merges happen under the engine's state lock.

mod client;
mod config;
mod error;
mod normalize;
mod upstream;

pub use client::{FeedClient, HttpFeedClient};
pub use config::{
    FeedConfig, FeedFormat, DEFAULT_FEED_TIMEOUT_SECS, DEFAULT_FEED_URL, DEFAULT_MAX_ENTITIES,
    DEFAULT_POLL_INTERVAL_SECS,
};
pub use error::FeedError;
pub use normalize::{normalize, NormalizeOptions, NormalizeReport, Normalized, Rejection};
pub use upstream::{
    AdsbxAircraft, AdsbxResponse, AviationStackFlight, AviationStackResponse, OpenSkyResponse,
    OpenSkyState, UpstreamPayload,
};
