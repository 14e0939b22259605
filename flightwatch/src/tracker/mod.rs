//! Live entity tracking.
//!
//! Merges feed snapshots into a keyed entity set and keeps every aircraft
//! moving smoothly between snapshots.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  snapshot   ┌────────────────────────────────────┐
//! │  FeedClient  │ ──────────► │ TrackerState (one RwLock)           │
//! └──────────────┘   poller    │  ├─ KinematicCache  (anchors)       │
//!                              │  ├─ TrailBuffer     (history)       │
//!                              │  └─ EntityStore     (current set)   │
//!                              └────────────────────────────────────┘
//!                                    ▲ display_position   │ read
//!                               interpolator         search / consumers
//! ```
//!
//! Only the poller writes the cache, the trails and the store. Only the
//! interpolator writes `display_position`. Search is read-only.

mod config;
mod engine;
mod kinematics;
mod scheduler;
mod status;
mod store;
mod trail;

pub use config::{
    EngineConfig, TrackerConfig, DEFAULT_EVICT_AFTER_CYCLES, DEFAULT_STALE_AFTER_SECS,
    DEFAULT_TICK_RATE_HZ,
};
pub use engine::{CommitSummary, EngineError, TrackingEngine};
pub use kinematics::{dead_reckon, KinematicAnchor, KinematicCache};
pub use scheduler::spawn_periodic;
pub use status::{FeedHealth, FeedStatus};
pub use store::EntityStore;
pub use trail::{TrailBuffer, DEFAULT_TRAIL_EPSILON_DEG, DEFAULT_TRAIL_LENGTH};
