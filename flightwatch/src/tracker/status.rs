//! Feed connectivity status for consumers.
//!
//! The status is independent of the entity set: during an upstream outage the
//! last-known entities stay visible while the status reports `Degraded`.

use chrono::{DateTime, Utc};

/// Connectivity to the upstream feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedHealth {
    /// No snapshot committed yet.
    #[default]
    Connecting,
    /// Last cycle committed successfully.
    Live,
    /// Last cycle failed; showing last-known state.
    Degraded,
}

impl std::fmt::Display for FeedHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting"),
            Self::Live => write!(f, "Live"),
            Self::Degraded => write!(f, "Degraded"),
        }
    }
}

/// Complete feed status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedStatus {
    pub health: FeedHealth,

    /// Human-readable message from the most recent failure.
    pub last_error: Option<String>,

    /// Failures since the last successful commit.
    pub consecutive_failures: u32,

    /// Wall-clock time of the last successful commit.
    pub last_success: Option<DateTime<Utc>>,

    /// Entities in the store after the last commit.
    pub entity_count: usize,

    /// Total committed snapshots.
    pub snapshots: u64,
}

impl FeedStatus {
    /// Record a successful commit.
    pub(crate) fn mark_success(&mut self, entity_count: usize, at: DateTime<Utc>) {
        self.health = FeedHealth::Live;
        self.last_error = None;
        self.consecutive_failures = 0;
        self.last_success = Some(at);
        self.entity_count = entity_count;
        self.snapshots += 1;
    }

    /// Record a failed cycle. The entity count is left as-is.
    pub(crate) fn mark_failure(&mut self, message: String) {
        self.health = FeedHealth::Degraded;
        self.last_error = Some(message);
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    pub fn is_live(&self) -> bool {
        self.health == FeedHealth::Live
    }
}
