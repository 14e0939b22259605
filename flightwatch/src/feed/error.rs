//! Error types for the snapshot feed.

use thiserror::Error;

/// Errors that can occur while obtaining or committing a snapshot.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Failed to construct the HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// HTTP request failed (network unreachable, timeout, connection reset).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Upstream answered with a non-success status.
    #[error("Upstream returned HTTP {status}")]
    Status { status: u16 },

    /// JSON deserialization failed.
    #[error("Failed to parse response: {0}")]
    Json(String),

    /// The response parsed as JSON but matched no known upstream shape.
    #[error("Unrecognized payload shape (expected one of: states, data, ac)")]
    UnrecognizedPayload,

    /// The snapshot contained no usable records.
    ///
    /// Treated as a failure so that "upstream is broken" is not mistaken for
    /// "the sky is empty".
    #[error("No usable flight data in snapshot ({received} records received)")]
    NoData { received: usize },

    /// A newer snapshot was already committed; this response is discarded.
    #[error("Snapshot generation {generation} superseded by {committed}")]
    Superseded { generation: u64, committed: u64 },

    /// The engine has been stopped; the snapshot was not committed.
    #[error("Engine stopped")]
    Stopped,
}

impl FeedError {
    /// Returns true if this error should mark the feed as degraded.
    ///
    /// Superseded and stopped cycles are bookkeeping outcomes, not upstream
    /// failures.
    pub fn is_degrading(&self) -> bool {
        !matches!(self, FeedError::Superseded { .. } | FeedError::Stopped)
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FeedError::Status {
                status: status.as_u16(),
            },
            None => FeedError::Http(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::Json(e.to_string())
    }
}
