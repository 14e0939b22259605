//! Ranked free-text search over tracked aircraft and reference airports.
//!
//! Search is stateless and read-only: it scores every candidate against the
//! query and keeps the best few per category.
//!
//! # Scoring
//!
//! Fields are grouped; within a group the best matching tier counts, and the
//! group scores add up. Matching is case-insensitive.
//!
//! | Aircraft group        | Exact | Prefix | Substring |
//! |-----------------------|-------|--------|-----------|
//! | Callsign / identifier | 100   | 50     | 20 (callsign only) |
//! | Airline               |       | 40     | 15        |
//! | Origin country        |       |        | 10        |
//! | Route codes           | 90    |        | 25        |
//!
//! | Airport group | Exact | Prefix | Substring |
//! |---------------|-------|--------|-----------|
//! | IATA / ICAO   | 100   | 80     |           |
//! | Name          |       | 60     | 30        |
//! | City          |       | 50     | 25        |
//! | Country       |       |        | 15        |
//!
//! Placeholder values ("N/A", "Unknown") never match.
//!
//! # Ordering
//!
//! Results are sorted by descending score. Equal scores keep their input
//! order; there is no secondary key.

mod ranker;

pub use ranker::{score_airport, score_entity, SearchRanker};

use crate::airport::ReferenceAirport;
use crate::entity::Entity;

/// Default minimum query length, in characters.
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Default results kept per category.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Search settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Queries shorter than this (after trimming) return nothing.
    pub min_query_len: usize,
    /// Results kept per category.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// A scored search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    pub item: T,
    pub score: u32,
}

/// Ranked hits for one query.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub entities: Vec<Ranked<Entity>>,
    pub airports: Vec<Ranked<ReferenceAirport>>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.airports.is_empty()
    }
}
