//! Airport index with ICAO/IATA code lookup.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::parser::{DatasetParser, ParseError};
use super::ReferenceAirport;

/// Error type for airport index operations.
#[derive(Debug, thiserror::Error)]
pub enum AirportIndexError {
    #[error("Airport dataset not found at: {0}")]
    NotFound(PathBuf),
    #[error("Failed to parse airport dataset: {0}")]
    ParseError(#[from] ParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only index of reference airports.
///
/// Airports are kept in load order for ranking; codes map into that list.
#[derive(Debug, Default)]
pub struct AirportIndex {
    airports: Vec<ReferenceAirport>,
    by_code: HashMap<String, usize>,
}

impl AirportIndex {
    /// Create an empty airport index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from already-loaded airports.
    ///
    /// Airports without any code are dropped. When two airports share a
    /// code, lookups resolve to the first.
    pub fn from_airports(airports: impl IntoIterator<Item = ReferenceAirport>) -> Self {
        let mut index = Self::new();
        for airport in airports.into_iter().filter(ReferenceAirport::has_code) {
            let position = index.airports.len();
            for code in [&airport.icao_code, &airport.iata_code] {
                if !code.is_empty() {
                    index.by_code.entry(code.clone()).or_insert(position);
                }
            }
            index.airports.push(airport);
        }
        index
    }

    /// Build an airport index from a dataset file.
    ///
    /// Supports both plain `.json` and gzip compressed `.json.gz` files.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AirportIndexError> {
        use flate2::read::GzDecoder;

        let path = path.as_ref();
        if !path.exists() {
            return Err(AirportIndexError::NotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;

        if path.extension().is_some_and(|ext| ext == "gz") {
            tracing::debug!(path = %path.display(), "Loading gzip compressed airport dataset");
            Self::from_json_reader(BufReader::new(GzDecoder::new(file)))
        } else {
            Self::from_json_reader(BufReader::new(file))
        }
    }

    /// Build an airport index from a JSON reader.
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self, AirportIndexError> {
        let parsed = DatasetParser::parse_all(reader)?;
        let index = Self::from_airports(parsed.airports);

        tracing::info!(
            count = index.len(),
            discarded = parsed.discarded,
            "Built airport index"
        );

        Ok(index)
    }

    /// Get an airport by ICAO or IATA code, case-insensitive.
    pub fn get(&self, code: &str) -> Option<&ReferenceAirport> {
        self.by_code
            .get(&code.trim().to_uppercase())
            .map(|&i| &self.airports[i])
    }

    /// Returns the number of airports in the index.
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Returns an iterator over all airports in load order.
    pub fn iter(&self) -> impl Iterator<Item = &ReferenceAirport> {
        self.airports.iter()
    }
}
