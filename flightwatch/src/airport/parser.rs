//! Parser for the JSON airport dataset.
//!
//! Two layouts are accepted:
//! - an object keyed by ICAO code, whose values are airport records
//! - a plain array of airport records
//!
//! Keyed datasets are emitted in key order so that the index, and therefore
//! search tie-breaking, is deterministic across runs.

use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;

use super::ReferenceAirport;

/// Error type for dataset parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid airport dataset: {0}")]
    Json(#[from] serde_json::Error),
}

/// One airport record as found in the dataset.
///
/// Every field is optional; `null` and missing are treated alike.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DatasetRecord {
    icao: Option<String>,
    iata: Option<String>,
    name: Option<String>,
    city: Option<String>,
    country: Option<String>,
    #[serde(alias = "latitude")]
    lat: Option<f64>,
    #[serde(alias = "longitude")]
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Dataset {
    Keyed(BTreeMap<String, DatasetRecord>),
    List(Vec<DatasetRecord>),
}

/// Result of parsing a dataset.
#[derive(Debug, Default)]
pub struct ParsedDataset {
    pub airports: Vec<ReferenceAirport>,
    /// Records dropped because they carry neither an ICAO nor an IATA code.
    pub discarded: usize,
}

/// Parser for the JSON airport dataset.
pub struct DatasetParser;

impl DatasetParser {
    /// Parse all airports from a reader.
    pub fn parse_all<R: Read>(reader: R) -> Result<ParsedDataset, ParseError> {
        let dataset: Dataset = serde_json::from_reader(reader)?;
        let records: Vec<DatasetRecord> = match dataset {
            Dataset::Keyed(map) => map.into_values().collect(),
            Dataset::List(list) => list,
        };

        let mut parsed = ParsedDataset::default();
        for record in records {
            let airport = record.into_airport();
            if airport.has_code() {
                parsed.airports.push(airport);
            } else {
                parsed.discarded += 1;
            }
        }

        if parsed.discarded > 0 {
            tracing::debug!(
                discarded = parsed.discarded,
                "Skipped airport records without ICAO or IATA code"
            );
        }

        Ok(parsed)
    }
}

impl DatasetRecord {
    fn into_airport(self) -> ReferenceAirport {
        let text = |value: Option<String>| value.map(|s| s.trim().to_string()).unwrap_or_default();

        ReferenceAirport::new(
            &text(self.icao),
            &text(self.iata),
            &text(self.name),
        )
        .in_city(&text(self.city), &text(self.country))
        .at(self.lat.unwrap_or(0.0), self.lon.unwrap_or(0.0))
    }
}
