//! Reference airport dataset.
//!
//! Airports are loaded once at startup and stay read-only for the lifetime of
//! the process. They feed the search ranker and the `airport` CLI lookup.
//!
//! # Data Source
//!
//! A JSON dataset in the shape of the community `airports.json` file, keyed by
//! ICAO code:
//!
//! ```text
//! {
//!   "KJFK": { "icao": "KJFK", "iata": "JFK", "name": "John F Kennedy International Airport",
//!             "city": "New York", "country": "US", "lat": 40.6398, "lon": -73.7789 },
//!   ...
//! }
//! ```
//!
//! A plain array of the same records is accepted as well. Files ending in
//! `.gz` are decompressed on the fly.
//!
//! # Example
//!
//! ```ignore
//! use flightwatch::airport::AirportIndex;
//!
//! let index = AirportIndex::from_path("airports.json.gz")?;
//! if let Some(airport) = index.get("jfk") {
//!     println!("{} is at ({}, {})", airport.name, airport.latitude, airport.longitude);
//! }
//! ```

mod index;
mod parser;

pub use index::{AirportIndex, AirportIndexError};
pub use parser::{DatasetParser, ParseError, ParsedDataset};

/// A reference airport.
///
/// Either code may be empty, but never both.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceAirport {
    /// ICAO code (e.g., "KJFK"), possibly empty.
    pub icao_code: String,
    /// IATA code (e.g., "JFK"), possibly empty.
    pub iata_code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl ReferenceAirport {
    /// Create an airport with codes and name; location fields start empty.
    pub fn new(icao_code: &str, iata_code: &str, name: &str) -> Self {
        Self {
            icao_code: icao_code.trim().to_uppercase(),
            iata_code: iata_code.trim().to_uppercase(),
            name: name.to_string(),
            city: String::new(),
            country: String::new(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    /// Set city and country (builder style).
    pub fn in_city(mut self, city: &str, country: &str) -> Self {
        self.city = city.to_string();
        self.country = country.to_string();
        self
    }

    /// Set the location (builder style).
    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Returns true if at least one code is present.
    pub fn has_code(&self) -> bool {
        !self.icao_code.is_empty() || !self.iata_code.is_empty()
    }

    /// Preferred display code: IATA if present, else ICAO.
    pub fn display_code(&self) -> &str {
        if self.iata_code.is_empty() {
            &self.icao_code
        } else {
            &self.iata_code
        }
    }
}

impl std::fmt::Display for ReferenceAirport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.display_code(), self.name)?;
        if !self.city.is_empty() {
            write!(f, " ({}", self.city)?;
            if !self.country.is_empty() {
                write!(f, ", {}", self.country)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
