//! Upstream payload shapes.
//!
//! Each supported upstream gets its own record type mirroring the wire
//! format, with every field optional. Responses keep their records as raw
//! JSON values and each record is decoded on its own
//! ([`OpenSkyState::from_row`], [`AviationStackFlight::from_record`],
//! [`AdsbxAircraft::from_record`]), so one malformed record never fails the
//! whole batch. Mapping into [`Entity`](crate::entity::Entity) happens in
//! [`normalize`](super::normalize) only.

use serde::Deserialize;
use serde_json::Value;

use super::config::FeedFormat;
use super::error::FeedError;

/// One decoded snapshot, tagged by upstream shape.
#[derive(Debug, Clone)]
pub enum UpstreamPayload {
    OpenSky(OpenSkyResponse),
    AviationStack(AviationStackResponse),
    AdsbExchange(AdsbxResponse),
}

impl UpstreamPayload {
    /// Decode a response body according to the configured format.
    ///
    /// With [`FeedFormat::Auto`] the shape is chosen from the top-level key:
    /// `states` → OpenSky, `data` → AviationStack, `ac` → ADS-B Exchange.
    pub fn decode(bytes: &[u8], format: FeedFormat) -> Result<Self, FeedError> {
        match format {
            FeedFormat::OpenSky => Ok(Self::OpenSky(serde_json::from_slice(bytes)?)),
            FeedFormat::AviationStack => Ok(Self::AviationStack(serde_json::from_slice(bytes)?)),
            FeedFormat::AdsbExchange => Ok(Self::AdsbExchange(serde_json::from_slice(bytes)?)),
            FeedFormat::Auto => {
                let value: Value = serde_json::from_slice(bytes)?;
                Self::from_value(value)
            }
        }
    }

    /// Detect the shape of an already-parsed JSON document.
    pub fn from_value(value: Value) -> Result<Self, FeedError> {
        let Some(object) = value.as_object() else {
            return Err(FeedError::UnrecognizedPayload);
        };

        if object.contains_key("states") {
            Ok(Self::OpenSky(serde_json::from_value(value)?))
        } else if object.contains_key("data") {
            Ok(Self::AviationStack(serde_json::from_value(value)?))
        } else if object.contains_key("ac") || object.contains_key("aircraft") {
            Ok(Self::AdsbExchange(serde_json::from_value(value)?))
        } else {
            Err(FeedError::UnrecognizedPayload)
        }
    }

    /// Format this payload was decoded as.
    pub fn format(&self) -> FeedFormat {
        match self {
            Self::OpenSky(_) => FeedFormat::OpenSky,
            Self::AviationStack(_) => FeedFormat::AviationStack,
            Self::AdsbExchange(_) => FeedFormat::AdsbExchange,
        }
    }

    /// Number of raw records in the payload.
    pub fn record_count(&self) -> usize {
        match self {
            Self::OpenSky(r) => r.states.as_ref().map_or(0, Vec::len),
            Self::AviationStack(r) => r.data.len(),
            Self::AdsbExchange(r) => r.ac.len(),
        }
    }
}

// =============================================================================
// OpenSky
// =============================================================================

/// OpenSky `states/all` response.
///
/// State vectors are positional JSON arrays; see [`OpenSkyState::from_row`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenSkyResponse {
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub states: Option<Vec<Vec<Value>>>,
}

/// One OpenSky state vector, decoded from its positional array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenSkyState {
    pub icao24: Option<String>,
    pub callsign: Option<String>,
    pub origin_country: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Barometric altitude in meters.
    pub baro_altitude: Option<f64>,
    pub on_ground: bool,
    /// Ground speed in m/s.
    pub velocity: Option<f64>,
    /// True track in degrees clockwise from north.
    pub true_track: Option<f64>,
    /// Vertical rate in m/s.
    pub vertical_rate: Option<f64>,
    /// Geometric altitude in meters.
    pub geo_altitude: Option<f64>,
}

impl OpenSkyState {
    /// Decode from a positional state-vector row.
    ///
    /// Index layout (OpenSky REST API):
    /// `0 icao24, 1 callsign, 2 origin_country, 3 time_position, 4 last_contact,
    /// 5 longitude, 6 latitude, 7 baro_altitude, 8 on_ground, 9 velocity,
    /// 10 true_track, 11 vertical_rate, 12 sensors, 13 geo_altitude, ...`
    ///
    /// Returns `None` if the row is too short to carry a position.
    pub fn from_row(row: &[Value]) -> Option<Self> {
        if row.len() < 12 {
            return None;
        }

        let text = |i: usize| row.get(i).and_then(Value::as_str).map(str::to_string);
        let number = |i: usize| row.get(i).and_then(Value::as_f64);

        Some(Self {
            icao24: text(0),
            callsign: text(1),
            origin_country: text(2),
            longitude: number(5),
            latitude: number(6),
            baro_altitude: number(7),
            on_ground: row.get(8).and_then(Value::as_bool).unwrap_or(false),
            velocity: number(9),
            true_track: number(10),
            vertical_rate: number(11),
            geo_altitude: number(13),
        })
    }
}

// =============================================================================
// AviationStack
// =============================================================================

/// AviationStack `flights` response.
///
/// Records are decoded individually with [`AviationStackFlight::from_record`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AviationStackResponse {
    #[serde(default)]
    pub data: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AviationStackFlight {
    /// `scheduled`, `active`, `landed`, `cancelled`, `incident`, `diverted`.
    pub flight_status: Option<String>,
    pub departure: Option<AviationStackEndpoint>,
    pub arrival: Option<AviationStackEndpoint>,
    pub airline: Option<AviationStackAirline>,
    pub flight: Option<AviationStackFlightCodes>,
    pub aircraft: Option<AviationStackAircraft>,
    pub live: Option<AviationStackLive>,
}

impl AviationStackFlight {
    /// Decode one element of the `data` array.
    ///
    /// Returns `None` if any field has the wrong JSON type.
    pub fn from_record(record: &Value) -> Option<Self> {
        Self::deserialize(record).ok()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AviationStackEndpoint {
    pub airport: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AviationStackAirline {
    pub name: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AviationStackFlightCodes {
    pub number: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AviationStackAircraft {
    pub registration: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub icao24: Option<String>,
}

/// Live position block. Speeds are in km/h, altitude in meters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AviationStackLive {
    pub updated: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub direction: Option<f64>,
    pub speed_horizontal: Option<f64>,
    pub speed_vertical: Option<f64>,
    pub is_ground: Option<bool>,
}

// =============================================================================
// ADS-B Exchange v2
// =============================================================================

/// ADS-B Exchange v2 response (`ac` array).
///
/// readsb/tar1090 `aircraft.json` uses `aircraft` for the same list.
/// Records are decoded individually with [`AdsbxAircraft::from_record`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdsbxResponse {
    #[serde(default, alias = "aircraft")]
    pub ac: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdsbxAircraft {
    pub hex: Option<String>,
    /// Callsign, padded with trailing spaces upstream.
    pub flight: Option<String>,
    /// Registration.
    pub r: Option<String>,
    /// ICAO type designator.
    pub t: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Ground speed in knots.
    pub gs: Option<f64>,
    pub track: Option<f64>,
    pub true_heading: Option<f64>,
    /// Barometric vertical rate in ft/min.
    pub baro_rate: Option<f64>,
    /// Geometric vertical rate in ft/min.
    pub geom_rate: Option<f64>,
    /// Feet, or the string `"ground"`.
    pub alt_baro: Option<Value>,
}

impl AdsbxAircraft {
    /// Decode one element of the `ac` array.
    ///
    /// Returns `None` if any field has the wrong JSON type.
    pub fn from_record(record: &Value) -> Option<Self> {
        Self::deserialize(record).ok()
    }

    /// True if `alt_baro` is the literal `"ground"`.
    pub fn is_on_ground(&self) -> bool {
        matches!(&self.alt_baro, Some(Value::String(s)) if s.eq_ignore_ascii_case("ground"))
    }

    /// Barometric altitude in feet, if numeric.
    pub fn altitude_ft(&self) -> Option<f64> {
        self.alt_baro.as_ref().and_then(Value::as_f64)
    }
}
