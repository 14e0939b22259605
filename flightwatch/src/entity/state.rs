//! Core entity types.
//!
//! - [`GeoPoint`] - A longitude/latitude pair
//! - [`Kinematics`] - Speed, heading and climb rate at snapshot time
//! - [`Route`] - Origin and destination airport codes
//! - [`Entity`] - A tracked aircraft with its anchor and display position

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use super::{NOT_AVAILABLE, UNKNOWN};

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
}

impl GeoPoint {
    /// Create a new point from longitude and latitude.
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Returns true if both coordinates are finite and within WGS84 range.
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Euclidean distance to another point, in raw degrees.
    ///
    /// Not a geodesic distance. Only meaningful for small separations such
    /// as near-duplicate detection.
    pub fn degree_distance(&self, other: &GeoPoint) -> f64 {
        let dlon = self.longitude - other.longitude;
        let dlat = self.latitude - other.latitude;
        (dlon * dlon + dlat * dlat).sqrt()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Kinematic vector captured at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kinematics {
    /// Ground speed in meters per second.
    pub ground_speed: f64,
    /// Heading in degrees (0 = north, clockwise).
    pub heading: f64,
    /// Vertical rate in meters per second (positive = climbing).
    pub vertical_rate: f64,
}

impl Kinematics {
    /// Create a new kinematic vector.
    pub const fn new(ground_speed: f64, heading: f64, vertical_rate: f64) -> Self {
        Self {
            ground_speed,
            heading,
            vertical_rate,
        }
    }

    /// A vector with no motion.
    pub const fn stationary() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Returns true if the entity moves over the ground.
    pub fn is_moving(&self) -> bool {
        self.ground_speed.is_finite() && self.ground_speed > 0.0
    }
}

/// Origin and destination of a flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Departure airport code (IATA preferred, ICAO as fallback).
    pub origin_code: String,
    /// Arrival airport code (IATA preferred, ICAO as fallback).
    pub destination_code: String,
}

impl Route {
    pub fn new(origin_code: impl Into<String>, destination_code: impl Into<String>) -> Self {
        Self {
            origin_code: origin_code.into(),
            destination_code: destination_code.into(),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.origin_code, self.destination_code)
    }
}

/// A tracked aircraft.
///
/// # Reported vs Display Position
///
/// - **Reported** (`reported_position`): exactly what the last snapshot said.
///   Only replaced when the next snapshot for this id arrives.
///
/// - **Display** (`display_position`): the dead-reckoned estimate for "now".
///   Recomputed on every interpolator tick from the kinematic anchor, never
///   accumulated across ticks.
///
/// # Timestamp
///
/// `snapshot_timestamp` is the monotonic capture time used for
/// extrapolation. `observed_at` is the same moment on the wall clock, for
/// display.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Hex transponder code, or a synthesized `~`-prefixed fallback.
    pub id: String,
    pub callsign: String,
    pub origin_country: String,
    pub airline: String,
    pub aircraft_type: String,
    pub registration: String,
    pub flight_number: String,

    /// Position as last received from a snapshot.
    pub reported_position: GeoPoint,

    /// Position as currently extrapolated.
    pub display_position: GeoPoint,

    /// Kinematics at snapshot time.
    pub kinematics: Kinematics,

    /// Altitude in meters, if reported.
    pub altitude_m: Option<f64>,

    /// When the kinematics were captured (fetch completion time).
    pub snapshot_timestamp: Instant,

    /// Wall-clock equivalent of `snapshot_timestamp`.
    pub observed_at: DateTime<Utc>,

    pub route: Option<Route>,
    pub on_ground: bool,
}

impl Entity {
    /// Create an entity with placeholder metadata.
    ///
    /// The display position starts at the reported position.
    pub fn new(
        id: impl Into<String>,
        position: GeoPoint,
        kinematics: Kinematics,
        snapshot_timestamp: Instant,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            callsign: NOT_AVAILABLE.to_string(),
            origin_country: UNKNOWN.to_string(),
            airline: UNKNOWN.to_string(),
            aircraft_type: UNKNOWN.to_string(),
            registration: NOT_AVAILABLE.to_string(),
            flight_number: NOT_AVAILABLE.to_string(),
            reported_position: position,
            display_position: position,
            kinematics,
            altitude_m: None,
            snapshot_timestamp,
            observed_at,
            route: None,
            on_ground: false,
        }
    }

    /// Convenience constructor stamped with the current time.
    pub fn at_now(id: impl Into<String>, position: GeoPoint, kinematics: Kinematics) -> Self {
        Self::new(id, position, kinematics, Instant::now(), Utc::now())
    }

    /// Set the callsign (builder style).
    pub fn with_callsign(mut self, callsign: impl Into<String>) -> Self {
        self.callsign = callsign.into();
        self
    }

    /// Set the airline name (builder style).
    pub fn with_airline(mut self, airline: impl Into<String>) -> Self {
        self.airline = airline.into();
        self
    }

    /// Set the origin country (builder style).
    pub fn with_origin_country(mut self, country: impl Into<String>) -> Self {
        self.origin_country = country.into();
        self
    }

    /// Set the route (builder style).
    pub fn with_route(mut self, route: Route) -> Self {
        self.route = Some(route);
        self
    }

    /// Time elapsed since the snapshot was captured.
    pub fn age(&self) -> Duration {
        self.snapshot_timestamp.elapsed()
    }

    /// Ground speed in knots, for display.
    pub fn ground_speed_knots(&self) -> f64 {
        self.kinematics.ground_speed / super::KNOTS_TO_MPS
    }

    /// True for a `~index` id synthesized from the record's position in the
    /// batch. Such ids name a different aircraft in every snapshot.
    pub fn has_positional_id(&self) -> bool {
        self.id
            .strip_prefix('~')
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_validity() {
        assert!(GeoPoint::new(10.0, 53.5).is_valid());
        assert!(GeoPoint::new(-180.0, -90.0).is_valid());
        assert!(!GeoPoint::new(181.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 90.5).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_degree_distance() {
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(10.0003, 20.0004);
        assert!((a.degree_distance(&b) - 0.0005).abs() < 1e-9);
        assert_eq!(a.degree_distance(&a), 0.0);
    }

    #[test]
    fn test_new_entity_uses_placeholders() {
        let entity = Entity::at_now("3c6444", GeoPoint::new(9.98, 53.63), Kinematics::stationary());

        assert_eq!(entity.callsign, "N/A");
        assert_eq!(entity.registration, "N/A");
        assert_eq!(entity.flight_number, "N/A");
        assert_eq!(entity.origin_country, "Unknown");
        assert_eq!(entity.airline, "Unknown");
        assert_eq!(entity.aircraft_type, "Unknown");
        assert!(entity.route.is_none());
        assert_eq!(entity.display_position, entity.reported_position);
    }

    #[test]
    fn test_builders() {
        let entity = Entity::at_now("400f01", GeoPoint::new(-0.46, 51.47), Kinematics::stationary())
            .with_callsign("BAW123")
            .with_airline("British Airways")
            .with_origin_country("United Kingdom")
            .with_route(Route::new("LHR", "JFK"));

        assert_eq!(entity.callsign, "BAW123");
        assert_eq!(entity.airline, "British Airways");
        assert_eq!(entity.origin_country, "United Kingdom");
        assert_eq!(entity.route.as_ref().map(|r| r.to_string()).as_deref(), Some("LHR → JFK"));
    }

    #[test]
    fn test_kinematics_is_moving() {
        assert!(!Kinematics::stationary().is_moving());
        assert!(Kinematics::new(120.0, 90.0, 0.0).is_moving());
        assert!(!Kinematics::new(f64::NAN, 90.0, 0.0).is_moving());
    }

    #[test]
    fn test_ground_speed_knots() {
        let entity = Entity::at_now(
            "a1b2c3",
            GeoPoint::new(0.0, 0.0),
            Kinematics::new(super::super::KNOTS_TO_MPS * 450.0, 0.0, 0.0),
        );
        assert!((entity.ground_speed_knots() - 450.0).abs() < 1e-9);
    }

    #[test]
    fn test_positional_id() {
        let at = |id: &str| Entity::at_now(id, GeoPoint::new(0.0, 0.0), Kinematics::stationary());
        assert!(at("~3").has_positional_id());
        assert!(at("~120").has_positional_id());
        assert!(!at("~EZY12").has_positional_id());
        assert!(!at("~").has_positional_id());
        assert!(!at("400123").has_positional_id());
    }
}
