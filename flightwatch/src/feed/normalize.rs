//! Normalization of upstream records into [`Entity`].
//!
//! This is the only place where upstream field names and units are known.
//! Each payload variant has one mapping function; they all share the same
//! acceptance rules:
//!
//! 1. A record without a valid position is rejected.
//! 2. A record whose status excludes it from "in flight" is rejected
//!    (`on_ground` unless `include_ground`, AviationStack `landed`/`cancelled`/
//!    `diverted`).
//! 3. The first occurrence of an id wins; later duplicates are dropped.
//! 4. At most `max_entities` records are accepted, in upstream order.
//!
//! Missing speed or heading resolve to zero; missing metadata resolves to the
//! `N/A` / `Unknown` placeholders.

use std::collections::HashSet;
use std::time::Instant;

use chrono::{DateTime, Utc};

use super::config::FeedConfig;
use super::upstream::{
    AdsbxAircraft, AviationStackEndpoint, AviationStackFlight, OpenSkyState, UpstreamPayload,
};
use crate::entity::{
    Entity, GeoPoint, Kinematics, Route, FEET_TO_METERS, FPM_TO_MPS, KMH_TO_MPS, KNOTS_TO_MPS,
    NOT_AVAILABLE, UNKNOWN,
};

/// AviationStack statuses that mean the aircraft is not airborne.
const EXCLUDED_FLIGHT_STATUSES: &[&str] = &["landed", "cancelled", "diverted"];

/// Options controlling record acceptance.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
    pub max_entities: usize,
    pub include_ground: bool,
}

impl From<&FeedConfig> for NormalizeOptions {
    fn from(config: &FeedConfig) -> Self {
        Self {
            max_entities: config.max_entities,
            include_ground: config.include_ground,
        }
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::from(&FeedConfig::default())
    }
}

/// Why a record was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Position missing or out of range.
    NoPosition,
    /// On the ground or otherwise not in flight.
    NotInFlight,
    /// Record too short, structurally unusable, or a field has the wrong type.
    Malformed,
}

/// Per-snapshot accounting of accepted and dropped records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub received: usize,
    pub accepted: usize,
    pub no_position: usize,
    pub not_in_flight: usize,
    pub malformed: usize,
    pub duplicate: usize,
    /// Valid records dropped because the cap was reached.
    pub capped: usize,
}

impl NormalizeReport {
    fn reject(&mut self, reason: Rejection) {
        match reason {
            Rejection::NoPosition => self.no_position += 1,
            Rejection::NotInFlight => self.not_in_flight += 1,
            Rejection::Malformed => self.malformed += 1,
        }
    }
}

/// Result of normalizing one snapshot.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub entities: Vec<Entity>,
    pub report: NormalizeReport,
}

/// Capture context stamped onto every entity of one snapshot.
#[derive(Clone, Copy)]
struct Capture {
    at: Instant,
    observed_at: DateTime<Utc>,
    include_ground: bool,
}

/// Normalize a decoded payload into entities.
///
/// `captured_at` / `observed_at` become every entity's snapshot timestamp.
pub fn normalize(
    payload: &UpstreamPayload,
    options: &NormalizeOptions,
    captured_at: Instant,
    observed_at: DateTime<Utc>,
) -> Normalized {
    let capture = Capture {
        at: captured_at,
        observed_at,
        include_ground: options.include_ground,
    };

    let records: Vec<Result<Entity, Rejection>> = match payload {
        UpstreamPayload::OpenSky(response) => response
            .states
            .iter()
            .flatten()
            .enumerate()
            .map(|(index, row)| match OpenSkyState::from_row(row) {
                Some(state) => from_opensky(&state, index, &capture),
                None => Err(Rejection::Malformed),
            })
            .collect(),
        UpstreamPayload::AviationStack(response) => response
            .data
            .iter()
            .enumerate()
            .map(|(index, record)| match AviationStackFlight::from_record(record) {
                Some(flight) => from_aviationstack(&flight, index, &capture),
                None => Err(Rejection::Malformed),
            })
            .collect(),
        UpstreamPayload::AdsbExchange(response) => response
            .ac
            .iter()
            .enumerate()
            .map(|(index, record)| match AdsbxAircraft::from_record(record) {
                Some(aircraft) => from_adsbx(&aircraft, index, &capture),
                None => Err(Rejection::Malformed),
            })
            .collect(),
    };

    let mut report = NormalizeReport {
        received: records.len(),
        ..Default::default()
    };
    let mut seen = HashSet::new();
    let mut entities = Vec::with_capacity(records.len().min(options.max_entities));

    for record in records {
        match record {
            Ok(entity) => {
                if entities.len() >= options.max_entities {
                    report.capped += 1;
                } else if !seen.insert(entity.id.clone()) {
                    report.duplicate += 1;
                } else {
                    entities.push(entity);
                }
            }
            Err(reason) => report.reject(reason),
        }
    }
    report.accepted = entities.len();

    tracing::debug!(
        format = %payload.format(),
        received = report.received,
        accepted = report.accepted,
        no_position = report.no_position,
        not_in_flight = report.not_in_flight,
        malformed = report.malformed,
        duplicate = report.duplicate,
        capped = report.capped,
        "Snapshot normalized"
    );

    Normalized { entities, report }
}

// =============================================================================
// Per-upstream mapping
// =============================================================================

fn from_opensky(
    state: &OpenSkyState,
    index: usize,
    capture: &Capture,
) -> Result<Entity, Rejection> {
    let position = position(state.longitude, state.latitude)?;
    if state.on_ground && !capture.include_ground {
        return Err(Rejection::NotInFlight);
    }

    let callsign = clean(state.callsign.as_deref());
    let id = identifier(state.icao24.as_deref(), callsign, index);
    let kinematics = Kinematics::new(
        finite_or_zero(state.velocity),
        finite_or_zero(state.true_track),
        finite_or_zero(state.vertical_rate),
    );

    let mut entity = Entity::new(id, position, kinematics, capture.at, capture.observed_at);
    entity.callsign = or_placeholder(callsign, NOT_AVAILABLE);
    entity.origin_country = or_placeholder(clean(state.origin_country.as_deref()), UNKNOWN);
    entity.altitude_m = state.baro_altitude.or(state.geo_altitude);
    entity.on_ground = state.on_ground;
    Ok(entity)
}

fn from_aviationstack(
    flight: &AviationStackFlight,
    index: usize,
    capture: &Capture,
) -> Result<Entity, Rejection> {
    let live = flight.live.as_ref().ok_or(Rejection::NoPosition)?;
    let position = position(live.longitude, live.latitude)?;

    let status = flight.flight_status.as_deref().unwrap_or_default();
    if EXCLUDED_FLIGHT_STATUSES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(status))
    {
        return Err(Rejection::NotInFlight);
    }
    let on_ground = live.is_ground.unwrap_or(false);
    if on_ground && !capture.include_ground {
        return Err(Rejection::NotInFlight);
    }

    let codes = flight.flight.as_ref();
    let aircraft = flight.aircraft.as_ref();
    let callsign = clean(codes.and_then(|c| c.icao.as_deref()))
        .or_else(|| clean(codes.and_then(|c| c.iata.as_deref())));
    let hex = clean(aircraft.and_then(|a| a.icao24.as_deref()));
    let id = identifier(hex, callsign, index);

    let kinematics = Kinematics::new(
        finite_or_zero(live.speed_horizontal) * KMH_TO_MPS,
        finite_or_zero(live.direction),
        finite_or_zero(live.speed_vertical) * KMH_TO_MPS,
    );

    let mut entity = Entity::new(id, position, kinematics, capture.at, capture.observed_at);
    entity.callsign = or_placeholder(callsign, NOT_AVAILABLE);
    entity.airline = or_placeholder(
        clean(flight.airline.as_ref().and_then(|a| a.name.as_deref())),
        UNKNOWN,
    );
    entity.aircraft_type = or_placeholder(
        clean(aircraft.and_then(|a| a.icao.as_deref()))
            .or_else(|| clean(aircraft.and_then(|a| a.iata.as_deref()))),
        UNKNOWN,
    );
    entity.registration = or_placeholder(
        clean(aircraft.and_then(|a| a.registration.as_deref())),
        NOT_AVAILABLE,
    );
    entity.flight_number = or_placeholder(
        clean(codes.and_then(|c| c.iata.as_deref()))
            .or_else(|| clean(codes.and_then(|c| c.number.as_deref()))),
        NOT_AVAILABLE,
    );
    entity.route = route(flight.departure.as_ref(), flight.arrival.as_ref());
    entity.altitude_m = live.altitude.filter(|a| a.is_finite());
    entity.on_ground = on_ground;
    Ok(entity)
}

fn from_adsbx(
    aircraft: &AdsbxAircraft,
    index: usize,
    capture: &Capture,
) -> Result<Entity, Rejection> {
    let position = position(aircraft.lon, aircraft.lat)?;
    let on_ground = aircraft.is_on_ground();
    if on_ground && !capture.include_ground {
        return Err(Rejection::NotInFlight);
    }

    let callsign = clean(aircraft.flight.as_deref());
    let id = identifier(aircraft.hex.as_deref(), callsign, index);
    let kinematics = Kinematics::new(
        finite_or_zero(aircraft.gs) * KNOTS_TO_MPS,
        finite_or_zero(aircraft.track.or(aircraft.true_heading)),
        finite_or_zero(aircraft.baro_rate.or(aircraft.geom_rate)) * FPM_TO_MPS,
    );

    let mut entity = Entity::new(id, position, kinematics, capture.at, capture.observed_at);
    entity.callsign = or_placeholder(callsign, NOT_AVAILABLE);
    entity.registration = or_placeholder(clean(aircraft.r.as_deref()), NOT_AVAILABLE);
    entity.aircraft_type = or_placeholder(clean(aircraft.t.as_deref()), UNKNOWN);
    entity.altitude_m = aircraft.altitude_ft().map(|ft| ft * FEET_TO_METERS);
    entity.on_ground = on_ground;
    Ok(entity)
}

// =============================================================================
// Helpers
// =============================================================================

fn position(longitude: Option<f64>, latitude: Option<f64>) -> Result<GeoPoint, Rejection> {
    match (longitude, latitude) {
        (Some(lon), Some(lat)) => {
            let point = GeoPoint::new(lon, lat);
            if point.is_valid() {
                Ok(point)
            } else {
                Err(Rejection::NoPosition)
            }
        }
        _ => Err(Rejection::NoPosition),
    }
}

/// Trim, and treat empty strings as absent.
fn clean(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    value.unwrap_or(placeholder).to_string()
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Hex code (lowercased) when present, otherwise a synthesized `~` id.
fn identifier(hex: Option<&str>, callsign: Option<&str>, index: usize) -> String {
    match clean(hex) {
        Some(hex) => hex.to_lowercase(),
        None => synthesize_id(callsign, index),
    }
}

/// Fallback id: `~CALLSIGN` keeps trails continuous across snapshots when
/// the callsign is stable. `~index` is the last resort and carries no identity
/// between snapshots, so the tracker keeps no trail for it.
fn synthesize_id(callsign: Option<&str>, index: usize) -> String {
    match callsign {
        Some(callsign) => format!("~{}", callsign.to_uppercase()),
        None => format!("~{}", index),
    }
}

/// IATA code of an endpoint, falling back to ICAO.
fn endpoint_code(endpoint: Option<&AviationStackEndpoint>) -> Option<&str> {
    endpoint.and_then(|e| clean(e.iata.as_deref()).or_else(|| clean(e.icao.as_deref())))
}

fn route(
    departure: Option<&AviationStackEndpoint>,
    arrival: Option<&AviationStackEndpoint>,
) -> Option<Route> {
    match (endpoint_code(departure), endpoint_code(arrival)) {
        (None, None) => None,
        (origin, destination) => Some(Route::new(
            origin.unwrap_or(NOT_AVAILABLE),
            destination.unwrap_or(NOT_AVAILABLE),
        )),
    }
}
