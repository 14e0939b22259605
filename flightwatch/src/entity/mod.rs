//! Tracked aircraft entities.
//!
//! This module defines the single internal shape that every upstream record
//! is normalized into, plus the unit system the kinematic model relies on.
//!
//! # Units
//!
//! All kinematics are stored in SI units regardless of the upstream source:
//!
//! | Quantity        | Unit                          |
//! |-----------------|-------------------------------|
//! | Ground speed    | meters per second             |
//! | Vertical rate   | meters per second             |
//! | Altitude        | meters                        |
//! | Heading         | degrees, 0 = north, clockwise |
//! | Position        | decimal degrees (WGS84)       |
//!
//! Conversion constants live here so that every normalizer uses the same
//! factors.

mod state;

pub use state::{Entity, GeoPoint, Kinematics, Route};

/// Meters per degree of arc used by the planar dead-reckoning model.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Knots to meters per second.
pub const KNOTS_TO_MPS: f64 = 0.514_444;

/// Kilometers per hour to meters per second.
pub const KMH_TO_MPS: f64 = 1.0 / 3.6;

/// Feet per minute to meters per second.
pub const FPM_TO_MPS: f64 = 0.005_08;

/// Feet to meters.
pub const FEET_TO_METERS: f64 = 0.3048;

/// Placeholder for absent identifier-like metadata (callsign, registration).
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for absent descriptive metadata (country, airline, type).
pub const UNKNOWN: &str = "Unknown";

/// Returns true if the value is one of the placeholder sentinels.
pub fn is_placeholder(value: &str) -> bool {
    value == NOT_AVAILABLE || value == UNKNOWN
}
