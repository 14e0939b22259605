//! Kinematic cache and dead-reckoning.
//!
//! Every id seen in a snapshot gets a [`KinematicAnchor`]: the reported
//! position, speed and heading, and the moment they were captured. The
//! interpolator derives each display position from the anchor and the
//! current time alone, so repeated ticks never accumulate drift.
//!
//! # Model
//!
//! Flat-earth, constant-heading projection:
//!
//! ```text
//! deg_per_sec = ground_speed / 111_320
//! lon = anchor.lon + sin(heading) * deg_per_sec * elapsed
//! lat = anchor.lat + cos(heading) * deg_per_sec * elapsed
//! ```
//!
//! This is a known approximation. It ignores meridian convergence and great
//! circle curvature, which is acceptable for the few tens of seconds between
//! snapshots. Elapsed time is clamped to the staleness ceiling so a stalled
//! feed freezes aircraft instead of flinging them across the map.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::entity::{Entity, GeoPoint, Kinematics, METERS_PER_DEGREE};

/// Last-known kinematic state of one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicAnchor {
    pub position: GeoPoint,
    pub kinematics: Kinematics,
    pub captured_at: Instant,
}

impl KinematicAnchor {
    /// Anchor from a freshly normalized entity.
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            position: entity.reported_position,
            kinematics: entity.kinematics,
            captured_at: entity.snapshot_timestamp,
        }
    }

    /// Extrapolated position at `now`.
    ///
    /// Elapsed time beyond `stale_after` is ignored (frozen). A `now` earlier
    /// than the capture time is treated as zero elapsed.
    pub fn position_at(&self, now: Instant, stale_after: Duration) -> GeoPoint {
        let elapsed = now
            .saturating_duration_since(self.captured_at)
            .min(stale_after);
        dead_reckon(self.position, &self.kinematics, elapsed)
    }

    /// Returns true if extrapolation at `now` is frozen.
    pub fn is_stale(&self, now: Instant, stale_after: Duration) -> bool {
        now.saturating_duration_since(self.captured_at) > stale_after
    }
}

/// Project `origin` along `kinematics` for `elapsed`.
///
/// Zero, negative or non-finite speed yields `origin` unchanged.
pub fn dead_reckon(origin: GeoPoint, kinematics: &Kinematics, elapsed: Duration) -> GeoPoint {
    if !kinematics.is_moving() {
        return origin;
    }

    let degrees_per_sec = kinematics.ground_speed / METERS_PER_DEGREE;
    let distance_deg = degrees_per_sec * elapsed.as_secs_f64();
    let heading = kinematics.heading.to_radians();

    GeoPoint::new(
        origin.longitude + heading.sin() * distance_deg,
        origin.latitude + heading.cos() * distance_deg,
    )
}

/// Per-id kinematic anchors, persisting across snapshots.
#[derive(Debug, Default)]
pub struct KinematicCache {
    anchors: HashMap<String, KinematicAnchor>,
}

impl KinematicCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the anchor for `id`.
    pub fn record(&mut self, id: &str, anchor: KinematicAnchor) {
        match self.anchors.get_mut(id) {
            Some(existing) => *existing = anchor,
            None => {
                self.anchors.insert(id.to_string(), anchor);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&KinematicAnchor> {
        self.anchors.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<KinematicAnchor> {
        self.anchors.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.anchors.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STALE: Duration = Duration::from_secs(45);

    fn anchor(speed: f64, heading: f64) -> KinematicAnchor {
        KinematicAnchor {
            position: GeoPoint::new(10.0, 50.0),
            kinematics: Kinematics::new(speed, heading, 0.0),
            captured_at: Instant::now(),
        }
    }

    #[test]
    fn test_stationary_never_drifts() {
        let a = anchor(0.0, 123.0);
        for secs in [0, 1, 10, 44, 45, 120] {
            let now = a.captured_at + Duration::from_secs(secs);
            assert_eq!(a.position_at(now, STALE), a.position);
        }
    }

    #[test]
    fn test_exact_at_zero_elapsed() {
        let a = anchor(250.0, 37.0);
        assert_eq!(a.position_at(a.captured_at, STALE), a.position);
    }

    #[test]
    fn test_due_north_moves_latitude_only() {
        let a = anchor(METERS_PER_DEGREE, 0.0); // one degree per second
        let p = a.position_at(a.captured_at + Duration::from_secs(2), STALE);

        assert!((p.latitude - 52.0).abs() < 1e-9);
        assert!((p.longitude - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_due_east_moves_longitude_only() {
        let a = anchor(METERS_PER_DEGREE / 10.0, 90.0);
        let p = a.position_at(a.captured_at + Duration::from_secs(5), STALE);

        assert!((p.longitude - 10.5).abs() < 1e-9);
        assert!((p.latitude - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_along_heading() {
        // South-west: both coordinates decrease.
        let a = anchor(240.0, 225.0);
        let mut previous = a.position;
        for secs in 1..=45 {
            let p = a.position_at(a.captured_at + Duration::from_secs(secs), STALE);
            assert!(p.longitude < previous.longitude);
            assert!(p.latitude < previous.latitude);
            previous = p;
        }
    }

    #[test]
    fn test_frozen_after_staleness_ceiling() {
        let a = anchor(240.0, 90.0);
        let at_ceiling = a.position_at(a.captured_at + STALE, STALE);
        let later = a.position_at(a.captured_at + STALE + Duration::from_secs(1), STALE);
        let much_later = a.position_at(a.captured_at + Duration::from_secs(3600), STALE);

        assert_eq!(at_ceiling, later);
        assert_eq!(at_ceiling, much_later);
        assert!(a.is_stale(a.captured_at + Duration::from_secs(46), STALE));
        assert!(!a.is_stale(a.captured_at + Duration::from_secs(44), STALE));
    }

    #[test]
    fn test_now_before_capture_is_zero_elapsed() {
        let a = KinematicAnchor {
            captured_at: Instant::now() + Duration::from_secs(5),
            ..anchor(240.0, 90.0)
        };
        assert_eq!(a.position_at(Instant::now(), STALE), a.position);
    }

    #[test]
    fn test_cache_record_replaces() {
        let mut cache = KinematicCache::new();
        assert!(cache.is_empty());

        cache.record("abc", anchor(100.0, 0.0));
        cache.record("abc", anchor(200.0, 90.0));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("abc").unwrap().kinematics.ground_speed, 200.0);
        assert!(cache.remove("abc").is_some());
        assert!(!cache.contains("abc"));
    }
}
