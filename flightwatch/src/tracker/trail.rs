//! Bounded per-entity position history.
//!
//! A trail is an insertion-ordered ring of distinct positions. Points within
//! `epsilon` degrees of the previous point are dropped, so an aircraft holding
//! on the ground does not fill its trail with copies of one spot.

use std::collections::{HashMap, VecDeque};

use crate::entity::GeoPoint;

/// Default maximum points per trail.
pub const DEFAULT_TRAIL_LENGTH: usize = 50;

/// Default near-duplicate threshold in degrees.
pub const DEFAULT_TRAIL_EPSILON_DEG: f64 = 0.001;

/// Trails for all entities, keyed by id.
#[derive(Debug)]
pub struct TrailBuffer {
    trails: HashMap<String, VecDeque<GeoPoint>>,
    capacity: usize,
    epsilon: f64,
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_LENGTH, DEFAULT_TRAIL_EPSILON_DEG)
    }
}

impl TrailBuffer {
    /// Create a buffer with the given per-trail capacity and epsilon.
    ///
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize, epsilon: f64) -> Self {
        Self {
            trails: HashMap::new(),
            capacity: capacity.max(1),
            epsilon,
        }
    }

    /// Append a point to the trail of `id`.
    ///
    /// Returns false if the point was suppressed as a near-duplicate.
    pub fn append(&mut self, id: &str, position: GeoPoint) -> bool {
        let capacity = self.capacity;
        let trail = self
            .trails
            .entry(id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(capacity));

        if let Some(last) = trail.back() {
            if last.degree_distance(&position) <= self.epsilon {
                return false;
            }
        }

        trail.push_back(position);
        while trail.len() > self.capacity {
            trail.pop_front();
        }
        true
    }

    /// Owned copy of the trail for `id`, oldest first.
    ///
    /// Empty if the id has no trail.
    pub fn snapshot(&self, id: &str) -> Vec<GeoPoint> {
        self.trails
            .get(id)
            .map(|trail| trail.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of points stored for `id`.
    pub fn len_of(&self, id: &str) -> usize {
        self.trails.get(id).map_or(0, VecDeque::len)
    }

    /// Drop the trail for `id`.
    pub fn remove(&mut self, id: &str) -> bool {
        self.trails.remove(id).is_some()
    }

    /// Number of ids with a trail.
    pub fn id_count(&self) -> usize {
        self.trails.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_duplicate_is_noop() {
        let mut buffer = TrailBuffer::default();

        assert!(buffer.append("abc", GeoPoint::new(10.0, 20.0)));
        assert!(!buffer.append("abc", GeoPoint::new(10.0001, 20.0001)));
        assert_eq!(buffer.len_of("abc"), 1);

        assert!(buffer.append("abc", GeoPoint::new(10.01, 20.01)));
        assert_eq!(buffer.len_of("abc"), 2);
    }

    #[test]
    fn test_capped_at_fifty_fifo() {
        let mut buffer = TrailBuffer::default();
        for i in 0..60 {
            buffer.append("abc", GeoPoint::new(i as f64 * 0.01, 0.0));
        }

        let trail = buffer.snapshot("abc");
        assert_eq!(trail.len(), 50);
        assert!((trail[0].longitude - 0.10).abs() < 1e-9);
        assert!((trail[49].longitude - 0.59).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut buffer = TrailBuffer::default();
        buffer.append("abc", GeoPoint::new(1.0, 1.0));

        let mut copy = buffer.snapshot("abc");
        copy.push(GeoPoint::new(2.0, 2.0));
        copy[0] = GeoPoint::new(9.0, 9.0);

        assert_eq!(buffer.snapshot("abc"), vec![GeoPoint::new(1.0, 1.0)]);
    }

    #[test]
    fn test_trails_are_independent_per_id() {
        let mut buffer = TrailBuffer::default();
        buffer.append("a", GeoPoint::new(1.0, 1.0));
        buffer.append("b", GeoPoint::new(1.0, 1.0));

        assert_eq!(buffer.len_of("a"), 1);
        assert_eq!(buffer.len_of("b"), 1);
        assert_eq!(buffer.id_count(), 2);
        assert!(buffer.snapshot("missing").is_empty());
    }

    #[test]
    fn test_remove() {
        let mut buffer = TrailBuffer::new(3, 0.001);
        buffer.append("a", GeoPoint::new(1.0, 1.0));
        assert!(buffer.remove("a"));
        assert!(!buffer.remove("a"));
        assert_eq!(buffer.id_count(), 0);
    }

    #[test]
    fn test_zero_capacity_raised_to_one() {
        let mut buffer = TrailBuffer::new(0, 0.001);
        buffer.append("a", GeoPoint::new(1.0, 1.0));
        buffer.append("a", GeoPoint::new(2.0, 2.0));
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.snapshot("a"), vec![GeoPoint::new(2.0, 2.0)]);
    }
}
