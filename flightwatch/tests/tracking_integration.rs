//! Integration tests for the tracking engine.
//!
//! These tests drive a [`TrackingEngine`] with a scripted feed and verify the
//! complete flow:
//! - Snapshot → store + kinematic cache + trails
//! - Interpolation between snapshots, including the staleness freeze
//! - Failure handling (last-known state kept, status degraded)
//! - Overlapping cycles (older response never overwrites a newer one)
//! - Search over live entities and airports
//! - Start/stop lifecycle with no mutation after stop
//!
//! Run with: `cargo test --test tracking_integration`

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Value};

use flightwatch::airport::{AirportIndex, ReferenceAirport};
use flightwatch::entity::GeoPoint;
use flightwatch::feed::{FeedClient, FeedError, UpstreamPayload};
use flightwatch::tracker::{EngineConfig, EngineError, FeedHealth, TrackingEngine};

// ============================================================================
// Test Helpers
// ============================================================================

/// One scripted feed response.
enum Step {
    Payload(Value),
    Delayed(Duration, Value),
    Fail(FeedError),
}

/// Feed client that replays a fixed script, then fails.
#[derive(Clone)]
struct ScriptedFeed {
    steps: Arc<Mutex<VecDeque<Step>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedFeed {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A feed that returns `payload` on every call.
    fn repeating(payload: Value, times: usize) -> Self {
        Self::new((0..times).map(|_| Step::Payload(payload.clone())).collect())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FeedClient for ScriptedFeed {
    async fn fetch_snapshot(&self) -> Result<UpstreamPayload, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().pop_front();

        match step {
            Some(Step::Payload(value)) => UpstreamPayload::from_value(value),
            Some(Step::Delayed(delay, value)) => {
                tokio::time::sleep(delay).await;
                UpstreamPayload::from_value(value)
            }
            Some(Step::Fail(error)) => Err(error),
            None => Err(FeedError::Http("script exhausted".to_string())),
        }
    }
}

/// OpenSky state vector: (icao24, callsign, lon, lat, velocity m/s, track).
fn state(icao: &str, callsign: &str, lon: f64, lat: f64, velocity: f64, track: f64) -> Value {
    json!([
        icao, callsign, "United Kingdom", 1700000000, 1700000000,
        lon, lat, 10000.0, false, velocity, track, 0.0, null, 10500.0, "1234", false, 0
    ])
}

fn opensky(states: Vec<Value>) -> Value {
    json!({ "time": 1700000000, "states": states })
}

fn two_flights() -> Value {
    opensky(vec![
        state("400a01", "BAW123  ", -0.45, 51.47, 111.32, 0.0),
        state("400a02", "BAW456  ", -0.30, 51.50, 0.0, 90.0),
    ])
}

fn test_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.feed.poll_interval = Duration::from_secs(5);
    config
}

fn airports() -> AirportIndex {
    AirportIndex::from_airports(vec![
        ReferenceAirport::new("KXYZ", "", "JFK Memorial Field").in_city("Somewhere", "US"),
        ReferenceAirport::new("KJFK", "JFK", "John F Kennedy International Airport")
            .in_city("New York", "US")
            .at(40.6398, -73.7789),
        ReferenceAirport::new("EGLL", "LHR", "London Heathrow")
            .in_city("London", "GB")
            .at(51.4775, -0.4614),
    ])
}

// ============================================================================
// Snapshot merge
// ============================================================================

#[tokio::test]
async fn test_poll_merges_snapshot() {
    let engine = TrackingEngine::new(ScriptedFeed::repeating(two_flights(), 1), test_config());

    let summary = engine.poll_once().await.unwrap();

    assert_eq!(summary.generation, 1);
    assert_eq!(summary.entities, 2);
    assert_eq!(summary.trail_points, 2);

    let entities = engine.entities();
    assert_eq!(entities[0].id, "400a01");
    assert_eq!(entities[0].callsign, "BAW123");
    assert_eq!(entities[1].id, "400a02");
    assert_eq!(engine.trail("400a01"), vec![GeoPoint::new(-0.45, 51.47)]);

    let status = engine.status();
    assert_eq!(status.health, FeedHealth::Live);
    assert_eq!(status.entity_count, 2);
    assert_eq!(status.snapshots, 1);
}

#[tokio::test]
async fn test_missing_id_dropped_but_trail_kept() {
    let feed = ScriptedFeed::new(vec![
        Step::Payload(two_flights()),
        Step::Payload(opensky(vec![state(
            "400a02", "BAW456", -0.29, 51.51, 0.0, 90.0,
        )])),
    ]);
    let engine = TrackingEngine::new(feed, test_config());

    engine.poll_once().await.unwrap();
    engine.poll_once().await.unwrap();

    assert!(engine.entity("400a01").is_none());
    assert_eq!(engine.entity_count(), 1);
    assert_eq!(engine.trail("400a01").len(), 1);
    assert_eq!(engine.trail("400a02").len(), 2);
    assert_eq!(engine.retained_count(), 2);
}

#[tokio::test]
async fn test_absent_ids_evicted() {
    let only_second = opensky(vec![state("400a02", "BAW456", -0.30, 51.50, 0.0, 90.0)]);
    let feed = ScriptedFeed::new(vec![
        Step::Payload(two_flights()),
        Step::Payload(only_second.clone()),
        Step::Payload(only_second),
    ]);
    let mut config = test_config();
    config.tracker.evict_after_cycles = 2;
    let engine = TrackingEngine::new(feed, config);

    engine.poll_once().await.unwrap();
    engine.poll_once().await.unwrap();
    assert_eq!(engine.retained_count(), 2);

    let summary = engine.poll_once().await.unwrap();
    assert_eq!(summary.evicted, 1);
    assert_eq!(engine.retained_count(), 1);
    assert!(engine.trail("400a01").is_empty());
}

// ============================================================================
// Interpolation
// ============================================================================

#[tokio::test]
async fn test_interpolation_moves_display_only() {
    let engine = TrackingEngine::new(ScriptedFeed::repeating(two_flights(), 1), test_config());
    engine.poll_once().await.unwrap();

    let anchor = engine.entity("400a01").unwrap();
    let t0 = anchor.snapshot_timestamp;

    // At elapsed zero the display matches the report exactly.
    engine.tick_at(t0);
    assert_eq!(
        engine.entity("400a01").unwrap().display_position,
        GeoPoint::new(-0.45, 51.47)
    );

    // 111.32 m/s due north is 0.001 degrees per second.
    engine.tick_at(t0 + Duration::from_secs(10));
    let moving = engine.entity("400a01").unwrap();
    assert!((moving.display_position.latitude - 51.48).abs() < 1e-9);
    assert!((moving.display_position.longitude - -0.45).abs() < 1e-9);
    assert_eq!(moving.reported_position, GeoPoint::new(-0.45, 51.47));

    // Zero speed never drifts.
    let stationary = engine.entity("400a02").unwrap();
    assert_eq!(stationary.display_position, stationary.reported_position);
}

#[tokio::test]
async fn test_extrapolation_freezes_after_staleness_ceiling() {
    let engine = TrackingEngine::new(ScriptedFeed::repeating(two_flights(), 1), test_config());
    engine.poll_once().await.unwrap();
    let t0 = engine.entity("400a01").unwrap().snapshot_timestamp;

    engine.tick_at(t0 + Duration::from_secs(45));
    let at_ceiling = engine.entity("400a01").unwrap().display_position;

    engine.tick_at(t0 + Duration::from_secs(300));
    let later = engine.entity("400a01").unwrap().display_position;

    assert_eq!(at_ceiling, later);
    assert!((later.latitude - (51.47 + 0.045)).abs() < 1e-9);
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_failures_keep_last_known_state() {
    let feed = ScriptedFeed::new(vec![
        Step::Payload(two_flights()),
        Step::Fail(FeedError::Status { status: 503 }),
        Step::Payload(opensky(vec![])),
    ]);
    let engine = TrackingEngine::new(feed, test_config());
    let mut status_rx = engine.subscribe_status();

    engine.poll_once().await.unwrap();
    assert!(status_rx.has_changed().unwrap());
    assert_eq!(status_rx.borrow_and_update().health, FeedHealth::Live);

    let result = engine.poll_once().await;
    assert!(matches!(result, Err(FeedError::Status { status: 503 })));
    assert_eq!(engine.entity_count(), 2);

    let status = status_rx.borrow_and_update().clone();
    assert_eq!(status.health, FeedHealth::Degraded);
    assert_eq!(status.consecutive_failures, 1);
    assert!(status.last_error.unwrap().contains("503"));

    let result = engine.poll_once().await;
    assert!(matches!(result, Err(FeedError::NoData { received: 0 })));
    assert_eq!(engine.entity_count(), 2);
    assert_eq!(engine.status().consecutive_failures, 2);
}

#[tokio::test]
async fn test_first_snapshot_with_no_usable_records_is_no_data() {
    let feed = ScriptedFeed::repeating(
        opensky(vec![json!(["400a01", "GND1", "UK", 0, 0, null, null])]),
        1,
    );
    let engine = TrackingEngine::new(feed, test_config());

    let result = engine.poll_once().await;
    assert!(matches!(result, Err(FeedError::NoData { received: 1 })));
    assert_eq!(engine.status().health, FeedHealth::Degraded);
}

// ============================================================================
// Overlapping cycles
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_slow_response_is_superseded() {
    let stale = opensky(vec![state("aaaaaa", "OLD1", 1.0, 1.0, 0.0, 0.0)]);
    let fresh = opensky(vec![state("bbbbbb", "NEW1", 2.0, 2.0, 0.0, 0.0)]);
    let feed = ScriptedFeed::new(vec![
        Step::Delayed(Duration::from_secs(5), stale),
        Step::Payload(fresh),
    ]);
    let engine = TrackingEngine::new(feed, test_config());

    let (slow, fast) = tokio::join!(engine.poll_once(), engine.poll_once());

    assert_eq!(fast.unwrap().generation, 2);
    assert!(matches!(
        slow,
        Err(FeedError::Superseded {
            generation: 1,
            committed: 2
        })
    ));

    assert!(engine.entity("bbbbbb").is_some());
    assert!(engine.entity("aaaaaa").is_none());
    assert!(engine.trail("aaaaaa").is_empty());
    assert_eq!(engine.status().health, FeedHealth::Live);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_over_live_entities_and_airports() {
    let engine = TrackingEngine::new(ScriptedFeed::repeating(two_flights(), 1), test_config());
    let airports = airports();

    engine.poll_once().await.unwrap();

    let results = engine.search("baw", &airports);
    let callsigns: Vec<&str> = results
        .entities
        .iter()
        .map(|r| r.item.callsign.as_str())
        .collect();
    assert_eq!(callsigns, vec!["BAW123", "BAW456"]);
    assert!(results.entities.iter().all(|r| r.score == 50));

    let results = engine.search("JFK", &airports);
    assert_eq!(results.airports[0].item.icao_code, "KJFK");
    assert_eq!(results.airports[0].score, 100);
    assert!(results.entities.is_empty());

    assert!(engine.search("b", &airports).is_empty());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_start_requires_runtime() {
    let engine = TrackingEngine::new(ScriptedFeed::new(Vec::new()), test_config());
    assert!(matches!(engine.start(), Err(EngineError::NoRuntime)));
    assert!(!engine.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_start_polls_and_stop_halts_mutation() {
    let feed = ScriptedFeed::repeating(two_flights(), 100);
    let engine = TrackingEngine::new(feed.clone(), test_config());
    let mut status_rx = engine.subscribe_status();

    engine.start().unwrap();
    assert!(engine.is_running());
    assert!(matches!(engine.start(), Err(EngineError::AlreadyRunning)));

    status_rx.changed().await.unwrap();
    assert_eq!(engine.entity_count(), 2);

    tokio::time::sleep(Duration::from_secs(12)).await;
    assert!(engine.status().snapshots >= 3);

    engine.stop().await;
    assert!(!engine.is_running());

    let snapshots = engine.status().snapshots;
    let calls = feed.calls();
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(engine.status().snapshots, snapshots);
    assert_eq!(feed.calls(), calls);

    // Stopping twice is harmless.
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_abandons_in_flight_cycle() {
    let feed = ScriptedFeed::new(vec![Step::Delayed(
        Duration::from_secs(20),
        two_flights(),
    )]);
    let engine = TrackingEngine::new(feed, test_config());

    engine.start().unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    engine.stop().await;

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(engine.entity_count(), 0);
    assert_eq!(engine.status().snapshots, 0);
    assert_eq!(engine.status().health, FeedHealth::Connecting);
}

#[tokio::test(start_paused = true)]
async fn test_engine_can_restart() {
    let engine = TrackingEngine::new(ScriptedFeed::repeating(two_flights(), 50), test_config());

    engine.start().unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    engine.stop().await;
    let first_run = engine.status().snapshots;
    assert!(first_run >= 1);

    engine.start().unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;
    engine.stop().await;
    assert!(engine.status().snapshots > first_run);
}
