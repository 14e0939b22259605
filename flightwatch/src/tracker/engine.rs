//! Tracking engine - owns the entity store, kinematic cache and trails.
//!
//! The engine is an explicit context object: several engines can run side by
//! side, and each has a scoped lifetime via [`TrackingEngine::start`] and
//! [`TrackingEngine::stop`].
//!
//! # Activities
//!
//! - **Poller**: every `poll_interval`, spawns one fetch cycle. Cycles run
//!   independently so a hung request never delays the next one.
//! - **Interpolator**: every tick, recomputes `display_position` for every
//!   entity from its kinematic anchor.
//!
//! # Consistency
//!
//! A commit takes the state write lock once: kinematic anchors and trails are
//! updated first, then the store is replaced. Readers never observe a partial
//! merge.
//!
//! Every cycle takes a generation number before its request goes out. A
//! response is only committed if its generation is newer than the last
//! committed one, so a slow response can never overwrite a fresher snapshot.
//!
//! # Retention
//!
//! Anchors and trails outlive a single snapshot so that an aircraft briefly
//! missing from the feed keeps its trail. Ids absent for
//! `evict_after_cycles` consecutive commits are evicted. Positional `~index`
//! ids name a different aircraft in every snapshot and keep no trail.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::config::EngineConfig;
use super::kinematics::{KinematicAnchor, KinematicCache};
use super::scheduler::spawn_periodic;
use super::status::FeedStatus;
use super::store::EntityStore;
use super::trail::TrailBuffer;
use crate::airport::AirportIndex;
use crate::entity::{Entity, GeoPoint};
use crate::feed::{normalize, FeedClient, FeedError, NormalizeOptions, Normalized};
use crate::search::{SearchRanker, SearchResults};

/// Errors from engine lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Tracking engine is already running")]
    AlreadyRunning,

    #[error("Tracking engine must be started from within a Tokio runtime")]
    NoRuntime,
}

/// Outcome of a committed snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitSummary {
    /// Generation of the committed cycle.
    pub generation: u64,
    /// Entities now in the store.
    pub entities: usize,
    /// Trail points actually appended (near-duplicates excluded).
    pub trail_points: usize,
    /// Ids whose anchor and trail were evicted by this commit.
    pub evicted: usize,
}

/// Mutable engine state, guarded by one lock.
#[derive(Debug)]
pub(crate) struct TrackerState {
    store: EntityStore,
    kinematics: KinematicCache,
    trails: TrailBuffer,
    /// Commit number at which each retained id was last present.
    last_seen: HashMap<String, u64>,
    commits: u64,
    committed_generation: u64,
    status: FeedStatus,
}

impl TrackerState {
    pub(crate) fn new(trail_length: usize, trail_epsilon_deg: f64) -> Self {
        Self {
            store: EntityStore::new(),
            kinematics: KinematicCache::new(),
            trails: TrailBuffer::new(trail_length, trail_epsilon_deg),
            last_seen: HashMap::new(),
            commits: 0,
            committed_generation: 0,
            status: FeedStatus::default(),
        }
    }

    /// Merge a normalized snapshot.
    ///
    /// Rejects empty snapshots and generations not newer than the last commit;
    /// in both cases nothing is modified.
    pub(crate) fn commit(
        &mut self,
        generation: u64,
        entities: Vec<Entity>,
        evict_after_cycles: u64,
    ) -> Result<CommitSummary, FeedError> {
        if generation <= self.committed_generation {
            return Err(FeedError::Superseded {
                generation,
                committed: self.committed_generation,
            });
        }
        if entities.is_empty() {
            return Err(FeedError::NoData { received: 0 });
        }

        self.commits += 1;
        let mut trail_points = 0;

        for entity in &entities {
            self.kinematics
                .record(&entity.id, KinematicAnchor::from_entity(entity));
            if entity.has_positional_id() {
                self.trails.remove(&entity.id);
            } else if self.trails.append(&entity.id, entity.reported_position) {
                trail_points += 1;
            }
            match self.last_seen.get_mut(&entity.id) {
                Some(seen) => *seen = self.commits,
                None => {
                    self.last_seen.insert(entity.id.clone(), self.commits);
                }
            }
        }

        self.store.replace(entities);
        self.committed_generation = generation;
        let evicted = self.evict_absent(evict_after_cycles);

        Ok(CommitSummary {
            generation,
            entities: self.store.len(),
            trail_points,
            evicted,
        })
    }

    /// Drop anchors and trails for ids absent from the last `cycles` commits.
    ///
    /// Zero disables eviction.
    fn evict_absent(&mut self, cycles: u64) -> usize {
        if cycles == 0 {
            return 0;
        }

        let commits = self.commits;
        let expired: Vec<String> = self
            .last_seen
            .iter()
            .filter(|&(_, &seen)| commits - seen >= cycles)
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            self.last_seen.remove(id);
            self.kinematics.remove(id);
            self.trails.remove(id);
        }

        if !expired.is_empty() {
            tracing::debug!(evicted = expired.len(), "Evicted absent aircraft");
        }
        expired.len()
    }

    /// Recompute display positions from the kinematic anchors.
    ///
    /// Entities without an anchor keep their current display position.
    /// Returns the number of entities updated.
    pub(crate) fn interpolate(&mut self, now: Instant, stale_after: Duration) -> usize {
        let Self {
            store, kinematics, ..
        } = self;

        let mut updated = 0;
        for entity in store.iter_mut() {
            if let Some(anchor) = kinematics.get(&entity.id) {
                entity.display_position = anchor.position_at(now, stale_after);
                updated += 1;
            }
        }
        updated
    }
}

/// State shared between the engine handle and its background tasks.
struct EngineShared<C> {
    client: C,
    config: EngineConfig,
    state: RwLock<TrackerState>,
    status_tx: watch::Sender<FeedStatus>,
    generation: AtomicU64,
}

impl<C: FeedClient> EngineShared<C> {
    /// Run one fetch-and-commit cycle.
    ///
    /// `cancellation`, when given, is checked under the state lock so that no
    /// commit lands after the engine was stopped.
    async fn run_cycle(
        &self,
        cancellation: Option<&CancellationToken>,
    ) -> Result<CommitSummary, FeedError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.fetch().await;
        self.settle(generation, result, cancellation)
    }

    async fn fetch(&self) -> Result<Normalized, FeedError> {
        let payload = self.client.fetch_snapshot().await?;
        let options = NormalizeOptions::from(&self.config.feed);
        let normalized = normalize(&payload, &options, Instant::now(), Utc::now());

        if normalized.entities.is_empty() {
            return Err(FeedError::NoData {
                received: normalized.report.received,
            });
        }
        Ok(normalized)
    }

    /// Commit or record the failure of a cycle, then publish the status.
    fn settle(
        &self,
        generation: u64,
        result: Result<Normalized, FeedError>,
        cancellation: Option<&CancellationToken>,
    ) -> Result<CommitSummary, FeedError> {
        let mut state = self.state.write();

        if cancellation.is_some_and(CancellationToken::is_cancelled) {
            tracing::debug!(generation, "Engine stopped, discarding snapshot");
            return Err(FeedError::Stopped);
        }

        let outcome = match result {
            Ok(normalized) => state.commit(
                generation,
                normalized.entities,
                self.config.tracker.evict_after_cycles,
            ),
            // A failure older than the last commit says nothing about the
            // current health of the feed.
            Err(e) if generation <= state.committed_generation => {
                tracing::debug!(error = %e, generation, "Ignoring failure of superseded cycle");
                Err(FeedError::Superseded {
                    generation,
                    committed: state.committed_generation,
                })
            }
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(summary) => {
                state.status.mark_success(summary.entities, Utc::now());
                tracing::debug!(
                    generation,
                    entities = summary.entities,
                    trail_points = summary.trail_points,
                    evicted = summary.evicted,
                    "Snapshot committed"
                );
            }
            Err(e) if e.is_degrading() => {
                state.status.mark_failure(e.to_string());
                tracing::warn!(
                    error = %e,
                    consecutive_failures = state.status.consecutive_failures,
                    "Snapshot cycle failed, keeping last-known state"
                );
            }
            Err(e) => {
                tracing::debug!(error = %e, "Snapshot discarded");
            }
        }

        let status = state.status.clone();
        drop(state);
        self.status_tx.send_replace(status);

        outcome
    }

    fn interpolate(&self, now: Instant) -> usize {
        self.state
            .write()
            .interpolate(now, self.config.tracker.stale_after)
    }
}

/// Handles for a running engine.
struct RunningTasks {
    cancellation: CancellationToken,
    poller: JoinHandle<()>,
    interpolator: JoinHandle<()>,
}

/// Live aircraft tracking engine.
///
/// # Usage
///
/// ```ignore
/// let engine = TrackingEngine::new(client, EngineConfig::default());
/// engine.start()?;
///
/// let mut status = engine.subscribe_status();
/// status.changed().await?;
///
/// let results = engine.search("baw", &airports);
/// engine.stop().await;
/// ```
pub struct TrackingEngine<C: FeedClient> {
    shared: Arc<EngineShared<C>>,
    running: Mutex<Option<RunningTasks>>,
}

impl<C: FeedClient + 'static> TrackingEngine<C> {
    /// Create an engine. Nothing runs until [`start`](Self::start).
    pub fn new(client: C, config: EngineConfig) -> Self {
        let state = TrackerState::new(
            config.tracker.trail_length,
            config.tracker.trail_epsilon_deg,
        );
        let (status_tx, _) = watch::channel(FeedStatus::default());

        Self {
            shared: Arc::new(EngineShared {
                client,
                config,
                state: RwLock::new(state),
                status_tx,
                generation: AtomicU64::new(0),
            }),
            running: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    /// Spawn the poller and interpolator on the current Tokio runtime.
    pub fn start(&self) -> Result<(), EngineError> {
        tokio::runtime::Handle::try_current().map_err(|_| EngineError::NoRuntime)?;

        let mut running = self.running.lock();
        if running.is_some() {
            return Err(EngineError::AlreadyRunning);
        }

        let cancellation = CancellationToken::new();
        let poller = tokio::spawn(run_poller(
            Arc::clone(&self.shared),
            cancellation.clone(),
        ));

        let shared = Arc::clone(&self.shared);
        let interpolator = spawn_periodic(
            self.shared.config.tracker.tick_period(),
            cancellation.clone(),
            move || {
                shared.interpolate(Instant::now());
            },
        );

        tracing::info!(
            poll_interval_secs = self.shared.config.feed.poll_interval.as_secs_f64(),
            tick_rate_hz = self.shared.config.tracker.tick_rate_hz,
            "Tracking engine started"
        );

        *running = Some(RunningTasks {
            cancellation,
            poller,
            interpolator,
        });
        Ok(())
    }

    /// Cancel both activities and wait for them to finish.
    ///
    /// In-flight fetch cycles are abandoned; once this returns the store is
    /// no longer mutated by background work. Stopping an idle engine is a
    /// no-op.
    pub async fn stop(&self) {
        let Some(tasks) = self.running.lock().take() else {
            return;
        };

        tasks.cancellation.cancel();
        for (name, handle) in [
            ("poller", tasks.poller),
            ("interpolator", tasks.interpolator),
        ] {
            if let Err(e) = handle.await {
                tracing::warn!(task = name, error = %e, "Engine task ended abnormally");
            }
        }

        tracing::info!("Tracking engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Run a single fetch-and-commit cycle now.
    pub async fn poll_once(&self) -> Result<CommitSummary, FeedError> {
        self.shared.run_cycle(None).await
    }

    /// Run one interpolation step at the current time.
    pub fn tick(&self) -> usize {
        self.tick_at(Instant::now())
    }

    /// Run one interpolation step as of `now`.
    pub fn tick_at(&self, now: Instant) -> usize {
        self.shared.interpolate(now)
    }

    /// Copy of all current entities, in snapshot order.
    pub fn entities(&self) -> Vec<Entity> {
        self.shared.state.read().store.iter().cloned().collect()
    }

    pub fn entity(&self, id: &str) -> Option<Entity> {
        self.shared.state.read().store.get(id).cloned()
    }

    pub fn entity_count(&self) -> usize {
        self.shared.state.read().store.len()
    }

    /// Copy of the trail for `id`, oldest first.
    pub fn trail(&self, id: &str) -> Vec<GeoPoint> {
        self.shared.state.read().trails.snapshot(id)
    }

    /// Ids currently retained in the kinematic cache, including ones
    /// temporarily missing from the store.
    pub fn retained_count(&self) -> usize {
        self.shared.state.read().kinematics.len()
    }

    pub fn status(&self) -> FeedStatus {
        self.shared.state.read().status.clone()
    }

    /// Subscribe to status changes.
    pub fn subscribe_status(&self) -> watch::Receiver<FeedStatus> {
        self.shared.status_tx.subscribe()
    }

    /// Rank current entities and the given airports against `query`.
    pub fn search(&self, query: &str, airports: &AirportIndex) -> SearchResults {
        let ranker = SearchRanker::new(self.shared.config.search.clone());
        let state = self.shared.state.read();
        ranker.search(query, state.store.iter(), airports.iter())
    }
}

impl<C: FeedClient> Drop for TrackingEngine<C> {
    fn drop(&mut self) {
        if let Some(tasks) = self.running.get_mut().take() {
            tasks.cancellation.cancel();
        }
    }
}

/// Poll loop: spawn one cycle per interval tick until cancelled.
async fn run_poller<C: FeedClient + 'static>(
    shared: Arc<EngineShared<C>>,
    cancellation: CancellationToken,
) {
    let mut interval = tokio::time::interval(shared.config.feed.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let cycles = TaskTracker::new();

    loop {
        tokio::select! {
            _ = cancellation.cancelled() => break,
            _ = interval.tick() => {
                let shared = Arc::clone(&shared);
                let cancellation = cancellation.clone();
                cycles.spawn(async move {
                    tokio::select! {
                        _ = cancellation.cancelled() => {}
                        _ = shared.run_cycle(Some(&cancellation)) => {}
                    }
                });
            }
        }
    }

    cycles.close();
    cycles.wait().await;
    tracing::debug!("Snapshot poller stopped");
}
