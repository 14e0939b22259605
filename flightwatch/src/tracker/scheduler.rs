//! Periodic step scheduler.
//!
//! Runs a synchronous step at a fixed period until cancelled. The suspension
//! point is the wait between ticks; the step itself never awaits.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Spawn a task that calls `step` every `period` until `cancellation` fires.
///
/// Missed ticks are skipped rather than bursted, so a stalled runtime does not
/// trigger a flurry of catch-up frames.
pub fn spawn_periodic<F>(
    period: Duration,
    cancellation: CancellationToken,
    mut step: F,
) -> JoinHandle<()>
where
    F: FnMut() + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancellation.cancelled() => break,
                _ = ticker.tick() => step(),
            }
        }
    })
}
