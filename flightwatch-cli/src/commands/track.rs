//! Track command - live aircraft table.
//!
//! Starts the tracking engine and prints the interpolated entity set at a
//! fixed interval until Ctrl+C, the optional duration elapses, or (with
//! `--once`) after a single snapshot.

use std::time::Duration;

use clap::Args;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{info, warn};

use flightwatch::feed::HttpFeedClient;
use flightwatch::tracker::TrackingEngine;

use super::output::{status_line, tracked_row, TRACK_HEADER};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the track command.
#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Fetch a single snapshot, print it, and exit
    #[arg(long)]
    pub once: bool,

    /// Stop after this many seconds
    #[arg(long)]
    pub duration: Option<u64>,

    /// Override the poll interval in seconds (5-45)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Seconds between table refreshes
    #[arg(long, default_value = "2")]
    pub refresh: u64,

    /// Maximum rows to print per refresh
    #[arg(long, default_value = "25")]
    pub rows: usize,
}

/// Run the track command.
pub async fn run(args: TrackArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("track");

    let engine = runner.create_engine(args.interval)?;

    if args.once {
        let summary = engine.poll_once().await?;
        info!(
            entities = summary.entities,
            generation = summary.generation,
            "Snapshot committed"
        );
        print_table(&engine, args.rows);
        return Ok(());
    }

    engine.start()?;
    println!(
        "Tracking (poll every {}s). Press Ctrl+C to stop.",
        engine.config().feed.poll_interval.as_secs()
    );

    let deadline = async {
        match args.duration {
            Some(secs) => sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let mut refresh = interval(Duration::from_secs(args.refresh.max(1)));
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for Ctrl+C");
                }
                println!();
                println!("Stopping...");
                break;
            }
            _ = &mut deadline => {
                info!("Track duration elapsed");
                break;
            }
            _ = refresh.tick() => {
                print_table(&engine, args.rows);
            }
        }
    }

    engine.stop().await;
    println!("{}", status_line(&engine.status()));
    Ok(())
}

fn print_table(engine: &TrackingEngine<HttpFeedClient>, rows: usize) {
    let mut entities = engine.entities();
    entities.sort_by(|a, b| a.callsign.cmp(&b.callsign));

    println!();
    println!("{}", status_line(&engine.status()));
    println!("{}", TRACK_HEADER);
    for entity in entities.iter().take(rows) {
        println!("{}", tracked_row(entity, engine.trail(&entity.id).len()));
    }
    if entities.len() > rows {
        println!("... and {} more", entities.len() - rows);
    }
}
