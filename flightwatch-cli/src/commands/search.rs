//! Search command - ranked lookup across live aircraft and airports.

use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use super::output::{airport_row, entity_row, scored};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the search command.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Callsign, airline, route code, airport code, name or city
    pub query: String,

    /// Airport dataset (overrides [airports] dataset in config.ini)
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Skip the live snapshot and search airports only
    #[arg(long)]
    pub offline: bool,
}

/// Run the search command.
pub async fn run(args: SearchArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("search");

    let airports = runner.load_airports(args.dataset)?;
    let engine = runner.create_engine(None)?;

    if !args.offline {
        if let Err(e) = engine.poll_once().await {
            warn!(error = %e, "Live snapshot unavailable, searching airports only");
            eprintln!("Warning: live data unavailable ({})", e);
        }
    }

    let results = engine.search(&args.query, &airports);
    if results.is_empty() {
        println!("No matches for '{}'", args.query.trim());
        return Ok(());
    }

    if !results.entities.is_empty() {
        println!("Aircraft:");
        for hit in &results.entities {
            println!("  {}", scored(hit, entity_row(&hit.item)));
        }
    }

    if !results.airports.is_empty() {
        println!("Airports:");
        for hit in &results.airports {
            println!("  {}", scored(hit, airport_row(&hit.item)));
        }
    }

    Ok(())
}
