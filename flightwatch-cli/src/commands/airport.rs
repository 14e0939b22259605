//! Airport command - dataset lookup with optional current weather.

use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the airport command.
#[derive(Debug, Args)]
pub struct AirportArgs {
    /// IATA or ICAO code
    pub code: String,

    /// Also fetch current conditions at the airport
    #[arg(long)]
    pub weather: bool,

    /// Airport dataset (overrides [airports] dataset in config.ini)
    #[arg(long)]
    pub dataset: Option<PathBuf>,
}

/// Run the airport command.
pub async fn run(args: AirportArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("airport");

    let airports = runner.load_airports(args.dataset)?;
    let airport = airports
        .get(&args.code)
        .ok_or_else(|| CliError::AirportNotFound(args.code.trim().to_uppercase()))?;

    println!("{}", airport);
    println!("  IATA:     {}", or_dash(&airport.iata_code));
    println!("  ICAO:     {}", or_dash(&airport.icao_code));
    println!(
        "  Location: {:.4}, {:.4}",
        airport.latitude, airport.longitude
    );

    if args.weather {
        let client = runner.weather_client()?;
        match client.current(airport.latitude, airport.longitude).await {
            Ok(report) => println!("  Weather:  {}", report),
            Err(e) => {
                warn!(error = %e, code = airport.display_code(), "Weather lookup failed");
                println!("  Weather:  unavailable ({})", e);
            }
        }
    }

    Ok(())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
