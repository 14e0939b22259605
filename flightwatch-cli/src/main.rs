//! FlightWatch CLI - Command-line interface
//!
//! This binary provides a command-line interface to the FlightWatch library:
//! a live aircraft table, ranked search, and airport lookup.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::airport::AirportArgs;
use commands::config::ConfigCommands;
use commands::search::SearchArgs;
use commands::track::TrackArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "flightwatch")]
#[command(version = flightwatch::VERSION)]
#[command(about = "Live aircraft tracking from a polled position feed", long_about = None)]
struct Cli {
    /// Enable debug logging for FlightWatch modules
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the feed and print the interpolated aircraft table
    Track(TrackArgs),

    /// Search live aircraft and reference airports
    Search(SearchArgs),

    /// Look up an airport by IATA or ICAO code
    Airport(AirportArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Track(args) => commands::track::run(args, cli.debug).await,
        Commands::Search(args) => commands::search::run(args, cli.debug).await,
        Commands::Airport(args) => commands::airport::run(args, cli.debug).await,
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
