//! Configuration management CLI commands.
//!
//! Provides `config path`, `config init` and `config show`.

use clap::Subcommand;
use flightwatch::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Init { force } => run_init(force),
        ConfigCommands::Show => run_show(),
    }
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

fn run_init(force: bool) -> Result<(), CliError> {
    let path = config_file_path();
    if path.exists() && !force {
        println!("Configuration already exists at {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn run_show() -> Result<(), CliError> {
    let path = config_file_path();
    let config = ConfigFile::load()?;

    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }

    let feed = &config.feed;
    println!("[feed]");
    println!("url = {}", feed.url);
    println!("format = {}", feed.format);
    println!(
        "api_key = {}",
        if feed.api_key.is_some() { "(set)" } else { "(not set)" }
    );
    println!("poll_interval = {}", feed.poll_interval);
    println!("max_entities = {}", feed.max_entities);
    println!("include_ground = {}", feed.include_ground);
    println!("timeout = {}", feed.timeout);

    let tracking = &config.tracking;
    println!();
    println!("[tracking]");
    println!("tick_rate_hz = {}", tracking.tick_rate_hz);
    println!("stale_after = {}", tracking.stale_after);
    println!("trail_length = {}", tracking.trail_length);
    println!("trail_epsilon_deg = {}", tracking.trail_epsilon_deg);
    println!("evict_after_cycles = {}", tracking.evict_after_cycles);

    println!();
    println!("[search]");
    println!("min_query_len = {}", config.search.min_query_len);
    println!("max_results = {}", config.search.max_results);

    println!();
    println!("[airports]");
    match &config.airports.dataset {
        Some(path) => println!("dataset = {}", path.display()),
        None => println!("dataset = (not set)"),
    }

    println!();
    println!("[weather]");
    println!("url = {}", config.weather.url);
    println!("timeout = {}", config.weather.timeout);

    println!();
    println!("[logging]");
    println!("file = {}", config.logging.file.display());

    Ok(())
}
