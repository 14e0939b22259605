//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let api_key = config.feed.api_key.as_deref().unwrap_or("");
    let include_ground = if config.feed.include_ground {
        "true"
    } else {
        "false"
    };
    let dataset = config
        .airports
        .dataset
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[feed]
; Telemetry endpoint. Point this at a trusted proxy when the upstream
; requires a credential that must not be shipped to clients.
url = {}
; Payload format:
;   auto          - detect from the response (default)
;   opensky       - OpenSky Network state vectors
;   aviationstack - AviationStack flights
;   adsbx         - ADS-B Exchange v2 aircraft list
format = {}
; Credential (aviationstack: access_key query parameter, others: bearer token)
api_key = {}
; Seconds between snapshot requests (5-45, default: 15)
poll_interval = {}
; Maximum aircraft kept per snapshot, in upstream order (1-1000, default: 500)
max_entities = {}
; Keep aircraft reported on the ground (default: false)
include_ground = {}
; HTTP request timeout in seconds (default: 30)
timeout = {}

[tracking]
; Interpolation ticks per second (1-240, default: 60)
tick_rate_hz = {}
; Seconds after the last snapshot at which extrapolation freezes (30-60, default: 45)
stale_after = {}
; Maximum trail points per aircraft (default: 50)
trail_length = {}
; Trail points closer than this many degrees to the previous one are skipped
trail_epsilon_deg = {}
; Forget the trail of an aircraft missing from this many snapshots in a row
; (0 = never, default: 10)
evict_after_cycles = {}

[search]
; Shorter queries return no results (1-2, default: 2)
min_query_len = {}
; Results per category (default: 5)
max_results = {}

[airports]
; Reference airport dataset (JSON or JSON.gz, keyed by ICAO code)
; Example: dataset = ~/.flightwatch/airports.json.gz
dataset = {}

[weather]
; Open-Meteo compatible forecast endpoint
url = {}
; HTTP request timeout in seconds (default: 10)
timeout = {}

[logging]
; Log file path (cleared at session start)
file = {}
"#,
        config.feed.url,
        config.feed.format,
        api_key,
        config.feed.poll_interval,
        config.feed.max_entities,
        include_ground,
        config.feed.timeout,
        config.tracking.tick_rate_hz,
        config.tracking.stale_after,
        config.tracking.trail_length,
        config.tracking.trail_epsilon_deg,
        config.tracking.evict_after_cycles,
        config.search.min_query_len,
        config.search.max_results,
        dataset,
        config.weather.url,
        config.weather.timeout,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
