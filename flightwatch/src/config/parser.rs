//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::defaults::*;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
/// Unknown sections and keys are ignored.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [feed] section
    if let Some(section) = ini.section(Some("feed")) {
        if let Some(v) = non_empty(section, "url") {
            config.feed.url = v.to_string();
        }
        if let Some(v) = section.get("format") {
            config.feed.format = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "feed".to_string(),
                key: "format".to_string(),
                value: v.to_string(),
                reason: "must be one of: auto, opensky, aviationstack, adsbx".to_string(),
            })?;
        }
        if let Some(v) = non_empty(section, "api_key") {
            config.feed.api_key = Some(v.to_string());
        }
        if let Some(v) = parse_number::<u64>(section, "feed", "poll_interval", "seconds")? {
            config.feed.poll_interval = clamp_setting(
                "poll_interval",
                v,
                MIN_POLL_INTERVAL_SECS,
                MAX_POLL_INTERVAL_SECS,
            );
        }
        if let Some(v) = parse_number::<usize>(section, "feed", "max_entities", "count")? {
            config.feed.max_entities =
                clamp_setting("max_entities", v, MIN_MAX_ENTITIES, MAX_MAX_ENTITIES);
        }
        if let Some(v) = section.get("include_ground") {
            config.feed.include_ground = parse_bool(v);
        }
        if let Some(v) = parse_number::<u64>(section, "feed", "timeout", "seconds")? {
            config.feed.timeout = v;
        }
    }

    // [tracking] section
    if let Some(section) = ini.section(Some("tracking")) {
        if let Some(v) = parse_number::<u32>(section, "tracking", "tick_rate_hz", "rate")? {
            config.tracking.tick_rate_hz =
                clamp_setting("tick_rate_hz", v, MIN_TICK_RATE_HZ, MAX_TICK_RATE_HZ);
        }
        if let Some(v) = parse_number::<u64>(section, "tracking", "stale_after", "seconds")? {
            config.tracking.stale_after = clamp_setting(
                "stale_after",
                v,
                MIN_STALE_AFTER_SECS,
                MAX_STALE_AFTER_SECS,
            );
        }
        if let Some(v) = parse_number::<usize>(section, "tracking", "trail_length", "count")? {
            if v == 0 {
                return Err(ConfigFileError::InvalidValue {
                    section: "tracking".to_string(),
                    key: "trail_length".to_string(),
                    value: v.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            config.tracking.trail_length = v;
        }
        if let Some(v) = section.get("trail_epsilon_deg") {
            config.tracking.trail_epsilon_deg = v
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|eps| eps.is_finite() && *eps >= 0.0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "tracking".to_string(),
                    key: "trail_epsilon_deg".to_string(),
                    value: v.to_string(),
                    reason: "must be a non-negative number of degrees".to_string(),
                })?;
        }
        if let Some(v) = parse_number::<u64>(section, "tracking", "evict_after_cycles", "count")? {
            config.tracking.evict_after_cycles = v;
        }
    }

    // [search] section
    if let Some(section) = ini.section(Some("search")) {
        if let Some(v) = parse_number::<usize>(section, "search", "min_query_len", "length")? {
            config.search.min_query_len =
                clamp_setting("min_query_len", v, MIN_MIN_QUERY_LEN, MAX_MIN_QUERY_LEN);
        }
        if let Some(v) = parse_number::<usize>(section, "search", "max_results", "count")? {
            config.search.max_results = v;
        }
    }

    // [airports] section
    if let Some(section) = ini.section(Some("airports")) {
        if let Some(v) = non_empty(section, "dataset") {
            config.airports.dataset = Some(expand_tilde(v));
        }
    }

    // [weather] section
    if let Some(section) = ini.section(Some("weather")) {
        if let Some(v) = non_empty(section, "url") {
            config.weather.url = v.to_string();
        }
        if let Some(v) = parse_number::<u64>(section, "weather", "timeout", "seconds")? {
            config.weather.timeout = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

/// Trimmed value of `key`, or `None` if absent or blank.
fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Parse a non-negative integer setting.
fn parse_number<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    unit: &str,
) -> Result<Option<T>, ConfigFileError> {
    let Some(raw) = section.get(key) else {
        return Ok(None);
    };

    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section_name.to_string(),
            key: key.to_string(),
            value: raw.to_string(),
            reason: format!("must be a non-negative integer ({})", unit),
        })
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedFormat;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_invalid_feed_format() {
        let err = load("[feed]\nformat = xml\n").unwrap_err();
        assert!(err.to_string().contains("must be one of:"));
        assert!(err.to_string().contains("feed.format"));
    }

    #[test]
    fn test_invalid_number() {
        let err = load("[feed]\npoll_interval = soon\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref key, .. } if key == "poll_interval"
        ));
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[feed]
url = http://localhost:8080/proxy
format = adsbx
api_key = my-key
include_ground = yes

[search]
min_query_len = 1
"#,
        )
        .unwrap();

        assert_eq!(config.feed.url, "http://localhost:8080/proxy");
        assert_eq!(config.feed.format, FeedFormat::AdsbExchange);
        assert_eq!(config.feed.api_key, Some("my-key".to_string()));
        assert!(config.feed.include_ground);
        assert_eq!(config.search.min_query_len, 1);

        // Untouched values keep their defaults
        assert_eq!(config.feed.poll_interval, 15);
        assert_eq!(config.tracking.trail_length, 50);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let config = load(
            r#"
[feed]
poll_interval = 2
max_entities = 5000

[tracking]
tick_rate_hz = 1000
stale_after = 10

[search]
min_query_len = 4
"#,
        )
        .unwrap();

        assert_eq!(config.feed.poll_interval, MIN_POLL_INTERVAL_SECS);
        assert_eq!(config.feed.max_entities, MAX_MAX_ENTITIES);
        assert_eq!(config.tracking.tick_rate_hz, MAX_TICK_RATE_HZ);
        assert_eq!(config.tracking.stale_after, MIN_STALE_AFTER_SECS);
        assert_eq!(config.search.min_query_len, MAX_MIN_QUERY_LEN);
    }

    #[test]
    fn test_zero_trail_length_rejected() {
        let err = load("[tracking]\ntrail_length = 0\n").unwrap_err();
        assert!(err.to_string().contains("trail_length"));
    }

    #[test]
    fn test_negative_epsilon_rejected() {
        let err = load("[tracking]\ntrail_epsilon_deg = -0.5\n").unwrap_err();
        assert!(err.to_string().contains("trail_epsilon_deg"));
    }

    #[test]
    fn test_blank_values_ignored() {
        let config = load("[feed]\napi_key =\nurl =   \n").unwrap();
        assert!(config.feed.api_key.is_none());
        assert_eq!(config.feed.url, crate::feed::DEFAULT_FEED_URL);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = load("[feed]\nrefresh_mode = turbo\n[extras]\nfoo = bar\n").unwrap();
        assert_eq!(config.feed.format, FeedFormat::Auto);
    }

    #[test]
    fn test_dataset_path_tilde_expanded() {
        let config = load("[airports]\ndataset = ~/data/airports.json.gz\n").unwrap();
        let dataset = config.airports.dataset.unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(dataset, home.join("data/airports.json.gz"));
        }
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_parse_bool_values() {
        for v in ["true", "TRUE", "1", "yes", "on", " On "] {
            assert!(parse_bool(v), "{} should be true", v);
        }
        for v in ["false", "0", "no", "off", "maybe", ""] {
            assert!(!parse_bool(v), "{} should be false", v);
        }
    }
}
