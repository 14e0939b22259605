//! Point-in-time weather lookup.
//!
//! A presentation helper: given a latitude and longitude, fetch the current
//! temperature, humidity, wind and weather condition from an Open-Meteo style
//! forecast endpoint. It is independent of the tracking engine; a failed
//! lookup never affects interpolation or search.

mod client;

pub use client::{WeatherClient, DEFAULT_WEATHER_URL};

use chrono::{DateTime, Utc};

/// Errors from a weather lookup.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Weather request failed: {0}")]
    Http(String),

    #[error("Weather service returned HTTP {status}")]
    Status { status: u16 },

    #[error("Invalid weather response: {0}")]
    Json(String),

    #[error("Weather response has no current conditions")]
    MissingCurrent,

    #[error("Invalid coordinates: ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

/// Weather condition grouped from a WMO weather interpretation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Showers,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    /// Map a WMO code (0-99) to a condition.
    pub fn from_wmo_code(code: u8) -> Self {
        match code {
            0 | 1 => Self::Clear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 | 48 => Self::Fog,
            51..=57 => Self::Drizzle,
            61..=67 => Self::Rain,
            71..=77 | 85 | 86 => Self::Snow,
            80..=82 => Self::Showers,
            95..=99 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Showers => "Showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Current conditions at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub latitude: f64,
    pub longitude: f64,
    /// Air temperature at 2 m, °C.
    pub temperature_c: f64,
    /// Relative humidity at 2 m, percent.
    pub relative_humidity: f64,
    /// Wind speed at 10 m, km/h.
    pub wind_speed_kmh: f64,
    /// Direction the wind blows from, degrees.
    pub wind_direction_deg: f64,
    pub weather_code: u8,
    pub condition: WeatherCondition,
    pub fetched_at: DateTime<Utc>,
}

impl std::fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {:.1}°C, {:.0}% humidity, wind {:.0} km/h from {:.0}°",
            self.condition,
            self.temperature_c,
            self.relative_humidity,
            self.wind_speed_kmh,
            self.wind_direction_deg
        )
    }
}
