//! HTTP client for the Open-Meteo `current` conditions API.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;

use super::{WeatherCondition, WeatherError, WeatherReport};

/// Default forecast endpoint.
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,wind_speed_10m,wind_direction_10m,weather_code";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    latitude: f64,
    longitude: f64,
    current: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    #[serde(default)]
    temperature_2m: f64,
    #[serde(default)]
    relative_humidity_2m: f64,
    #[serde(default)]
    wind_speed_10m: f64,
    #[serde(default)]
    wind_direction_10m: f64,
    #[serde(default)]
    weather_code: u8,
}

/// Client for point weather lookups.
pub struct WeatherClient {
    http: reqwest::Client,
    url: String,
}

impl WeatherClient {
    /// Create a client for `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("flightwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WeatherError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch current conditions at a point.
    pub async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherReport, WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }

        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let report = parse_report(&bytes)?;

        tracing::debug!(
            latitude,
            longitude,
            condition = %report.condition,
            temperature_c = report.temperature_c,
            "Weather fetched"
        );
        Ok(report)
    }
}

/// Decode a forecast response body into a report.
fn parse_report(body: &[u8]) -> Result<WeatherReport, WeatherError> {
    let response: ForecastResponse = serde_json::from_slice(body)?;
    let current = response.current.ok_or(WeatherError::MissingCurrent)?;

    Ok(WeatherReport {
        latitude: response.latitude,
        longitude: response.longitude,
        temperature_c: current.temperature_2m,
        relative_humidity: current.relative_humidity_2m,
        wind_speed_kmh: current.wind_speed_10m,
        wind_direction_deg: current.wind_direction_10m,
        weather_code: current.weather_code,
        condition: WeatherCondition::from_wmo_code(current.weather_code),
        fetched_at: Utc::now(),
    })
}
