use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::{DEFAULT_BODY_PREVIEW, FetchError, Stage},
    model::{CurrentConditions, DailyForecastEntry, GeoResult, HourlyForecastEntry, WeatherBundle},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// OpenWeatherMap client covering both pipeline stages: the direct
/// geocoding endpoint and the One Call bundle endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeather {
    http: Client,
    base_url: String,
    body_preview: usize,
}

impl OpenWeather {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different host. Used by tests to talk to a
    /// mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            body_preview: DEFAULT_BODY_PREVIEW,
        }
    }

    /// Adjust how much of an error response body is kept for display.
    pub fn with_body_preview(mut self, limit: usize) -> Self {
        self.body_preview = limit;
        self
    }

    /// One round trip: send, read the body, map non-success statuses onto
    /// the stage's error taxonomy. No retries.
    async fn round_trip(
        &self,
        stage: Stage,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<String, FetchError> {
        debug!(?stage, url, "requesting");

        let res = self.http.get(url).query(query).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            warn!(?stage, "provider rejected API key");
            return Err(FetchError::Auth(stage));
        }
        if !status.is_success() {
            warn!(?stage, %status, "request failed");
            return Err(FetchError::request(stage, status.as_u16(), &body, self.body_preview));
        }

        Ok(body)
    }
}

impl Default for OpenWeather {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProvider for OpenWeather {
    async fn resolve(&self, query: &str, key: &str) -> Result<Option<GeoResult>, FetchError> {
        let url = format!("{}/geo/1.0/direct", self.base_url);
        let body = self
            .round_trip(Stage::Geocode, &url, &[("q", query), ("limit", "1"), ("appid", key)])
            .await?;

        let matches: Vec<GeoEntry> = serde_json::from_str(&body)?;
        Ok(matches.into_iter().next().map(GeoResult::from))
    }

    async fn fetch(&self, lat: f64, lon: f64, key: &str) -> Result<WeatherBundle, FetchError> {
        let url = format!("{}/data/2.5/onecall", self.base_url);
        let (lat, lon) = (lat.to_string(), lon.to_string());
        // Minutely data and alerts are never shown, so they are not
        // requested. Daily and hourly are both needed downstream.
        let body = self
            .round_trip(
                Stage::Weather,
                &url,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("exclude", "minutely,alerts"),
                    ("units", "metric"),
                    ("appid", key),
                ],
            )
            .await?;

        let parsed: OwOneCall = serde_json::from_str(&body)?;
        Ok(parsed.into_bundle())
    }
}

#[derive(Debug, Deserialize)]
struct GeoEntry {
    name: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
    lat: f64,
    lon: f64,
}

impl From<GeoEntry> for GeoResult {
    fn from(entry: GeoEntry) -> Self {
        let display_name = GeoResult::join_display_name(&[
            Some(entry.name.as_str()),
            entry.state.as_deref(),
            entry.country.as_deref(),
        ]);

        GeoResult { latitude: entry.lat, longitude: entry.lon, display_name }
    }
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    dt: i64,
    temp: f64,
    humidity: Option<u8>,
    wind_speed: Option<f64>,
    #[serde(default)]
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwDayTemp {
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct OwDaily {
    dt: i64,
    temp: OwDayTemp,
    #[serde(default)]
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwHourly {
    dt: i64,
    temp: f64,
    #[serde(default)]
    pop: f64,
    #[serde(default)]
    wind_speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwOneCall {
    current: OwCurrent,
    #[serde(default)]
    daily: Vec<OwDaily>,
    #[serde(default)]
    hourly: Vec<OwHourly>,
}

impl OwOneCall {
    fn into_bundle(self) -> WeatherBundle {
        let first = self.current.weather.first();

        let current = CurrentConditions {
            temperature_c: self.current.temp,
            condition_main: first.map(|w| w.main.clone()).unwrap_or_default(),
            condition_description: first.map(|w| w.description.clone()).unwrap_or_default(),
            humidity_pct: self.current.humidity,
            wind_speed_ms: self.current.wind_speed,
            observed_at: unix_to_utc(self.current.dt),
            icon_code: first.map(|w| w.icon.clone()),
        };

        let daily = self
            .daily
            .into_iter()
            .map(|day| {
                let first = day.weather.first();
                DailyForecastEntry {
                    date: unix_to_utc(day.dt),
                    condition_main: first.map(|w| w.main.clone()).unwrap_or_default(),
                    icon_code: first.map(|w| w.icon.clone()).unwrap_or_default(),
                    min_temp_c: day.temp.min,
                    max_temp_c: day.temp.max,
                }
            })
            .collect();

        let hourly = self
            .hourly
            .into_iter()
            .map(|hour| HourlyForecastEntry {
                at: unix_to_utc(hour.dt),
                temperature_c: hour.temp,
                precipitation_probability: hour.pop,
                wind_speed_ms: hour.wind_speed,
            })
            .collect();

        WeatherBundle { current, daily, hourly }
    }
}

fn unix_to_utc(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_else(Utc::now)
}
