use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resolved place: the first geocoding match for a user query.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoResult {
    pub latitude: f64,
    pub longitude: f64,
    /// Joined from name/state/country, empty parts dropped.
    pub display_name: String,
}

impl GeoResult {
    /// Build the display name the way it is shown everywhere: parts in
    /// name/state/country order, blanks skipped, comma-separated.
    pub fn join_display_name(parts: &[Option<&str>]) -> String {
        parts
            .iter()
            .filter_map(|p| *p)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Current observed conditions, already in metric units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    /// Broad condition group, e.g. "Clear" or "Rain".
    pub condition_main: String,
    /// Finer-grained text, e.g. "light rain".
    pub condition_description: String,
    pub humidity_pct: Option<u8>,
    pub wind_speed_ms: Option<f64>,
    pub observed_at: DateTime<Utc>,
    /// Provider icon code, e.g. "10d"; absent when the provider sent no
    /// condition block at all.
    pub icon_code: Option<String>,
}

/// One day of the daily forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    pub date: DateTime<Utc>,
    pub condition_main: String,
    pub icon_code: String,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
}

/// One hour of the hourly forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyForecastEntry {
    pub at: DateTime<Utc>,
    pub temperature_c: f64,
    /// Probability of precipitation in [0, 1].
    pub precipitation_probability: f64,
    pub wind_speed_ms: f64,
}

/// Everything one weather fetch yields. Replaced wholesale on the next
/// successful fetch, never merged.
#[derive(Debug, Clone)]
pub struct WeatherBundle {
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecastEntry>,
    pub hourly: Vec<HourlyForecastEntry>,
}
