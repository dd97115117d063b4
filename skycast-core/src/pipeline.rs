use tracing::{info, warn};

use crate::{
    chart::HourlyChart,
    config::KeyStore,
    error::FetchError,
    provider::WeatherProvider,
    view::Dashboard,
};

pub const NOTICE_EMPTY_QUERY: &str = "Please enter a city or country";
pub const NOTICE_NO_KEY: &str =
    "API key required to fetch weather. Get one at https://openweathermap.org";
pub const NOTICE_RESOLVING: &str = "Resolving location...";
pub const NOTICE_FETCHING: &str = "Fetching weather...";
pub const NOTICE_NOT_FOUND: &str = "Location not found. Try \"City\" or \"City, Country\"";

/// Sequences one fetch-and-render run: geocode, weather fetch, then the
/// fan-out to the dashboard renderer and the hourly chart. Owns the
/// single-slot status notice on the dashboard.
///
/// `run` takes `&mut self`, so two runs can never overlap on one pipeline;
/// repeated sequential runs are last-writer-wins.
pub struct Pipeline {
    provider: Box<dyn WeatherProvider>,
    keys: Box<dyn KeyStore>,
    pub dashboard: Dashboard,
    pub chart: HourlyChart,
}

impl Pipeline {
    pub fn new(provider: Box<dyn WeatherProvider>, keys: Box<dyn KeyStore>) -> Self {
        Self { provider, keys, dashboard: Dashboard::new(), chart: HourlyChart::new() }
    }

    /// One full run for a user query. Every early exit leaves its reason in
    /// the dashboard notice; `true` means weather was fetched and rendered.
    pub async fn run(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            self.dashboard.set_notice(NOTICE_EMPTY_QUERY);
            return false;
        }

        let Some(key) = self.keys.get() else {
            self.dashboard.set_notice(NOTICE_NO_KEY);
            return false;
        };

        self.dashboard.set_notice(NOTICE_RESOLVING);
        let place = match self.provider.resolve(query, &key).await {
            Ok(Some(place)) => place,
            Ok(None) => {
                info!(query, "no geocoding matches");
                self.dashboard.set_notice(NOTICE_NOT_FOUND);
                return false;
            }
            Err(err) => return self.fail(err),
        };
        info!(place = %place.display_name, "location resolved");

        self.dashboard.set_notice(NOTICE_FETCHING);
        let bundle = match self.provider.fetch(place.latitude, place.longitude, &key).await {
            Ok(bundle) => bundle,
            Err(err) => return self.fail(err),
        };

        self.dashboard.render(&place, &bundle.current, &bundle.daily);
        self.chart.load(&bundle.hourly);
        true
    }

    fn fail(&mut self, err: FetchError) -> bool {
        warn!(stage = ?err.stage(), %err, "run aborted");
        self.dashboard.set_notice(format!("Error: {err}"));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{StaticKeyStore, KeyStore},
        error::Stage,
        model::{
            CurrentConditions, DailyForecastEntry, GeoResult, HourlyForecastEntry, WeatherBundle,
        },
    };
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug, Clone, Copy)]
    enum Script {
        Success,
        NotFound,
        AuthAtGeocode,
        AuthAtWeather,
    }

    #[derive(Debug)]
    struct StubProvider {
        script: Script,
        resolves: Arc<AtomicUsize>,
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn resolve(&self, _query: &str, _key: &str) -> Result<Option<GeoResult>, FetchError> {
            self.resolves.fetch_add(1, Ordering::SeqCst);
            match self.script {
                Script::NotFound => Ok(None),
                Script::AuthAtGeocode => Err(FetchError::Auth(Stage::Geocode)),
                _ => Ok(Some(GeoResult {
                    latitude: 48.85,
                    longitude: 2.35,
                    display_name: "Paris, FR".into(),
                })),
            }
        }

        async fn fetch(&self, _lat: f64, _lon: f64, _key: &str) -> Result<WeatherBundle, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match self.script {
                Script::AuthAtWeather => Err(FetchError::Auth(Stage::Weather)),
                _ => Ok(bundle()),
            }
        }
    }

    fn bundle() -> WeatherBundle {
        let at = |s| DateTime::<Utc>::from_timestamp(s, 0).unwrap();
        WeatherBundle {
            current: CurrentConditions {
                temperature_c: 21.4,
                condition_main: "Clear".into(),
                condition_description: "clear sky".into(),
                humidity_pct: Some(60),
                wind_speed_ms: Some(3.2),
                observed_at: at(1_700_000_000),
                icon_code: Some("01d".into()),
            },
            daily: (0..8)
                .map(|i| DailyForecastEntry {
                    date: at(1_700_000_000 + i * 86_400),
                    condition_main: "Clear".into(),
                    icon_code: "01d".into(),
                    min_temp_c: 10.0,
                    max_temp_c: 20.0,
                })
                .collect(),
            hourly: (0..30)
                .map(|i| HourlyForecastEntry {
                    at: at(1_700_000_000 + i * 3600),
                    temperature_c: 20.0,
                    precipitation_probability: 0.1,
                    wind_speed_ms: 3.0,
                })
                .collect(),
        }
    }

    struct Harness {
        pipeline: Pipeline,
        resolves: Arc<AtomicUsize>,
        fetches: Arc<AtomicUsize>,
    }

    fn harness_with_keys(script: Script, keys: impl KeyStore + 'static) -> Harness {
        let resolves = Arc::new(AtomicUsize::new(0));
        let fetches = Arc::new(AtomicUsize::new(0));
        let provider = StubProvider {
            script,
            resolves: Arc::clone(&resolves),
            fetches: Arc::clone(&fetches),
        };
        Harness {
            pipeline: Pipeline::new(Box::new(provider), Box::new(keys)),
            resolves,
            fetches,
        }
    }

    fn harness(script: Script) -> Harness {
        harness_with_keys(script, StaticKeyStore::new("KEY"))
    }

    #[tokio::test]
    async fn empty_query_is_rejected_without_any_network_call() {
        let mut h = harness(Script::Success);

        assert!(!h.pipeline.run("   ").await);
        assert_eq!(h.pipeline.dashboard.notice, NOTICE_EMPTY_QUERY);
        assert_eq!(h.resolves.load(Ordering::SeqCst), 0);
        assert_eq!(h.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_key_aborts_before_the_network() {
        let mut h = harness_with_keys(Script::Success, StaticKeyStore::empty());

        assert!(!h.pipeline.run("Paris").await);
        assert_eq!(h.pipeline.dashboard.notice, NOTICE_NO_KEY);
        assert_eq!(h.resolves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn zero_matches_short_circuits_the_weather_call() {
        let mut h = harness(Script::NotFound);

        assert!(!h.pipeline.run("Atlantis").await);
        assert_eq!(
            h.pipeline.dashboard.notice,
            "Location not found. Try \"City\" or \"City, Country\""
        );
        assert_eq!(h.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn auth_failures_name_the_failing_stage() {
        let mut h = harness(Script::AuthAtGeocode);
        h.pipeline.run("Paris").await;
        assert_eq!(
            h.pipeline.dashboard.notice,
            "Error: Invalid API key (401). Check your OpenWeatherMap key."
        );

        let mut h = harness(Script::AuthAtWeather);
        h.pipeline.run("Paris").await;
        assert_eq!(
            h.pipeline.dashboard.notice,
            "Error: Invalid API key (401) when fetching weather."
        );
    }

    #[tokio::test]
    async fn successful_run_renders_and_loads_the_chart() {
        let mut h = harness(Script::Success);

        assert!(h.pipeline.run("Paris").await);

        let dash = &h.pipeline.dashboard;
        assert_eq!(dash.place, "Paris, FR");
        assert_eq!(dash.temperature, "21°C");
        assert_eq!(dash.humidity, "60%");
        assert_eq!(dash.wind, "3.2 m/s");
        assert_eq!(dash.background, Some("icons/clear.png"));
        assert_eq!(dash.last_updated, "clear sky • Humidity: 60% • Wind: 3.2 m/s");
        assert_eq!(dash.notice, "");
        assert_eq!(dash.forecast.len(), 7);
        assert_eq!(h.pipeline.chart.len(), 24);
    }

    #[tokio::test]
    async fn a_failed_run_leaves_the_pipeline_usable() {
        let mut h = harness(Script::AuthAtWeather);
        assert!(!h.pipeline.run("Paris").await);
        assert!(!h.pipeline.dashboard.notice.is_empty());

        // The same pipeline accepts another run immediately.
        assert!(!h.pipeline.run("Paris").await);
        assert_eq!(h.resolves.load(Ordering::SeqCst), 2);
        assert_eq!(h.fetches.load(Ordering::SeqCst), 2);
    }
}
