use crate::{
    error::FetchError,
    model::{GeoResult, WeatherBundle},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The two network stages of a pipeline run, behind one seam so the
/// orchestrator does not care which provider serves them.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve a free-text place query to its first match.
    ///
    /// `Ok(None)` means the provider answered with zero matches; that is a
    /// terminal outcome for a run, not an error.
    async fn resolve(&self, query: &str, key: &str) -> Result<Option<GeoResult>, FetchError>;

    /// Current conditions plus daily and hourly forecasts for a coordinate
    /// pair, in metric units.
    async fn fetch(&self, lat: f64, lon: f64, key: &str) -> Result<WeatherBundle, FetchError>;
}
