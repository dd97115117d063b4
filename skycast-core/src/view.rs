use chrono::Local;

use crate::{
    condition::{categorize, remote_icon_url},
    model::{CurrentConditions, DailyForecastEntry, GeoResult},
};

/// Placeholder shown wherever a value is absent or not yet fetched.
pub const PLACEHOLDER: &str = "—";

/// How many daily entries the forecast strip shows.
const FORECAST_DAYS: usize = 7;

/// An icon position on the dashboard. Hiding keeps the last URL around,
/// mirroring how the slot is only ever repainted, never destroyed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconSlot {
    pub url: String,
    pub visible: bool,
}

impl IconSlot {
    fn show(&mut self, url: String) {
        self.url = url;
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}

/// One entry of the 7-day forecast strip.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    /// Short weekday name, e.g. "Mon".
    pub weekday: String,
    pub icon_url: String,
    pub condition: String,
    /// "max° / min°", max first.
    pub range: String,
}

/// Every display field of the dashboard, owned in one place. `render` is a
/// pure projection of fetched data onto these fields: writing the same
/// bundle twice leaves the dashboard in an identical state.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub place: String,
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub wind: String,

    pub hero_place: String,
    pub hero_temperature: String,
    pub hero_condition: String,
    pub hero_icon: IconSlot,
    /// Local background asset for the hero panel, when the condition has one.
    pub background: Option<&'static str>,

    pub inline_icon: IconSlot,
    pub right_condition: String,
    /// Long weekday + local observation time, e.g. "Thursday 14:05".
    pub right_time: String,

    pub forecast: Vec<ForecastRow>,
    /// Weather summary on success, bare timestamp otherwise.
    pub last_updated: String,
    /// Single-slot status/error notice; every write overwrites.
    pub notice: String,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            place: PLACEHOLDER.into(),
            temperature: PLACEHOLDER.into(),
            condition: PLACEHOLDER.into(),
            humidity: PLACEHOLDER.into(),
            wind: PLACEHOLDER.into(),
            hero_place: PLACEHOLDER.into(),
            hero_temperature: PLACEHOLDER.into(),
            hero_condition: PLACEHOLDER.into(),
            hero_icon: IconSlot::default(),
            background: None,
            inline_icon: IconSlot::default(),
            right_condition: PLACEHOLDER.into(),
            right_time: PLACEHOLDER.into(),
            forecast: Vec::new(),
            last_updated: String::new(),
            notice: String::new(),
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the status notice.
    pub fn set_notice(&mut self, msg: impl Into<String>) {
        self.notice = msg.into();
    }

    /// Show the weather summary in the last-updated field, or fall back to
    /// a plain local timestamp when there is no summary to show.
    pub fn set_last_updated(&mut self, summary: Option<&str>) {
        self.last_updated = match summary {
            Some(text) => text.to_string(),
            None => Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
    }

    /// Project a successful fetch onto the display fields.
    pub fn render(
        &mut self,
        place: &GeoResult,
        current: &CurrentConditions,
        daily: &[DailyForecastEntry],
    ) {
        self.place = place.display_name.clone();
        self.hero_place = place.display_name.clone();

        let temp = current.temperature_c.round() as i32;
        self.temperature = format!("{temp}°C");
        self.hero_temperature = format!("{temp}°");

        self.condition = current.condition_description.clone();
        self.hero_condition = current.condition_description.clone();

        let humidity = dash_or(current.humidity_pct.map(|h| h.to_string()));
        let wind = dash_or(current.wind_speed_ms.map(|w| w.to_string()));
        self.humidity = format!("{humidity}%");
        self.wind = format!("{wind} m/s");

        self.apply_icons(current);
        self.right_condition = current.condition_main.clone();
        self.right_time =
            current.observed_at.with_timezone(&Local).format("%A %-H:%M").to_string();

        self.forecast.clear();
        for day in daily.iter().take(FORECAST_DAYS) {
            let max = day.max_temp_c.round() as i32;
            let min = day.min_temp_c.round() as i32;
            self.forecast.push(ForecastRow {
                weekday: day.date.with_timezone(&Local).format("%a").to_string(),
                icon_url: remote_icon_url(&day.icon_code),
                condition: day.condition_main.clone(),
                range: format!("{max}° / {min}°"),
            });
        }

        let summary =
            format!("{} • Humidity: {humidity}% • Wind: {wind} m/s", self.condition);
        self.set_last_updated(Some(&summary));
        self.notice.clear();
    }

    /// Ordered icon decision: a recognized condition paints the local
    /// background and hides the big hero icon (the small inline icon keeps
    /// the remote image as a secondary reference); an unrecognized one
    /// falls back to the remote image in both slots; no icon code at all
    /// hides them.
    fn apply_icons(&mut self, current: &CurrentConditions) {
        let remote = current.icon_code.as_deref().map(remote_icon_url);

        if let Some(category) = categorize(&current.condition_main) {
            self.background = Some(category.asset_path());
            self.hero_icon.hide();
            match remote {
                Some(url) => self.inline_icon.show(url),
                None => self.inline_icon.hide(),
            }
        } else {
            self.background = None;
            match remote {
                Some(url) => {
                    self.inline_icon.show(url.clone());
                    self.hero_icon.show(url);
                }
                None => {
                    self.inline_icon.hide();
                    self.hero_icon.hide();
                }
            }
        }
    }

    /// Return every field to its placeholder state.
    pub fn reset(&mut self) {
        *self = Self::default();
        self.set_last_updated(None);
    }
}

fn dash_or(value: Option<String>) -> String {
    value.unwrap_or_else(|| PLACEHOLDER.into())
}
