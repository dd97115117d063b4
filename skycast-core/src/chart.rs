use chrono::{Local, Timelike};

use crate::model::HourlyForecastEntry;

/// How many hours the chart keeps from a forecast.
pub const HOURLY_WINDOW: usize = 24;

/// Block glyphs used for plotting, lowest to highest.
const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Hour ticks are printed under every Nth column.
const TICK_EVERY: usize = 6;

/// The plottable hourly series. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartMetric {
    #[default]
    Temperature,
    Precipitation,
    WindSpeed,
}

impl ChartMetric {
    pub fn label(self) -> &'static str {
        match self {
            ChartMetric::Temperature => "Temperature",
            ChartMetric::Precipitation => "Precipitation",
            ChartMetric::WindSpeed => "Wind speed",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            ChartMetric::Temperature => "°C",
            ChartMetric::Precipitation => "%",
            ChartMetric::WindSpeed => "m/s",
        }
    }

    /// Whether the vertical axis starts at zero. Temperature plots over its
    /// own min..max window so small fluctuations stay visible; the other two
    /// always start at zero. Fixed per metric, not configurable.
    pub fn zero_based(self) -> bool {
        match self {
            ChartMetric::Temperature => false,
            ChartMetric::Precipitation | ChartMetric::WindSpeed => true,
        }
    }

    pub const fn all() -> &'static [ChartMetric] {
        &[ChartMetric::Temperature, ChartMetric::Precipitation, ChartMetric::WindSpeed]
    }
}

/// Chart state for the next-24-hours strip: hour labels plus one integer
/// series per metric. One instance is created for the dashboard's lifetime;
/// `load` swaps the data under it and `select_metric` switches which series
/// `plot` draws. Neither rebuilds the instance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HourlyChart {
    labels: Vec<String>,
    temperature: Vec<i64>,
    precipitation: Vec<i64>,
    wind: Vec<i64>,
    active: ChartMetric,
}

impl HourlyChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the backing data for all three metrics with the first
    /// [`HOURLY_WINDOW`] entries. The active metric is left untouched.
    pub fn load(&mut self, hourly: &[HourlyForecastEntry]) {
        let window = &hourly[..hourly.len().min(HOURLY_WINDOW)];

        self.labels = window
            .iter()
            .map(|h| format!("{}:00", h.at.with_timezone(&Local).hour()))
            .collect();
        self.temperature = window.iter().map(|h| h.temperature_c.round() as i64).collect();
        self.precipitation = window
            .iter()
            .map(|h| (h.precipitation_probability * 100.0).round() as i64)
            .collect();
        self.wind = window.iter().map(|h| h.wind_speed_ms.round() as i64).collect();
    }

    /// Switch the active series. Data is untouched; switching to the
    /// already-active metric changes nothing.
    pub fn select_metric(&mut self, metric: ChartMetric) {
        self.active = metric;
    }

    pub fn active_metric(&self) -> ChartMetric {
        self.active
    }

    /// Hour-of-day labels ("14:00"), one per loaded entry, local time.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The currently active series.
    pub fn series(&self) -> &[i64] {
        self.series_for(self.active)
    }

    pub fn series_for(&self, metric: ChartMetric) -> &[i64] {
        match metric {
            ChartMetric::Temperature => &self.temperature,
            ChartMetric::Precipitation => &self.precipitation,
            ChartMetric::WindSpeed => &self.wind,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Draw the active series as a block-glyph strip: a header naming the
    /// metric and its value range, one glyph column per hour, and hour
    /// ticks underneath.
    pub fn plot(&self) -> String {
        let series = self.series();
        let Some((&min, &max)) = series
            .iter()
            .min()
            .zip(series.iter().max())
        else {
            return String::from("(no hourly data)");
        };

        let floor = if self.active.zero_based() { 0 } else { min };
        let span = (max - floor).max(0);

        let bars: String = series
            .iter()
            .map(|&v| {
                let idx = if span == 0 {
                    0
                } else {
                    ((v - floor) * (BARS.len() as i64 - 1) / span).clamp(0, BARS.len() as i64 - 1)
                };
                BARS[idx as usize]
            })
            .collect();

        format!(
            "{} ({})  min {}  max {}\n{}\n{}",
            self.active.label(),
            self.active.unit(),
            min,
            max,
            bars,
            self.tick_line(),
        )
    }

    fn tick_line(&self) -> String {
        let mut line = String::new();
        let mut col = 0;
        for (i, label) in self.labels.iter().enumerate() {
            if i % TICK_EVERY == 0 && col <= i {
                line.push_str(&" ".repeat(i - col));
                line.push_str(label);
                col = i + label.chars().count();
            }
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, Timelike, Utc};

    fn hours(n: usize) -> Vec<HourlyForecastEntry> {
        (0..n)
            .map(|i| HourlyForecastEntry {
                at: DateTime::<Utc>::from_timestamp(1_700_000_000 + i as i64 * 3600, 0).unwrap(),
                temperature_c: 10.0 + i as f64,
                precipitation_probability: 0.01 * i as f64,
                wind_speed_ms: i as f64 / 2.0,
            })
            .collect()
    }

    #[test]
    fn starts_on_the_temperature_metric() {
        assert_eq!(HourlyChart::new().active_metric(), ChartMetric::Temperature);
    }

    #[test]
    fn load_keeps_the_first_twenty_four_entries_in_order() {
        let mut chart = HourlyChart::new();
        chart.load(&hours(30));

        assert_eq!(chart.len(), 24);
        let temps: Vec<i64> = (0..24).map(|i| 10 + i).collect();
        assert_eq!(chart.series_for(ChartMetric::Temperature), temps.as_slice());
    }

    #[test]
    fn load_accepts_fewer_than_a_full_day() {
        let mut chart = HourlyChart::new();
        chart.load(&hours(5));
        assert_eq!(chart.len(), 5);
    }

    #[test]
    fn load_does_not_change_the_active_metric() {
        let mut chart = HourlyChart::new();
        chart.select_metric(ChartMetric::WindSpeed);
        chart.load(&hours(24));

        assert_eq!(chart.active_metric(), ChartMetric::WindSpeed);
    }

    #[test]
    fn metric_switch_is_idempotent() {
        let mut chart = HourlyChart::new();
        chart.load(&hours(24));

        chart.select_metric(ChartMetric::Precipitation);
        let once = chart.clone();
        chart.select_metric(ChartMetric::Precipitation);

        assert_eq!(chart, once);
        assert_eq!(chart.plot(), once.plot());
    }

    #[test]
    fn precipitation_is_plotted_as_rounded_percent() {
        let mut chart = HourlyChart::new();
        let mut entries = hours(2);
        entries[0].precipitation_probability = 0.354;
        entries[1].precipitation_probability = 1.0;
        chart.load(&entries);

        assert_eq!(chart.series_for(ChartMetric::Precipitation), &[35, 100]);
    }

    #[test]
    fn axis_policy_is_fixed_per_metric() {
        assert!(!ChartMetric::Temperature.zero_based());
        assert!(ChartMetric::Precipitation.zero_based());
        assert!(ChartMetric::WindSpeed.zero_based());
    }

    #[test]
    fn labels_use_the_local_hour_of_day() {
        let mut chart = HourlyChart::new();
        let entries = hours(3);
        chart.load(&entries);

        let expected: Vec<String> = entries
            .iter()
            .map(|h| format!("{}:00", h.at.with_timezone(&Local).hour()))
            .collect();
        assert_eq!(chart.labels(), expected.as_slice());
    }

    #[test]
    fn plot_draws_one_column_per_hour() {
        let mut chart = HourlyChart::new();
        chart.load(&hours(24));

        let plot = chart.plot();
        let bar_line = plot.lines().nth(1).expect("bar line");
        assert_eq!(bar_line.chars().count(), 24);
        assert!(plot.starts_with("Temperature (°C)"));
    }

    #[test]
    fn temperature_axis_is_windowed_not_zero_based() {
        let mut chart = HourlyChart::new();
        let mut entries = hours(2);
        entries[0].temperature_c = 20.0;
        entries[1].temperature_c = 22.0;
        chart.load(&entries);

        // min..max windowing: the low end draws the lowest glyph, the high
        // end the highest, even though both are far from zero.
        let bar_line: Vec<char> = chart.plot().lines().nth(1).unwrap().chars().collect();
        assert_eq!(bar_line[0], '▁');
        assert_eq!(bar_line[1], '█');
    }

    #[test]
    fn flat_series_draws_a_flat_strip() {
        let mut chart = HourlyChart::new();
        let mut entries = hours(3);
        for e in &mut entries {
            e.temperature_c = 15.0;
        }
        chart.load(&entries);

        let bar_line = chart.plot().lines().nth(1).unwrap().to_string();
        assert_eq!(bar_line, "▁▁▁");
    }

    #[test]
    fn empty_chart_plots_a_placeholder() {
        assert_eq!(HourlyChart::new().plot(), "(no hourly data)");
    }
}
