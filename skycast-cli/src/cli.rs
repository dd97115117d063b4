use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Password, Select, Text};
use skycast_core::{ChartMetric, Config, ConfigKeyStore, KeyStore, OpenWeather, Pipeline};

use crate::screen;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Show the weather dashboard for a place.
    Show {
        /// Place name, e.g. "Paris" or "Paris, FR".
        place: String,

        /// Plot this hourly metric and exit instead of opening the
        /// interactive metric selector.
        #[arg(long, value_enum)]
        metric: Option<MetricArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MetricArg {
    /// Hourly temperature.
    Temp,
    /// Precipitation probability.
    Pop,
    /// Wind speed.
    Wind,
}

impl From<MetricArg> for ChartMetric {
    fn from(metric: MetricArg) -> Self {
        match metric {
            MetricArg::Temp => ChartMetric::Temperature,
            MetricArg::Pop => ChartMetric::Precipitation,
            MetricArg::Wind => ChartMetric::WindSpeed,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { place, metric } => show(place, metric).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut store = ConfigKeyStore::load()?;

    let key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()
        .context("No API key entered")?;

    store.set(key.trim().to_owned())?;
    println!("Key saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(place: String, metric: Option<MetricArg>) -> anyhow::Result<()> {
    let mut store = ConfigKeyStore::load()?;

    if store.get().is_none() {
        // One prompt, no nagging: an empty or aborted answer falls through
        // and the pipeline posts its own no-key notice.
        let prompt = Text::new("OpenWeatherMap API key (get one at https://openweathermap.org):");
        if let Ok(key) = prompt.prompt() {
            let key = key.trim();
            if !key.is_empty() {
                store.set(key.to_owned())?;
            }
        }
    }

    let mut pipeline = Pipeline::new(Box::new(OpenWeather::new()), Box::new(store));
    let fetched = pipeline.run(&place).await;

    if let Some(metric) = metric {
        pipeline.chart.select_metric(metric.into());
    }
    screen::print(&pipeline.dashboard, &pipeline.chart);

    if fetched && metric.is_none() {
        explore(&mut pipeline).await?;
    }
    Ok(())
}

/// Interactive chart-metric loop: switch the plotted series without
/// refetching, start a fresh search, or quit.
async fn explore(pipeline: &mut Pipeline) -> anyhow::Result<()> {
    const NEW_SEARCH: &str = "New search";
    const QUIT: &str = "Quit";

    loop {
        let mut options: Vec<&str> = ChartMetric::all().iter().map(|m| m.label()).collect();
        options.push(NEW_SEARCH);
        options.push(QUIT);

        // A failed prompt (e.g. no TTY, Esc) just ends the session.
        let Ok(choice) = Select::new("Hourly chart metric:", options).prompt() else {
            return Ok(());
        };

        match choice {
            QUIT => return Ok(()),
            NEW_SEARCH => {
                let Ok(query) = Text::new("Place:").prompt() else {
                    return Ok(());
                };
                pipeline.dashboard.reset();
                pipeline.run(&query).await;
                screen::print(&pipeline.dashboard, &pipeline.chart);
            }
            label => {
                if let Some(metric) =
                    ChartMetric::all().iter().find(|m| m.label() == label)
                {
                    pipeline.chart.select_metric(*metric);
                    println!("\n{}", pipeline.chart.plot());
                }
            }
        }
    }
}
