use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use meteo_core::{AppController, Config, GeoResult, MeteoError, ViewState, format_location_label};
use std::{fmt, path::PathBuf};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Weather lookup powered by Open-Meteo")]
pub struct Cli {
    /// Read and write this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List places matching a name.
    Search {
        /// Place name, e.g. "London".
        query: String,
    },

    /// Show current conditions and the 5-day forecast for a place.
    Show {
        /// Place name, e.g. "London".
        query: String,

        /// Take the Nth match (1-based) instead of prompting.
        #[arg(long)]
        pick: Option<usize>,

        /// Also show details for this forecast day (YYYY-MM-DD).
        #[arg(long)]
        day: Option<String>,
    },

    /// Show weather for the device location (the configured home).
    Here {
        /// Also show details for this forecast day (YYYY-MM-DD).
        #[arg(long)]
        day: Option<String>,
    },

    /// Interactively store a home location.
    Configure,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    pub async fn run(self) -> Result<()> {
        let config = self.load_config()?;
        let controller =
            AppController::from_config(&config).context("Failed to set up weather clients")?;

        match self.command {
            Command::Search { ref query } => {
                let results = search(&controller, query).await?;
                render::print_places(&results);
            }
            Command::Show { ref query, pick, ref day } => {
                let results = search(&controller, query).await?;
                let place = choose_place(&results, pick)?;
                controller.select_result(place).await;
                show_weather(&controller, day.as_deref())?;
            }
            Command::Here { ref day } => {
                controller.use_my_location().await;
                if location_unavailable(&controller.snapshot()) {
                    bail!(
                        "No device location available.\n\
                         Hint: run `meteo configure` to store a home location."
                    );
                }
                show_weather(&controller, day.as_deref())?;
            }
            Command::Configure => configure(&self, config, &controller).await?,
        }

        Ok(())
    }
}

async fn search(controller: &AppController, query: &str) -> Result<Vec<GeoResult>> {
    controller.set_query(query);
    controller.submit_search().await;

    let view = controller.snapshot();
    if let Some(err) = view.search_error() {
        bail!("{err}");
    }

    let results = view.search_results().to_vec();
    if results.is_empty() {
        bail!("No places found for '{query}'");
    }
    Ok(results)
}

/// The device location step found no position source at all.
fn location_unavailable(view: &ViewState) -> bool {
    view.weather_error() == Some(MeteoError::GeolocationUnavailable.to_string().as_str())
}

fn show_weather(controller: &AppController, day: Option<&str>) -> Result<()> {
    if let Some(err) = controller.snapshot().weather_error() {
        bail!("{err}");
    }

    if let Some(date) = day {
        if !controller.toggle_day_by_date(date) {
            bail!("{date} is not in the forecast");
        }
    }

    render::print_weather(&controller.snapshot());
    Ok(())
}

/// Wraps a place so `inquire` lists it by its label.
struct PlaceOption(GeoResult);

impl fmt::Display for PlaceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.2}, {:.2})",
            format_location_label(&self.0),
            self.0.latitude,
            self.0.longitude
        )
    }
}

fn pick_place(results: &[GeoResult], pick: usize) -> Result<GeoResult> {
    pick.checked_sub(1)
        .and_then(|idx| results.get(idx))
        .cloned()
        .ok_or_else(|| anyhow!("--pick {pick} is out of range (1..={})", results.len()))
}

fn choose_place(results: &[GeoResult], pick: Option<usize>) -> Result<GeoResult> {
    if let Some(n) = pick {
        return pick_place(results, n);
    }

    if let [only] = results {
        return Ok(only.clone());
    }

    let options = results.iter().cloned().map(PlaceOption).collect();
    let chosen = inquire::Select::new("Which place?", options)
        .prompt()
        .context("No place selected")?;

    Ok(chosen.0)
}

async fn configure(cli: &Cli, mut config: Config, controller: &AppController) -> Result<()> {
    let query = inquire::Text::new("Home location:")
        .with_help_message("Used whenever the device location is requested")
        .prompt()
        .context("Configuration cancelled")?;

    let results = search(controller, &query).await?;
    let place = choose_place(&results, None)?;
    config.set_home(&place);

    config.geolocation_timeout_secs =
        inquire::CustomType::<u64>::new("Location timeout (seconds):")
            .with_default(config.geolocation_timeout_secs)
            .prompt()
            .context("Configuration cancelled")?;

    let path = match &cli.config {
        Some(path) => {
            config.save_to(path)?;
            path.clone()
        }
        None => config.save()?,
    };

    println!("Home set to {}", format_location_label(&place));
    println!("Saved configuration to {}", path.display());
    Ok(())
}
