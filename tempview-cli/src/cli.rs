use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, InquireError, Password, Select, Text};
use tempview_core::{
    Config, Coordinates, LocationResolver, LocationSetting, OrderingPolicy, ViewModel, WeatherView,
    client_from_config, location::FixedLocation, resolver_from_config,
};
use tokio::sync::watch;

use crate::render::{render_json, render_text};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tempview", version, about = "Current weather for your location or any city")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings that override the config file for one run.
#[derive(Debug, Args)]
pub struct Overrides {
    /// OpenWeather API key.
    #[arg(long)]
    pub api_key: Option<String>,

    /// Latitude to use as the device location.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude to use as the device location.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Only let the most recent search update the display.
    #[arg(long)]
    pub latest_wins: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key and device location source.
    Configure,

    /// Show current weather once.
    Show {
        /// Location to search for; omit to use the device location.
        #[arg(default_value = "")]
        query: String,

        /// Print machine-readable JSON instead of text.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Interactive search prompt.
    Search {
        #[command(flatten)]
        overrides: Overrides,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { query, json, overrides } => {
                let view = build_view(&Config::load()?, &overrides)?;

                let fetch = view.set_query(query).unwrap_or_else(|| view.mount());
                fetch.await.context("Weather fetch task failed")?;

                let model = view.current();
                if json {
                    println!("{}", serde_json::to_string_pretty(&render_json(&model))?);
                } else {
                    print!("{}", render_text(&model));
                }

                Ok(exit_code(&model))
            }
            Command::Search { overrides } => {
                let view = build_view(&Config::load()?, &overrides)?;
                search_loop(&view).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn exit_code(model: &ViewModel) -> ExitCode {
    if model.error().is_some() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

fn build_view(config: &Config, overrides: &Overrides) -> anyhow::Result<WeatherView> {
    let mut config = config.clone();
    if let Some(key) = &overrides.api_key {
        config.set_api_key(key.clone());
    }
    if overrides.latest_wins {
        config.ordering = OrderingPolicy::LatestIssuedWins;
    }

    let resolver: Arc<dyn LocationResolver> = match (overrides.lat, overrides.lon) {
        (Some(lat), Some(lon)) => Arc::new(FixedLocation(Coordinates::new(lat, lon)?)),
        _ => resolver_from_config(&config)?,
    };
    let client = client_from_config(&config)?;

    tracing::debug!(ordering = ?config.ordering, location = ?config.location, "built view");
    Ok(WeatherView::new(resolver, client, config.ordering))
}

/// Interactive prompt. Submissions do not wait for earlier fetches, so several
/// may be in flight at once; a background task prints every state change.
async fn search_loop(view: &WeatherView) -> anyhow::Result<()> {
    let renderer = tokio::spawn(watch_view(view.subscribe(), |model| {
        println!();
        print!("{}", render_text(model));
    }));

    view.mount();

    loop {
        let input = tokio::task::spawn_blocking(|| {
            Text::new("Search location...")
                .with_help_message("Enter to search, empty for device location, Esc to quit")
                .prompt()
        })
        .await?;

        let text = match input {
            Ok(text) => text,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => {
                renderer.abort();
                return Err(err.into());
            }
        };

        // Same text again: retry explicitly instead of doing nothing.
        if view.submit(&text).is_none() {
            view.refetch();
        }
    }

    renderer.abort();
    Ok(())
}

/// Call `on_update` with each published model until the view is dropped.
async fn watch_view(mut rx: watch::Receiver<ViewModel>, mut on_update: impl FnMut(&ViewModel)) {
    while rx.changed().await.is_ok() {
        let model = rx.borrow_and_update().clone();
        on_update(&model);
    }
}

const SOURCES: [&str; 3] = ["ip", "fixed", "disabled"];

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let source = Select::new("Device location source:", SOURCES.to_vec())
        .prompt()
        .context("Failed to read location source")?;

    config.location = match source {
        "fixed" => {
            let latitude = CustomType::<f64>::new("Latitude:")
                .with_error_message("Please enter a number between -90 and 90")
                .prompt()?;
            let longitude = CustomType::<f64>::new("Longitude:")
                .with_error_message("Please enter a number between -180 and 180")
                .prompt()?;

            Coordinates::new(latitude, longitude)?;
            LocationSetting::Fixed { latitude, longitude }
        }
        "disabled" => LocationSetting::Disabled,
        _ => LocationSetting::Ip,
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
