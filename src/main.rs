//! weather-dashboard binary
//!
//! Thin CLI wrapper around the library. Parses the command, loads the
//! configuration, and invokes `weather_dashboard::run`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use weather_dashboard::{Action, Config, Coordinates};

#[derive(Parser, Debug)]
#[command(name = "weather-dashboard", version, about = "Current weather and a 3-day outlook")]
struct Cli {
    /// YAML config file (defaults to $WEATHER_DASHBOARD_CONFIG if set)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Device latitude, used by `locate` when IP lookup fails
    #[arg(long, global = true, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Device longitude
    #[arg(long, global = true, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show weather for a city
    Search { city: String },
    /// Detect your city and show its weather
    Locate,
    /// Save a city
    Add { city: String },
    /// Remove a saved city
    Remove { city: String },
    /// Show weather for every saved city
    Cities,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        config.device_location = Some(Coordinates { lat, lon });
    }

    let action = match cli.command {
        Command::Search { city } => Action::Search(city),
        Command::Locate => Action::Locate,
        Command::Add { city } => Action::Add(city),
        Command::Remove { city } => Action::Remove(city),
        Command::Cities => Action::ListSaved,
    };
    weather_dashboard::run(config, action).await
}
