//! Weather Dashboard
//!
//! Core library for showing current weather and a three-day outlook for a
//! searched, auto-detected, or saved city, backed by OpenWeatherMap with IP
//! geolocation and Nominatim for city detection.
//!
//! The binary crate parses the command line and calls `run`.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod location;
pub mod render;
pub mod request;
pub mod storage;
pub mod types;
pub mod weather;

use anyhow::{Context, Result};
use std::sync::Arc;

pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{DashboardError, LocationError, StorageError, WeatherError};
pub use location::{
    DeviceLocator, FixedLocator, LocationResolver, LocationSource, ResolvedLocation,
    UnsupportedLocator,
};
pub use request::{RequestContext, RequestTracker};
pub use storage::{CityStore, JsonFileStore, MemoryStore};
pub use types::*;
pub use weather::WeatherClient;

/// A user action from the front-end.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Search(String),
    Locate,
    Add(String),
    Remove(String),
    ListSaved,
}

/// Wire up a dashboard from configuration and a persistence capability.
pub fn build_dashboard(config: &Config, store: Arc<dyn CityStore>) -> Result<Dashboard> {
    let http = weather::http_client().context("failed to build HTTP client")?;
    let weather = WeatherClient::from_config(http.clone(), config);
    let locator: Arc<dyn DeviceLocator> = match config.device_location {
        Some(coords) => Arc::new(FixedLocator(coords)),
        None => Arc::new(UnsupportedLocator),
    };
    let resolver = LocationResolver::from_config(http, weather.clone(), locator, config);
    let requests = RequestTracker::new(config.request_timeout());
    Dashboard::new(weather, resolver, store, requests).context("failed to load saved cities")
}

/// Perform one action and return the text to show.
pub async fn perform(dashboard: &Dashboard, action: Action) -> Result<String, DashboardError> {
    match action {
        Action::Search(city) => {
            let view = dashboard.search(&city).await?;
            Ok(render::render_view(&view))
        }
        Action::Locate => {
            let (found, view) = dashboard.locate().await?;
            Ok(format!(
                "Location weather loaded successfully! ({})\n\n{}",
                found.city,
                render::render_view(&view)
            ))
        }
        Action::Add(city) => {
            let cards = dashboard.add_city(&city).await?;
            Ok(render::render_cards(&cards))
        }
        Action::Remove(city) => {
            let cards = dashboard.remove_city(&city).await?;
            Ok(render::render_cards(&cards))
        }
        Action::ListSaved => Ok(render::render_cards(&dashboard.load_saved().await)),
    }
}

pub async fn run(config: Config, action: Action) -> Result<()> {
    config.validate()?;
    let store = Arc::new(JsonFileStore::new(config.storage_path.clone()));
    let dashboard = build_dashboard(&config, store)?;

    match perform(&dashboard, action).await {
        Ok(out) => {
            print!("{out}");
            Ok(())
        }
        Err(e) => {
            tracing::error!("action failed: {e}");
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}
