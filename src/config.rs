//! Runtime configuration.
//!
//! Defaults, then an optional YAML file, then environment overrides.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::types::Coordinates;

const DEFAULT_WEATHER_BASE: &str = "https://api.openweathermap.org";
const DEFAULT_NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";
const STORAGE_FILE: &str = "saved_cities.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeatherMap API key.
    pub api_key: String,

    /// Base URL for the weather, forecast and geocoding endpoints.
    pub weather_base: String,

    /// Base URL for Nominatim reverse geocoding.
    pub nominatim_base: String,

    /// `accept-language` sent to Nominatim.
    pub language: String,

    /// IP geolocation services, tried in order.
    pub ip_services: Vec<String>,

    pub ip_lookup_timeout_secs: u64,

    pub geolocation_timeout_secs: u64,

    /// Upper bound for a whole search; unset means no bound.
    pub request_timeout_secs: Option<u64>,

    /// Where the saved city list lives.
    pub storage_path: PathBuf,

    /// Fixed coordinates reported as the device position, if any.
    pub device_location: Option<Coordinates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            weather_base: DEFAULT_WEATHER_BASE.to_string(),
            nominatim_base: DEFAULT_NOMINATIM_BASE.to_string(),
            language: "en".to_string(),
            ip_services: vec![
                "https://ipapi.co/json/".to_string(),
                "https://ipinfo.io/json".to_string(),
            ],
            ip_lookup_timeout_secs: 5,
            geolocation_timeout_secs: 20,
            request_timeout_secs: None,
            storage_path: default_storage_path(),
            device_location: None,
        }
    }
}

fn default_storage_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("weather-dashboard"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STORAGE_FILE)
}

impl Config {
    /// Load configuration from `path` (or `$WEATHER_DASHBOARD_CONFIG`) and
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let from_env = env::var_os("WEATHER_DASHBOARD_CONFIG").map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing YAML in {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Environment variables win over file values.
    pub fn apply_env(&mut self) {
        if let Ok(key) = env::var("OPENWEATHER_API_KEY") {
            self.api_key = key;
        }
        if let Ok(base) = env::var("OPENWEATHER_BASE") {
            self.weather_base = base;
        }
        if let Ok(base) = env::var("NOMINATIM_BASE") {
            self.nominatim_base = base;
        }
        if let Some(path) = env::var_os("WEATHER_DASHBOARD_STORAGE") {
            self.storage_path = PathBuf::from(path);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!(
                "missing API key: set OPENWEATHER_API_KEY or `api_key` in the config file"
            ));
        }
        if self.weather_base.trim().is_empty() {
            return Err(anyhow!("weather_base must not be empty"));
        }
        Ok(())
    }

    pub fn ip_lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.ip_lookup_timeout_secs)
    }

    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_secs(self.geolocation_timeout_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
