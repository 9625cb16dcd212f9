//! Error types for the dashboard.
//!
//! Each layer has its own enum so callers can match on the exact failure.
//! `user_message()` gives the single sentence shown to the user when an
//! action fails.

use thiserror::Error;

/// Failures talking to the weather provider.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("city not found: {0}")]
    NotFound(String),

    #[error("weather provider rejected the API key")]
    Auth,

    #[error("weather provider returned status {status}")]
    Upstream { status: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to parse weather response: {0}")]
    Parse(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::NotFound(_) => "City not found. Please try again.",
            WeatherError::Auth => {
                "Invalid API key. Please check your OpenWeatherMap API key."
            }
            WeatherError::Upstream { status } if *status >= 500 => {
                "The weather service is having trouble. Please try again later."
            }
            WeatherError::Upstream { .. } => "Weather data is not available right now.",
            WeatherError::Network(_) => "Unable to connect. Check your internet connection.",
            WeatherError::Parse(_) => "Received an unexpected response from the weather service.",
        }
    }
}

/// Failures of the city auto-detection chain.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable")]
    Unavailable,

    #[error("location request timed out")]
    Timeout,

    #[error("device geolocation is not supported")]
    Unsupported,

    #[error("could not determine city from coordinates")]
    ResolutionFailed,
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => {
                "Unable to get your location. Please allow location access or pass --lat/--lon."
            }
            LocationError::Unavailable => {
                "Unable to get your location. Location unavailable. Please try again."
            }
            LocationError::Timeout => {
                "Unable to get your location. Request timed out. Please try again."
            }
            LocationError::Unsupported | LocationError::ResolutionFailed => {
                "Unable to get your location. Please search for a city manually using the search box above."
            }
        }
    }
}

/// Failures reading or writing the saved city list.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("saved cities are not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Everything a dashboard action can fail with.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("{0} is already saved")]
    DuplicateCity(String),

    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("request superseded by a newer one")]
    Superseded,

    #[error("request timed out")]
    TimedOut,
}

impl DashboardError {
    /// Returns a message suitable for showing in place of the results.
    pub fn user_message(&self) -> &'static str {
        match self {
            DashboardError::InvalidInput(_) => "Please enter a city name.",
            DashboardError::DuplicateCity(_) => "City is already in your list.",
            DashboardError::Weather(e) => e.user_message(),
            DashboardError::Location(e) => e.user_message(),
            DashboardError::Storage(_) => "Could not save your city list.",
            DashboardError::Superseded => "A newer request replaced this one.",
            DashboardError::TimedOut => "Request timed out. Please try again.",
        }
    }
}
