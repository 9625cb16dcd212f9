//! OpenWeatherMap client: current conditions, 3-hour forecasts and the
//! provider's reverse geocoding.

use chrono::{FixedOffset, Offset, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::Config;
use crate::error::WeatherError;
use crate::types::{Coordinates, CurrentWeather, ms_to_kmh};

const USER_AGENT: &str = concat!("weather-dashboard/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by every upstream call.
pub fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .build()
}

#[derive(Deserialize, Debug)]
struct CurrentResp {
    name: String,
    weather: Vec<ConditionEntry>,
    main: CurrentMain,
    wind: Wind,
    coord: Coordinates,
}

#[derive(Deserialize, Debug)]
struct CurrentMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Deserialize, Debug)]
struct Wind {
    /// m/s with metric units
    speed: f64,
}

/// One entry of a response's `weather` array.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ConditionEntry {
    pub main: String,
    pub description: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SampleMain {
    pub temp: f64,
}

/// One 3-hour forecast sample.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ForecastSample {
    /// Unix seconds
    pub dt: i64,
    pub main: SampleMain,
    #[serde(default)]
    pub weather: Vec<ConditionEntry>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ForecastCity {
    /// Shift in seconds from UTC.
    #[serde(default)]
    pub timezone: Option<i32>,
}

/// Forecast response as returned by the provider.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RawForecast {
    pub list: Vec<ForecastSample>,
    #[serde(default)]
    pub city: Option<ForecastCity>,
}

impl RawForecast {
    /// UTC offset of the forecast location, UTC when missing or out of range.
    pub fn utc_offset(&self) -> FixedOffset {
        self.city
            .as_ref()
            .and_then(|c| c.timezone)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Result of the provider's reverse geocoding.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GeoPlace {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl GeoPlace {
    /// "Name, Country", or just the name.
    pub fn display_name(&self) -> String {
        match self.country.as_deref().filter(|c| !c.is_empty()) {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

/// Client for the weather provider. Cheap to clone.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(http: Client, base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(http: Client, config: &Config) -> Self {
        Self::new(http, config.weather_base.clone(), config.api_key.clone())
    }

    /// Current conditions for a city name, metric units.
    pub async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let url = format!(
            "{}/data/2.5/weather?q={}&appid={}&units=metric",
            self.base,
            urlencoding::encode(city),
            urlencoding::encode(&self.api_key)
        );
        tracing::debug!(city, "fetching current weather");

        let resp = self.http.get(&url).send().await?;
        match resp.status() {
            StatusCode::UNAUTHORIZED => return Err(WeatherError::Auth),
            StatusCode::NOT_FOUND => return Err(WeatherError::NotFound(city.to_string())),
            s if !s.is_success() => return Err(WeatherError::Upstream { status: s.as_u16() }),
            _ => {}
        }

        let data: CurrentResp = parse_json(resp).await?;
        let condition = data
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("response has no weather entries".into()))?;

        let current = CurrentWeather {
            city_name: data.name,
            description: condition.description,
            temperature_c: data.main.temp,
            feels_like_c: data.main.feels_like,
            humidity_pct: data.main.humidity,
            wind_speed_kmh: ms_to_kmh(data.wind.speed),
            condition_code: condition.main,
            coordinates: data.coord,
        };
        tracing::info!(
            city = %current.city_name,
            temp = current.temperature_c,
            "current weather fetched"
        );
        Ok(current)
    }

    /// 3-hour forecast samples for a position, metric units.
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<RawForecast, WeatherError> {
        let url = format!(
            "{}/data/2.5/forecast?lat={}&lon={}&appid={}&units=metric",
            self.base,
            lat,
            lon,
            urlencoding::encode(&self.api_key)
        );
        tracing::debug!(lat, lon, "fetching forecast");

        let resp = ok_or_upstream(self.http.get(&url).send().await?)?;
        let forecast: RawForecast = parse_json(resp).await?;
        tracing::debug!(samples = forecast.list.len(), "forecast fetched");
        Ok(forecast)
    }

    /// Places near a position, at most one.
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Vec<GeoPlace>, WeatherError> {
        let url = format!(
            "{}/geo/1.0/reverse?lat={}&lon={}&limit=1&appid={}",
            self.base,
            lat,
            lon,
            urlencoding::encode(&self.api_key)
        );
        let resp = ok_or_upstream(self.http.get(&url).send().await?)?;
        parse_json(resp).await
    }
}

fn ok_or_upstream(resp: Response) -> Result<Response, WeatherError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(WeatherError::Upstream {
            status: status.as_u16(),
        })
    }
}

async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T, WeatherError> {
    let body = resp.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| WeatherError::Parse(e.to_string()))
}
