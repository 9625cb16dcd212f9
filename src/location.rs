//! Work out which city the user is in.
//!
//! IP geolocation first, then device coordinates with two reverse
//! geocoders. The first step that produces a name wins.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{sync::Arc, time::Duration};

use crate::config::Config;
use crate::error::LocationError;
use crate::types::Coordinates;
use crate::weather::WeatherClient;

/// Source of the device's own position.
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    /// A fresh position; cached fixes must not be returned.
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Used when the host has no way to report its position.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLocator;

#[async_trait]
impl DeviceLocator for UnsupportedLocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Always reports the same position, e.g. one given on the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Coordinates);

#[async_trait]
impl DeviceLocator for FixedLocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Which step of the chain produced the city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationSource {
    IpLookup { service: String },
    Nominatim,
    WeatherProvider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub city: String,
    pub source: LocationSource,
}

#[derive(Debug, Deserialize)]
struct IpLookupResp {
    city: Option<String>,
    city_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimResp {
    address: Option<NominatimAddress>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
    state_district: Option<String>,
    country: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct LocationResolver {
    http: Client,
    ip_services: Vec<String>,
    ip_timeout: Duration,
    nominatim_base: String,
    language: String,
    weather: WeatherClient,
    locator: Arc<dyn DeviceLocator>,
    locate_timeout: Duration,
}

impl LocationResolver {
    pub fn from_config(
        http: Client,
        weather: WeatherClient,
        locator: Arc<dyn DeviceLocator>,
        config: &Config,
    ) -> Self {
        Self {
            http,
            ip_services: config.ip_services.clone(),
            ip_timeout: config.ip_lookup_timeout(),
            nominatim_base: config.nominatim_base.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            weather,
            locator,
            locate_timeout: config.geolocation_timeout(),
        }
    }

    /// Best guess at the user's city.
    pub async fn resolve(&self) -> Result<ResolvedLocation, LocationError> {
        if let Some(found) = self.locate_by_ip().await {
            return Ok(found);
        }

        let coords = self.device_position().await?;
        tracing::debug!(lat = coords.lat, lon = coords.lon, "device position acquired");

        if let Some(city) = self.nominatim_city(coords).await {
            tracing::info!(%city, "city resolved via Nominatim");
            return Ok(ResolvedLocation {
                city,
                source: LocationSource::Nominatim,
            });
        }
        if let Some(city) = self.provider_city(coords).await {
            tracing::info!(%city, "city resolved via weather provider geocoding");
            return Ok(ResolvedLocation {
                city,
                source: LocationSource::WeatherProvider,
            });
        }
        Err(LocationError::ResolutionFailed)
    }

    async fn locate_by_ip(&self) -> Option<ResolvedLocation> {
        for service in &self.ip_services {
            match self.ip_city(service).await {
                Some(city) => {
                    tracing::info!(%city, service = %service, "city resolved from IP");
                    return Some(ResolvedLocation {
                        city,
                        source: LocationSource::IpLookup {
                            service: service.clone(),
                        },
                    });
                }
                None => continue,
            }
        }
        tracing::debug!("no IP geolocation service returned a city");
        None
    }

    async fn ip_city(&self, service: &str) -> Option<String> {
        let resp = match self.http.get(service).timeout(self.ip_timeout).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(service, "IP lookup failed: {}", e);
                return None;
            }
        };
        if !resp.status().is_success() {
            tracing::debug!(service, status = %resp.status(), "IP lookup rejected");
            return None;
        }
        match resp.json::<IpLookupResp>().await {
            Ok(body) => non_empty(body.city).or_else(|| non_empty(body.city_name)),
            Err(e) => {
                tracing::debug!(service, "IP lookup parse error: {}", e);
                None
            }
        }
    }

    async fn device_position(&self) -> Result<Coordinates, LocationError> {
        tokio::time::timeout(self.locate_timeout, self.locator.current_position())
            .await
            .map_err(|_| LocationError::Timeout)?
    }

    async fn nominatim_city(&self, coords: Coordinates) -> Option<String> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1&accept-language={}&zoom=10",
            self.nominatim_base,
            coords.lat,
            coords.lon,
            urlencoding::encode(&self.language)
        );
        let resp = match self.http.get(&url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::debug!(status = %r.status(), "Nominatim rejected reverse geocode");
                return None;
            }
            Err(e) => {
                tracing::debug!("Nominatim request failed: {}", e);
                return None;
            }
        };
        let body: NominatimResp = match resp.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Nominatim parse error: {}", e);
                return None;
            }
        };
        nominatim_place(body)
    }

    async fn provider_city(&self, coords: Coordinates) -> Option<String> {
        match self.weather.reverse_geocode(coords.lat, coords.lon).await {
            Ok(places) => places
                .first()
                .filter(|p| !p.name.trim().is_empty())
                .map(|p| p.display_name()),
            Err(e) => {
                tracing::debug!("provider reverse geocode failed: {}", e);
                None
            }
        }
    }
}

/// City > town > village > county > district, with the country appended.
/// Falls back to the leading part of `display_name`.
fn nominatim_place(body: NominatimResp) -> Option<String> {
    let addr = body.address?;
    let place = non_empty(addr.city)
        .or_else(|| non_empty(addr.town))
        .or_else(|| non_empty(addr.village))
        .or_else(|| non_empty(addr.county))
        .or_else(|| non_empty(addr.state_district));

    match (place, non_empty(addr.country)) {
        (Some(place), Some(country)) => Some(format!("{}, {}", place, country)),
        (Some(place), None) => Some(place),
        (None, _) => body
            .display_name
            .as_deref()
            .and_then(|name| name.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    }
}
