//! Dashboard state: the saved city list, the city on display and the
//! actions that change them.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::DashboardError;
use crate::forecast;
use crate::location::{LocationResolver, ResolvedLocation};
use crate::request::{RequestContext, RequestTracker};
use crate::storage::CityStore;
use crate::types::{CityCard, DashboardView};
use crate::weather::WeatherClient;

#[derive(Debug, Default)]
struct Display {
    current_city: Option<String>,
    view: Option<DashboardView>,
}

pub struct Dashboard {
    weather: WeatherClient,
    resolver: LocationResolver,
    store: Arc<dyn CityStore>,
    saved: Mutex<Vec<String>>,
    display: Mutex<Display>,
    requests: RequestTracker,
}

fn city_input(raw: &str) -> Result<&str, DashboardError> {
    let city = raw.trim();
    if city.is_empty() {
        return Err(DashboardError::InvalidInput("empty city name"));
    }
    Ok(city)
}

impl Dashboard {
    /// Build a dashboard, loading the saved list from `store` once.
    pub fn new(
        weather: WeatherClient,
        resolver: LocationResolver,
        store: Arc<dyn CityStore>,
        requests: RequestTracker,
    ) -> Result<Self, DashboardError> {
        let saved = store.load()?;
        tracing::debug!(count = saved.len(), "saved cities loaded");
        Ok(Self {
            weather,
            resolver,
            store,
            saved: Mutex::new(saved),
            display: Mutex::new(Display::default()),
            requests,
        })
    }

    /// Show current weather and the three-day outlook for `city`.
    ///
    /// On failure the previous display is left as it was.
    pub async fn search(&self, city: &str) -> Result<DashboardView, DashboardError> {
        let city = city_input(city)?;
        let ctx = self.requests.begin();
        self.show(&ctx, city).await
    }

    /// Detect the user's city and show it, as `search` would.
    pub async fn locate(&self) -> Result<(ResolvedLocation, DashboardView), DashboardError> {
        let ctx = self.requests.begin();
        let found = ctx.run(self.resolver.resolve()).await?;
        let view = self.show(&ctx, &found.city).await?;
        Ok((found, view))
    }

    async fn show(&self, ctx: &RequestContext, city: &str) -> Result<DashboardView, DashboardError> {
        let current = ctx.run(self.weather.fetch_current(city)).await?;
        let coords = current.coordinates;
        let raw = ctx
            .run(self.weather.fetch_forecast(coords.lat, coords.lon))
            .await?;
        let view = DashboardView {
            current,
            forecast: forecast::summarize(&raw.list, raw.utc_offset()),
        };

        let mut display = self.display.lock().await;
        if !self.requests.is_current(ctx) {
            tracing::debug!(generation = ctx.generation(), "dropping stale result");
            return Err(DashboardError::Superseded);
        }
        display.current_city = Some(view.current.city_name.clone());
        display.view = Some(view.clone());
        Ok(view)
    }

    /// Save `city` after checking the provider knows it.
    pub async fn add_city(&self, city: &str) -> Result<Vec<CityCard>, DashboardError> {
        let city = city_input(city)?;
        if self.saved.lock().await.iter().any(|c| c == city) {
            return Err(DashboardError::DuplicateCity(city.to_string()));
        }

        self.weather.fetch_current(city).await?;

        {
            let mut saved = self.saved.lock().await;
            // Another add may have finished while we were fetching.
            if saved.iter().any(|c| c == city) {
                return Err(DashboardError::DuplicateCity(city.to_string()));
            }
            saved.push(city.to_string());
            if let Err(e) = self.store.save(&saved) {
                saved.pop();
                return Err(e.into());
            }
        }
        tracing::info!(city, "city saved");
        Ok(self.load_saved().await)
    }

    /// Drop every saved entry equal to `city`.
    pub async fn remove_city(&self, city: &str) -> Result<Vec<CityCard>, DashboardError> {
        {
            let mut saved = self.saved.lock().await;
            let before = saved.clone();
            saved.retain(|c| c != city);
            if let Err(e) = self.store.save(&saved) {
                *saved = before;
                return Err(e.into());
            }
        }
        tracing::info!(city, "city removed");
        Ok(self.load_saved().await)
    }

    /// Fetch a card for each saved city, one at a time.
    ///
    /// Cities that fail are skipped for this pass but stay saved.
    pub async fn load_saved(&self) -> Vec<CityCard> {
        let cities = self.saved.lock().await.clone();
        let mut cards = Vec::with_capacity(cities.len());
        for city in cities {
            match self.weather.fetch_current(&city).await {
                Ok(weather) => cards.push(CityCard {
                    saved_name: city,
                    weather,
                }),
                Err(e) => tracing::warn!(city = %city, "error loading weather: {}", e),
            }
        }
        cards
    }

    pub async fn saved_cities(&self) -> Vec<String> {
        self.saved.lock().await.clone()
    }

    pub async fn current_city(&self) -> Option<String> {
        self.display.lock().await.current_city.clone()
    }

    pub async fn current_view(&self) -> Option<DashboardView> {
        self.display.lock().await.view.clone()
    }
}
