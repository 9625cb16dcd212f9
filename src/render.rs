//! Plain-text presentation of dashboard data.

use crate::types::{CityCard, CurrentWeather, DashboardView, ForecastSet};

/// Render the main panel: current conditions followed by the forecast.
pub fn render_view(view: &DashboardView) -> String {
    format!(
        "{}\n{}",
        render_current(&view.current),
        render_forecast(&view.forecast)
    )
}

pub fn render_current(w: &CurrentWeather) -> String {
    format!(
        "{} [{}]\n{}\nTemperature: {}°C (feels like {}°C)\nHumidity: {}%\nWind: {} km/h\n",
        w.city_name,
        w.condition().icon_name(),
        w.description,
        w.display_temperature(),
        w.display_feels_like(),
        w.humidity_pct,
        w.display_wind_kmh()
    )
}

/// Render the forecast as a Markdown-style table.
pub fn render_forecast(forecast: &ForecastSet) -> String {
    if forecast.is_empty() {
        return "_(no forecast)_\n".into();
    }
    let mut s = String::from("| Day | Icon | Temp (°C) | Conditions |\n|---|---|---:|---|\n");
    for d in forecast.iter() {
        s.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            d.day_label(),
            d.condition().icon_name(),
            d.display_temperature(),
            d.description
        ));
    }
    s
}

/// One line per saved city.
pub fn render_cards(cards: &[CityCard]) -> String {
    if cards.is_empty() {
        return "No saved cities.\n".into();
    }
    let mut s = String::new();
    for card in cards {
        let w = &card.weather;
        s.push_str(&format!(
            "{} [{}] {}°C {}\n",
            w.city_name,
            w.condition().icon_name(),
            w.display_temperature(),
            w.description
        ));
    }
    s
}
