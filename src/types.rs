use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// m/s to km/h
const MS_TO_KMH: f64 = 3.6;

/// Helper function that takes in m/s and returns km/h
pub fn ms_to_kmh(speed_ms: f64) -> f64 {
    speed_ms * MS_TO_KMH
}

/// Round for display, halves going up (15.5 -> 16, -2.5 -> -2).
pub fn round_display(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Condition families reported in the provider's `weather[].main` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    /// Mist, smoke, haze, dust, fog, sand and ash.
    Atmosphere,
    /// Squalls and tornadoes.
    Wind,
    Unknown,
}

impl WeatherCondition {
    pub fn from_code(code: &str) -> Self {
        match code {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Drizzle" => Self::Drizzle,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" | "Ash" => Self::Atmosphere,
            "Squall" | "Tornado" => Self::Wind,
            _ => Self::Unknown,
        }
    }

    /// Icon name for the presentation layer; unknown codes get the cloud.
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::Clouds | Self::Unknown => "cloud",
            Self::Rain | Self::Drizzle => "cloud-rain",
            Self::Thunderstorm => "bolt",
            Self::Snow => "snowflake",
            Self::Atmosphere => "smog",
            Self::Wind => "wind",
        }
    }
}

/// Current conditions for one city, in metric units.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    /// Name as reported by the provider, e.g. "Paris".
    pub city_name: String,
    pub description: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
    /// Raw `weather[0].main` code, e.g. "Clouds".
    pub condition_code: String,
    pub coordinates: Coordinates,
}

impl CurrentWeather {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_code(&self.condition_code)
    }

    pub fn display_temperature(&self) -> i64 {
        round_display(self.temperature_c)
    }

    pub fn display_feels_like(&self) -> i64 {
        round_display(self.feels_like_c)
    }

    pub fn display_wind_kmh(&self) -> i64 {
        round_display(self.wind_speed_kmh)
    }
}

/// Representative sample for one forecast day.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Unix seconds of the sample this day was taken from.
    pub timestamp: i64,
    pub temperature_c: f64,
    pub condition_code: String,
    pub description: String,
}

impl ForecastDay {
    /// Weekday name, e.g. "Monday".
    pub fn day_label(&self) -> String {
        self.date.format("%A").to_string()
    }

    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_code(&self.condition_code)
    }

    pub fn display_temperature(&self) -> i64 {
        round_display(self.temperature_c)
    }
}

/// Up to three days, in the order the upstream returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSet {
    pub days: Vec<ForecastDay>,
}

impl ForecastSet {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastDay> {
        self.days.iter()
    }
}

/// Everything the main panel shows after a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub current: CurrentWeather,
    pub forecast: ForecastSet,
}

/// One saved city as rendered in the saved-cities grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CityCard {
    /// Name exactly as stored; removal goes by this, not the display name.
    pub saved_name: String,
    pub weather: CurrentWeather,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_matches_display_rules() {
        assert_eq!(round_display(15.4), 15);
        assert_eq!(round_display(15.5), 16);
        assert_eq!(round_display(-2.5), -2);
        assert_eq!(round_display(ms_to_kmh(5.0)), 18);
    }

    #[test]
    fn atmosphere_codes_share_an_icon() {
        for code in ["Mist", "Smoke", "Haze", "Dust", "Fog", "Sand", "Ash"] {
            assert_eq!(WeatherCondition::from_code(code).icon_name(), "smog");
        }
    }

    #[test]
    fn unknown_code_falls_back_to_cloud() {
        assert_eq!(WeatherCondition::from_code("Volcano"), WeatherCondition::Unknown);
        assert_eq!(WeatherCondition::Unknown.icon_name(), "cloud");
        assert_eq!(WeatherCondition::from_code("Tornado").icon_name(), "wind");
    }
}
