//! Reduce 3-hour forecast samples to one entry per day.

use chrono::{DateTime, FixedOffset};
use std::collections::HashSet;

use crate::types::{ForecastDay, ForecastSet};
use crate::weather::ForecastSample;

/// How many days the dashboard shows.
pub const FORECAST_DAYS: usize = 3;

/// Summarize samples into at most [`FORECAST_DAYS`] days.
///
/// Samples are keyed by their local calendar date at `offset`. The first
/// sample seen for a date wins. Days keep the order in which they first
/// appear; the input is not re-sorted.
pub fn summarize(samples: &[ForecastSample], offset: FixedOffset) -> ForecastSet {
    let days = samples.iter().filter_map(|s| to_day(s, offset));
    first_per_day(days)
}

/// Keep the first entry per date, up to [`FORECAST_DAYS`] dates.
///
/// Applying this to an already summarized set returns it unchanged.
pub fn first_per_day(days: impl IntoIterator<Item = ForecastDay>) -> ForecastSet {
    let mut seen = HashSet::new();
    let days = days
        .into_iter()
        .filter(|d| seen.insert(d.date))
        .take(FORECAST_DAYS)
        .collect();
    ForecastSet { days }
}

fn to_day(sample: &ForecastSample, offset: FixedOffset) -> Option<ForecastDay> {
    let Some(utc) = DateTime::from_timestamp(sample.dt, 0) else {
        tracing::debug!(dt = sample.dt, "skipping forecast sample with bad timestamp");
        return None;
    };
    let Some(condition) = sample.weather.first() else {
        tracing::debug!(dt = sample.dt, "skipping forecast sample without conditions");
        return None;
    };
    Some(ForecastDay {
        date: utc.with_timezone(&offset).date_naive(),
        timestamp: sample.dt,
        temperature_c: sample.main.temp,
        condition_code: condition.main.clone(),
        description: condition.description.clone(),
    })
}
