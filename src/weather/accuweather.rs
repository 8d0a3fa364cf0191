//! `AccuWeather` API response structures and conversion utilities

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::models::{CurrentConditions, HourlyForecastEntry, Temperature};

/// One entry of the city search response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CitySearchResult {
    pub key: String,
    pub localized_name: String,
    pub country: Area,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Area {
    pub localized_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

impl From<Measurement> for Temperature {
    fn from(measurement: Measurement) -> Self {
        Temperature {
            value: measurement.value,
            unit: measurement.unit,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnitTemperature {
    pub metric: Measurement,
    pub imperial: Option<Measurement>,
}

/// One entry of the current conditions response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrentConditionsResult {
    pub local_observation_date_time: DateTime<FixedOffset>,
    pub weather_text: String,
    #[serde(default)]
    pub has_precipitation: bool,
    pub temperature: UnitTemperature,
    pub relative_humidity: Option<u8>,
}

impl CurrentConditionsResult {
    /// Convert to the normalized record, picking imperial units when asked
    /// for and available
    #[must_use]
    pub fn into_conditions(self, metric: bool) -> CurrentConditions {
        let temperature = match (metric, self.temperature.imperial) {
            (false, Some(imperial)) => imperial,
            _ => self.temperature.metric,
        };

        CurrentConditions {
            temperature: temperature.into(),
            weather_text: self.weather_text,
            relative_humidity: self.relative_humidity,
            precipitation: self.has_precipitation,
            observation_time: self.local_observation_date_time,
        }
    }
}

/// One entry of the hourly forecast response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HourlyForecastResult {
    pub icon_phrase: String,
    pub temperature: Measurement,
    pub precipitation_probability: u8,
    pub precipitation_type: Option<String>,
    pub precipitation_intensity: Option<String>,
}

/// Convert the hourly forecast, keeping upstream order
#[must_use]
pub fn to_hourly_entries(hours: Vec<HourlyForecastResult>) -> Vec<HourlyForecastEntry> {
    hours
        .into_iter()
        .enumerate()
        .map(|(index, hour)| HourlyForecastEntry {
            relative_time: HourlyForecastEntry::relative_label(index),
            temperature: hour.temperature.into(),
            weather_text: hour.icon_phrase,
            precipitation_probability: hour.precipitation_probability,
            precipitation_type: hour.precipitation_type,
            precipitation_intensity: hour.precipitation_intensity,
        })
        .collect()
}
