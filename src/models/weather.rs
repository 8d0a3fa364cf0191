//! Normalized weather report returned by the hourly weather tool

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Temperature reading with the unit reported upstream
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Temperature {
    pub value: f64,
    /// Unit symbol, e.g. "C" or "F"
    pub unit: String,
}

/// Observed conditions at the time of the request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: Temperature,
    /// Free-text description such as "Partly sunny"
    pub weather_text: String,
    /// Relative humidity in percent
    pub relative_humidity: Option<u8>,
    /// Whether precipitation was observed
    pub precipitation: bool,
    /// Local observation time
    pub observation_time: DateTime<FixedOffset>,
}

/// One hour of the forecast, in upstream order
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlyForecastEntry {
    /// Offset from now, e.g. "+1 hour", "+2 hours"
    pub relative_time: String,
    pub temperature: Temperature,
    pub weather_text: String,
    /// Probability of precipitation (0-100)
    pub precipitation_probability: u8,
    pub precipitation_type: Option<String>,
    pub precipitation_intensity: Option<String>,
}

impl HourlyForecastEntry {
    /// Label for the entry at zero-based `index`
    #[must_use]
    pub fn relative_label(index: usize) -> String {
        if index == 0 {
            "+1 hour".to_string()
        } else {
            format!("+{} hours", index + 1)
        }
    }
}

/// Weather report for one location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherReport {
    /// Display name of the location
    pub location: String,
    /// Provider location identifier
    pub location_key: String,
    pub country: String,
    /// Serialized as `{}` when the provider returned no observation
    #[serde(with = "empty_object")]
    pub current_conditions: Option<CurrentConditions>,
    pub hourly_forecast: Vec<HourlyForecastEntry>,
}

mod empty_object {
    use super::CurrentConditions;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(
        value: &Option<CurrentConditions>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(conditions) => conditions.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<CurrentConditions>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Object(map) if map.is_empty() => Ok(None),
            other => serde_json::from_value(other)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
