//! Hourly weather lookups against the `AccuWeather` API
//!
//! A lookup resolves the free-text location to a provider location key
//! (through the [`LocationCache`] when possible), then fetches current
//! conditions and the hourly forecast for that key. The calls are issued one
//! after the other since both data calls need the resolved key.

use std::time::Instant;

use reqwest::Client;
use tracing::{debug, error, info, instrument, warn};

use crate::cache::{CacheWrite, LocationCache};
use crate::config::{WEATHER_API_KEY_VAR, WeatherConfig};
use crate::models::WeatherReport;
use crate::{PlannerError, Result};

pub mod accuweather;

use accuweather::{CitySearchResult, CurrentConditionsResult, HourlyForecastResult};

/// Country reported when the location key came from the cache
pub const UNKNOWN_COUNTRY: &str = "Unknown";

struct ResolvedLocation {
    key: String,
    name: String,
    country: String,
}

/// Weather API client for `AccuWeather`
pub struct WeatherClient {
    http: Client,
    config: WeatherConfig,
    cache: LocationCache,
}

impl WeatherClient {
    pub fn new(http: Client, config: WeatherConfig, cache: LocationCache) -> Self {
        Self {
            http,
            config,
            cache,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &LocationCache {
        &self.cache
    }

    /// Get current conditions and the hourly forecast for a location
    #[instrument(skip(self))]
    pub async fn get_hourly_weather(&self, location: &str) -> Result<WeatherReport> {
        let api_key = self.api_key()?;

        info!("Getting hourly weather for '{}'", location);
        let start_time = Instant::now();

        let resolved = self.resolve_location(api_key, location).await?;
        let current_conditions = self.current_conditions(api_key, &resolved.key).await?;
        let hourly_forecast = self.hourly_forecast(api_key, &resolved.key).await?;

        info!(
            "Retrieved weather for '{}' ({} forecast hours) in {:.3}s",
            resolved.name,
            hourly_forecast.len(),
            start_time.elapsed().as_secs_f64()
        );

        let report = WeatherReport {
            location: resolved.name,
            location_key: resolved.key,
            country: resolved.country,
            current_conditions,
            hourly_forecast,
        };
        debug!("Weather report: {:?}", report);
        Ok(report)
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| PlannerError::config(format!("{WEATHER_API_KEY_VAR} is not set")))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn resolve_location(&self, api_key: &str, location: &str) -> Result<ResolvedLocation> {
        if let Some(key) = self.cache.get(location).await {
            debug!("Using cached location key {} for '{}'", key, location);
            return Ok(ResolvedLocation {
                key,
                name: location.to_string(),
                country: UNKNOWN_COUNTRY.to_string(),
            });
        }

        let city = self.search_city(api_key, location).await?;
        if let CacheWrite::Failed(reason) = self.cache.put(location, &city.key).await {
            warn!("Failed to cache location key for '{}': {}", location, reason);
        }

        Ok(ResolvedLocation {
            key: city.key,
            name: city.localized_name,
            country: city.country.localized_name,
        })
    }

    async fn search_city(&self, api_key: &str, query: &str) -> Result<CitySearchResult> {
        debug!("Searching city '{}'", query);

        let response = self
            .http
            .get(self.endpoint("locations/v1/cities/search"))
            .query(&[("apikey", api_key), ("q", query)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("City search failed with HTTP {}", status);
            return Err(PlannerError::upstream(status.as_u16().to_string(), body));
        }

        let results: Option<Vec<CitySearchResult>> = serde_json::from_str(&body).map_err(|e| {
            PlannerError::invalid_response(format!("Unreadable city search response: {e}"))
        })?;

        results
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                warn!("No results found for location '{}'", query);
                PlannerError::not_found(query)
            })
    }

    async fn current_conditions(
        &self,
        api_key: &str,
        location_key: &str,
    ) -> Result<Option<crate::models::CurrentConditions>> {
        let path = format!(
            "currentconditions/v1/{}",
            urlencoding::encode(location_key)
        );
        let body = self
            .http
            .get(self.endpoint(&path))
            .query(&[("apikey", api_key)])
            .send()
            .await?
            .text()
            .await?;

        if body.trim().is_empty() {
            debug!("Empty current conditions response");
            return Ok(None);
        }

        let results: Option<Vec<CurrentConditionsResult>> =
            serde_json::from_str(&body).map_err(|e| {
                PlannerError::invalid_response(format!(
                    "Unreadable current conditions response: {e}"
                ))
            })?;

        Ok(results
            .and_then(|results| results.into_iter().next())
            .map(|current| current.into_conditions(self.config.metric)))
    }

    async fn hourly_forecast(
        &self,
        api_key: &str,
        location_key: &str,
    ) -> Result<Vec<crate::models::HourlyForecastEntry>> {
        let path = format!(
            "forecasts/v1/hourly/{}hour/{}",
            self.config.forecast_hours,
            urlencoding::encode(location_key)
        );
        let metric = if self.config.metric { "true" } else { "false" };

        let hours: Vec<HourlyForecastResult> = self
            .http
            .get(self.endpoint(&path))
            .query(&[("apikey", api_key), ("metric", metric)])
            .send()
            .await?
            .json()
            .await?;

        Ok(accuweather::to_hourly_entries(hours))
    }
}
