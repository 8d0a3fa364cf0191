//! Configuration management for the travel planner tools
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::PlannerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Environment variable holding the weather provider credential
pub const WEATHER_API_KEY_VAR: &str = "ACCUWEATHER_API_KEY";
/// Environment variable holding the maps provider credential
pub const MAPS_API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

const FORECAST_WINDOWS: [u32; 5] = [1, 12, 24, 72, 120];

/// Root configuration structure for the travel planner tools
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Maps API configuration
    #[serde(default)]
    pub maps: MapsConfig,
    /// Location cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Tool server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// AccuWeather API key
    pub api_key: Option<String>,
    /// Base URL for the weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request metric units from the forecast endpoint
    #[serde(default = "default_weather_metric")]
    pub metric: bool,
    /// Length of the hourly forecast window
    #[serde(default = "default_forecast_hours")]
    pub forecast_hours: u32,
}

/// Maps API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    /// Google Maps API key
    pub api_key: Option<String>,
    #[serde(default = "default_directions_url")]
    pub directions_url: String,
    #[serde(default = "default_embed_url")]
    pub embed_url: String,
    /// Prefix of the shareable directions link
    #[serde(default = "default_link_base")]
    pub link_base: String,
}

/// Location cache configuration settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Path of the location cache file
    pub location: Option<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Tool server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://dataservice.accuweather.com".to_string()
}

fn default_weather_metric() -> bool {
    true
}

fn default_forecast_hours() -> u32 {
    12
}

fn default_directions_url() -> String {
    "https://maps.googleapis.com/maps/api/directions/json".to_string()
}

fn default_embed_url() -> String {
    "https://www.google.com/maps/embed/v1/directions".to_string()
}

fn default_link_base() -> String {
    "https://www.google.com/maps/dir".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            metric: default_weather_metric(),
            forecast_hours: default_forecast_hours(),
        }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            directions_url: default_directions_url(),
            embed_url: default_embed_url(),
            link_base: default_link_base(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRAVELPLANNER_WEATHER__API_KEY style overrides
        builder = builder.add_source(
            Environment::with_prefix("TRAVELPLANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_credential_env();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travelplanner").join("config.toml"))
    }

    /// Fill credentials from the conventional provider variables when unset
    pub fn apply_credential_env(&mut self) {
        if self.weather.api_key.is_none() {
            self.weather.api_key = env::var(WEATHER_API_KEY_VAR).ok().filter(|k| !k.is_empty());
        }
        if self.maps.api_key.is_none() {
            self.maps.api_key = env::var(MAPS_API_KEY_VAR).ok().filter(|k| !k.is_empty());
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.forecast_hours == 0 {
            self.weather.forecast_hours = default_forecast_hours();
        }
        if self.maps.directions_url.is_empty() {
            self.maps.directions_url = default_directions_url();
        }
        if self.maps.embed_url.is_empty() {
            self.maps.embed_url = default_embed_url();
        }
        if self.maps.link_base.is_empty() {
            self.maps.link_base = default_link_base();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.port == 0 {
            self.server.port = default_server_port();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    ///
    /// Keys are optional at load time; a tool whose key is missing fails
    /// with a configuration error when it is called.
    pub fn validate_api_keys(&self) -> Result<()> {
        if self.weather.api_key.as_deref().is_some_and(str::is_empty) {
            return Err(PlannerError::config(
                "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
            )
            .into());
        }

        if self.maps.api_key.as_deref().is_some_and(str::is_empty) {
            return Err(PlannerError::config(
                "Maps API key cannot be empty if provided. Either remove it or provide a valid key.",
            )
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if !FORECAST_WINDOWS.contains(&self.weather.forecast_hours) {
            return Err(PlannerError::config(format!(
                "Invalid forecast window {}. Must be one of: {:?}",
                self.weather.forecast_hours, FORECAST_WINDOWS
            ))
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("weather.base_url", &self.weather.base_url),
            ("maps.directions_url", &self.maps.directions_url),
            ("maps.embed_url", &self.maps.embed_url),
            ("maps.link_base", &self.maps.link_base),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PlannerError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Resolve the location cache file path
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        match &self.cache.location {
            Some(location) if !location.is_empty() => expand_home(location),
            _ => crate::cache::default_cache_path(),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
