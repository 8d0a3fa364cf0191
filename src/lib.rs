//! `TravelPlanner` - weather and route tools for an AI travel planning team
//!
//! This library provides the cached location lookup, the hourly weather and
//! route fetchers, and the tool surface the agent orchestration layer calls.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routing;
pub mod tools;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use cache::{CacheWrite, LocationCache};
pub use config::PlannerConfig;
pub use error::PlannerError;
pub use models::{CurrentConditions, HourlyForecastEntry, RouteSummary, Temperature, WeatherReport};
pub use routing::RouteClient;
pub use tools::{Tool, ToolDefinition, ToolRegistry};
pub use weather::WeatherClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;
