//! Result records produced by the planner tools
//!
//! - Weather: current conditions and the hourly forecast for a location
//! - Route: driving summary and map links between two places

pub mod route;
pub mod weather;

pub use route::RouteSummary;
pub use weather::{CurrentConditions, HourlyForecastEntry, Temperature, WeatherReport};
