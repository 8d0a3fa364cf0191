//! Tool surface for the agent orchestration layer
//!
//! Each fetcher is wrapped as a named tool that takes JSON arguments and
//! returns a plain JSON record.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::LocationCache;
use crate::config::PlannerConfig;
use crate::routing::RouteClient;
use crate::weather::WeatherClient;
use crate::{PlannerError, Result};

pub const WEATHER_TOOL: &str = "get_hourly_weather";
pub const ROUTE_TOOL: &str = "get_route_summary";

/// Description of a tool for the orchestration layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
    pub required: bool,
}

impl ToolParameter {
    fn required_string(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type: "string".to_string(),
            description: description.to_string(),
            required: true,
        }
    }
}

/// A callable tool
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// Runs the tool with a JSON object of arguments
    async fn call(&self, args: Value) -> Result<Value>;

    fn name(&self) -> String {
        self.definition().name
    }
}

/// Extracts a required, non-blank string argument
fn string_arg(args: &Value, name: &str) -> Result<String> {
    let value = args
        .get(name)
        .ok_or_else(|| PlannerError::invalid_arguments(format!("'{name}' is required")))?;
    let text = value
        .as_str()
        .ok_or_else(|| PlannerError::invalid_arguments(format!("'{name}' must be a string")))?;
    if text.trim().is_empty() {
        return Err(PlannerError::invalid_arguments(format!(
            "'{name}' cannot be empty"
        )));
    }
    Ok(text.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| PlannerError::invalid_response(format!("Failed to encode result: {e}")))
}

/// Hourly weather tool
pub struct WeatherTool {
    client: WeatherClient,
}

impl WeatherTool {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: WEATHER_TOOL.to_string(),
            description: "Get current conditions and the hourly forecast for a location"
                .to_string(),
            parameters: vec![ToolParameter::required_string(
                "location",
                "City or place name, e.g. \"Paris\"",
            )],
        }
    }

    async fn call(&self, args: Value) -> Result<Value> {
        let location = string_arg(&args, "location")?;
        let report = self.client.get_hourly_weather(&location).await?;
        to_json(&report)
    }
}

/// Route summary tool
pub struct RouteTool {
    client: RouteClient,
}

impl RouteTool {
    pub fn new(client: RouteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for RouteTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: ROUTE_TOOL.to_string(),
            description: "Get a route summary and Google Maps link between two locations"
                .to_string(),
            parameters: vec![
                ToolParameter::required_string("origin", "Starting location, e.g. \"Portland\""),
                ToolParameter::required_string(
                    "destination",
                    "Destination location, e.g. \"Dallas\"",
                ),
            ],
        }
    }

    async fn call(&self, args: Value) -> Result<Value> {
        let origin = string_arg(&args, "origin")?;
        let destination = string_arg(&args, "destination")?;
        let route = self.client.get_route_summary(&origin, &destination).await?;
        to_json(&route)
    }
}

/// Registry of the available tools, keyed by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the weather and route tools from configuration
    pub fn from_config(config: &PlannerConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("TravelPlanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;
        let cache = LocationCache::new(config.cache_path());
        tracing::debug!("Location cache at {}", cache.path().display());

        let mut registry = Self::new();
        registry.register(Arc::new(WeatherTool::new(WeatherClient::new(
            http.clone(),
            config.weather.clone(),
            cache,
        ))));
        registry.register(Arc::new(RouteTool::new(RouteClient::new(
            http,
            config.maps.clone(),
        ))));
        Ok(registry)
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Tool definitions sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> =
            self.tools.values().map(|tool| tool.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Calls the tool registered under `name`
    #[tracing::instrument(skip(self, args))]
    pub async fn call(&self, name: &str, args: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| PlannerError::invalid_arguments(format!("Unknown tool '{name}'")))?;
        tool.call(args).await
    }
}
