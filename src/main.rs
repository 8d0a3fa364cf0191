use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;

use travelplanner::logging::{self, mask_secret};
use travelplanner::tools::{ROUTE_TOOL, WEATHER_TOOL};
use travelplanner::{PlannerConfig, ToolRegistry, web};

/// Weather and route tools for an AI travel planning team
#[derive(Debug, Parser)]
#[command(name = "travelplanner", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the tools over HTTP (default)
    Serve,

    /// Print the hourly weather report for a location
    Weather {
        /// City or place name
        location: String,
    },

    /// Print a route summary between two places
    Route { origin: String, destination: String },

    /// List the available tools
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PlannerConfig::load_from_path(cli.config)?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging)?;

    for (name, key) in [
        ("weather", &config.weather.api_key),
        ("maps", &config.maps.api_key),
    ] {
        match key {
            Some(key) => tracing::info!("{} API key = {}", name, mask_secret(key)),
            None => tracing::warn!("{} API key is not set; its tool will be unavailable", name),
        }
    }

    let registry = ToolRegistry::from_config(&config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => web::run(&config.server, Arc::new(registry)).await?,
        Command::Weather { location } => {
            let report = registry
                .call(WEATHER_TOOL, json!({ "location": location }))
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Route {
            origin,
            destination,
        } => {
            let route = registry
                .call(
                    ROUTE_TOOL,
                    json!({ "origin": origin, "destination": destination }),
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&route)?);
        }
        Command::Tools => {
            println!("{}", serde_json::to_string_pretty(&registry.definitions())?);
        }
    }

    Ok(())
}
