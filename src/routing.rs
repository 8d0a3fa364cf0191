//! Route summaries from the Google Maps Directions API

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::config::{MAPS_API_KEY_VAR, MapsConfig};
use crate::models::RouteSummary;
use crate::{PlannerError, Result};

const STATUS_OK: &str = "OK";

/// Directions API client
pub struct RouteClient {
    http: Client,
    config: MapsConfig,
}

impl RouteClient {
    pub fn new(http: Client, config: MapsConfig) -> Self {
        Self { http, config }
    }

    /// Get a route summary and map links between two places
    #[instrument(skip(self))]
    pub async fn get_route_summary(&self, origin: &str, destination: &str) -> Result<RouteSummary> {
        let api_key = self.api_key()?;

        debug!("Calling the directions API");
        let response: DirectionsResponse = self
            .http
            .get(&self.config.directions_url)
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("key", api_key),
            ])
            .send()
            .await?
            .json()
            .await?;

        if response.status != STATUS_OK {
            error!("Directions API returned status {}", response.status);
            return Err(PlannerError::upstream(
                response.status,
                response.error_message.unwrap_or_default(),
            ));
        }

        let leg = response
            .routes
            .into_iter()
            .next()
            .and_then(|route| route.legs.into_iter().next())
            .ok_or_else(|| PlannerError::invalid_response("Directions response has no route legs"))?;

        let summary = format!(
            "{} in approximately {}",
            leg.distance.text, leg.duration.text
        );
        info!("Route from '{}' to '{}': {}", origin, destination, summary);

        Ok(RouteSummary {
            route_summary: summary,
            map_link: self.map_link(origin, destination),
            map_embed: self.map_embed(api_key, origin, destination),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| PlannerError::config(format!("{MAPS_API_KEY_VAR} is not set")))
    }

    fn map_link(&self, origin: &str, destination: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.link_base.trim_end_matches('/'),
            origin.replace(' ', "+"),
            destination.replace(' ', "+")
        )
    }

    fn map_embed(&self, api_key: &str, origin: &str, destination: &str) -> String {
        format!(
            r#"<iframe width="100%" height="300" frameborder="0" style="border:0" src="{}?key={}&origin={}&destination={}" allowfullscreen></iframe>"#,
            self.config.embed_url,
            urlencoding::encode(api_key),
            urlencoding::encode(origin),
            urlencoding::encode(destination)
        )
    }
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: TextValue,
    duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}
