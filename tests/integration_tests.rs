//! Integration tests for the TravelPlanner tool server

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use travelplanner::{LocationCache, PlannerConfig, ToolRegistry, web};

const DIRECTIONS_PATH: &str = "/maps/api/directions/json";

fn config_for(server: &MockServer, dir: &TempDir, with_keys: bool) -> PlannerConfig {
    let mut config = PlannerConfig::default();
    config.weather.base_url = server.uri();
    config.maps.directions_url = format!("{}{}", server.uri(), DIRECTIONS_PATH);
    config.cache.location = Some(
        dir.path()
            .join("location_cache.json")
            .to_string_lossy()
            .into_owned(),
    );
    if with_keys {
        config.weather.api_key = Some("weather-key".to_string());
        config.maps.api_key = Some("maps-key".to_string());
    }
    config
}

fn app_for(config: &PlannerConfig) -> Router {
    let registry = ToolRegistry::from_config(config).unwrap();
    web::app(Arc::new(registry))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn call(tool: &str, args: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/tools/{tool}"))
        .header("content-type", "application/json")
        .body(Body::from(args.to_string()))
        .unwrap()
}

async fn mount_weather(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/search"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "Key": "623",
            "LocalizedName": "Paris",
            "Country": { "ID": "FR", "LocalizedName": "France" }
        }])))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/currentconditions/v1/623"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "LocalObservationDateTime": "2025-06-01T14:00:00+02:00",
            "WeatherText": "Sunny",
            "HasPrecipitation": false,
            "RelativeHumidity": 40,
            "Temperature": {
                "Metric": { "Value": 24.1, "Unit": "C" },
                "Imperial": { "Value": 75.0, "Unit": "F" }
            }
        }])))
        .mount(server)
        .await;

    let hours: Vec<Value> = (0..12)
        .map(|i| {
            json!({
                "IconPhrase": "Sunny",
                "Temperature": { "Value": 20 + i, "Unit": "C" },
                "PrecipitationProbability": 0
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/forecasts/v1/hourly/12hour/623"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(hours)))
        .mount(server)
        .await;
}

/// Health endpoint reports the crate version
#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let app = app_for(&config_for(&server, &dir, true));

    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], travelplanner::VERSION);
}

/// Both tools are listed with their parameters
#[tokio::test]
async fn test_list_tools() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let app = app_for(&config_for(&server, &dir, true));

    let request = Request::builder()
        .uri("/api/tools")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    let tools = body.as_array().unwrap();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0]["name"], "get_hourly_weather");
    assert_eq!(tools[0]["parameters"][0]["name"], "location");
    assert_eq!(tools[1]["name"], "get_route_summary");
    assert_eq!(tools[1]["parameters"].as_array().unwrap().len(), 2);
}

/// A weather call resolves the city once and reuses the cached key afterwards
#[tokio::test]
async fn test_weather_tool_uses_location_cache() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_weather(&server).await;
    let config = config_for(&server, &dir, true);

    let (status, body) = send(
        app_for(&config),
        call("get_hourly_weather", &json!({ "location": "Paris" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "Paris");
    assert_eq!(body["location_key"], "623");
    assert_eq!(body["country"], "France");
    assert_eq!(body["current_conditions"]["weather_text"], "Sunny");
    let hourly = body["hourly_forecast"].as_array().unwrap();
    assert_eq!(hourly.len(), 12);
    assert_eq!(hourly[0]["relative_time"], "+1 hour");
    assert_eq!(hourly[11]["relative_time"], "+12 hours");

    let cache = LocationCache::new(config.cache_path());
    assert_eq!(cache.get("Paris").await, Some("623".to_string()));

    // Second call goes through a fresh registry; the search mock expects one hit
    let (status, body) = send(
        app_for(&config),
        call("get_hourly_weather", &json!({ "location": "Paris" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location_key"], "623");
    assert_eq!(body["country"], "Unknown");
}

/// Unknown cities map to 404
#[tokio::test]
async fn test_weather_tool_unknown_city() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let app = app_for(&config_for(&server, &dir, true));

    let (status, body) = send(
        app,
        call("get_hourly_weather", &json!({ "location": "Atlantis" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Atlantis"));
    assert!(body["message"].is_string());
}

/// Route calls return the summary and map fields
#[tokio::test]
async fn test_route_tool() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path(DIRECTIONS_PATH))
        .and(query_param("origin", "Portland"))
        .and(query_param("destination", "Dallas"))
        .and(query_param("key", "maps-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "routes": [{
                "legs": [{
                    "distance": { "text": "2,054 mi" },
                    "duration": { "text": "1 day 6 hours" }
                }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = app_for(&config_for(&server, &dir, true));

    let (status, body) = send(
        app,
        call(
            "get_route_summary",
            &json!({ "origin": "Portland", "destination": "Dallas" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["route_summary"],
        "2,054 mi in approximately 1 day 6 hours"
    );
    assert_eq!(
        body["map_link"],
        "https://www.google.com/maps/dir/Portland/Dallas"
    );
    assert!(body["map_embed"].as_str().unwrap().starts_with("<iframe"));
}

/// Upstream rejections map to 502
#[tokio::test]
async fn test_route_tool_upstream_rejection() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path(DIRECTIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "routes": []
        })))
        .mount(&server)
        .await;
    let app = app_for(&config_for(&server, &dir, true));

    let (status, body) = send(
        app,
        call(
            "get_route_summary",
            &json!({ "origin": "Portland", "destination": "Dallas" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("REQUEST_DENIED"));
}

/// Missing arguments map to 400 without touching the upstream
#[tokio::test]
async fn test_invalid_arguments() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let app = app_for(&config_for(&server, &dir, true));

    let (status, body) = send(app, call("get_route_summary", &json!({ "origin": "Portland" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("destination"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// Unregistered tool names map to 404
#[tokio::test]
async fn test_unknown_tool() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let app = app_for(&config_for(&server, &dir, true));

    let (status, body) = send(app, call("book_hotel", &json!({}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("book_hotel"));
}

/// Calls without credentials map to 503 and never reach the provider
#[tokio::test]
async fn test_missing_api_key() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let app = app_for(&config_for(&server, &dir, false));

    let (status, body) = send(
        app,
        call("get_hourly_weather", &json!({ "location": "Paris" })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("ACCUWEATHER_API_KEY"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// Bodies that are not JSON objects get the same error shape as bad arguments
#[tokio::test]
async fn test_malformed_body_is_invalid_arguments() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = config_for(&server, &dir, true);

    let requests = [
        Request::builder()
            .method("POST")
            .uri("/api/tools/get_hourly_weather")
            .header("content-type", "application/json")
            .body(Body::from("{\"location\": "))
            .unwrap(),
        Request::builder()
            .method("POST")
            .uri("/api/tools/get_hourly_weather")
            .body(Body::empty())
            .unwrap(),
    ];

    for request in requests {
        let (status, body) = send(app_for(&config), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid arguments"));
        assert!(body["message"].is_string());
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}
