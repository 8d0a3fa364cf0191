use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api;
use crate::config::ServerConfig;
use crate::tools::ToolRegistry;

pub fn app(registry: Arc<ToolRegistry>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(registry))
        .layer(cors)
}

pub async fn run(server: &ServerConfig, registry: Arc<ToolRegistry>) -> Result<()> {
    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Tool server running at http://{}", addr);
    axum::serve(listener, app(registry))
        .await
        .context("Tool server stopped")?;
    Ok(())
}
