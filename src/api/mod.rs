use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::PlannerError;
use crate::tools::{ToolDefinition, ToolRegistry};

pub fn router(registry: Arc<ToolRegistry>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(call_tool))
        .with_state(registry)
}

/// Error response carrying the technical message and a user-facing one
pub struct ApiError(PlannerError);

impl From<PlannerError> for ApiError {
    fn from(err: PlannerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!("Tool call failed: {}", self.0);
        } else {
            tracing::warn!("Tool call rejected: {}", self.0);
        }
        let body = json!({
            "error": self.0.to_string(),
            "message": self.0.user_message(),
        });
        (status, Json(body)).into_response()
    }
}

fn status_for(err: &PlannerError) -> StatusCode {
    match err {
        PlannerError::InvalidArguments { .. } => StatusCode::BAD_REQUEST,
        PlannerError::NotFound { .. } => StatusCode::NOT_FOUND,
        PlannerError::Config { .. } => StatusCode::SERVICE_UNAVAILABLE,
        PlannerError::Upstream { .. }
        | PlannerError::Http { .. }
        | PlannerError::InvalidResponse { .. } => StatusCode::BAD_GATEWAY,
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

async fn list_tools(State(registry): State<Arc<ToolRegistry>>) -> Json<Vec<ToolDefinition>> {
    Json(registry.definitions())
}

async fn call_tool(
    State(registry): State<Arc<ToolRegistry>>,
    Path(name): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, Response> {
    let tool = registry.get(&name).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("Unknown tool '{name}'"),
                "message": "This tool is not available.",
            })),
        )
            .into_response()
    })?;

    let Json(args) = payload.map_err(|rejection| {
        ApiError::from(PlannerError::invalid_arguments(rejection.body_text())).into_response()
    })?;

    let result = tool
        .call(args)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;
    Ok(Json(result))
}
