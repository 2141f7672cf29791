use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

use crate::config::AppConfig;
use crate::pipeline;

const AUTH_HEADER: &str = "authentication";

/// Shared state for the request-trigger handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/trigger", post(trigger))
        .with_state(state)
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "rankcord",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Request trigger: an exact shared-secret match on the `authentication`
/// header runs the pipeline and echoes the computed result. Anything else is
/// an empty 403 with no pipeline work done.
async fn trigger(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let presented = headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok());

    if !is_authorized(&state.config.api_key, presented) {
        warn!("Rejected trigger request with missing or wrong secret");
        return StatusCode::FORBIDDEN.into_response();
    }

    match pipeline::run_once(&state.config).await {
        Ok(outcome) => Json(json!({ "result": outcome })).into_response(),
        Err(e) => {
            error!(error = %e, "Triggered pipeline run failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// An empty configured secret disables the trigger outright; nothing the
/// caller presents can match it.
fn is_authorized(configured: &str, presented: Option<&str>) -> bool {
    !configured.is_empty() && presented == Some(configured)
}
