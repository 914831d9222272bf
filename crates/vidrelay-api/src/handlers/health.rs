use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Liveness string, no business meaning.
pub async fn index() -> &'static str {
    "Download relay is running"
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Installed downloader version, or the failure if it can't be probed.
    pub tool: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "admin",
    responses(
        (status = 200, description = "Service health and downloader availability", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.runner.version(VERSION_PROBE_TIMEOUT).await {
        Ok(version) => Json(HealthResponse {
            status: "healthy".to_string(),
            tool: version,
        }),
        Err(e) => {
            tracing::error!(error = %e, "Downloader health check failed");
            Json(HealthResponse {
                status: "degraded".to_string(),
                tool: format!("unavailable: {}", e),
            })
        }
    }
}
