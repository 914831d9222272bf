use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateResponse {
    /// Always "success".
    pub status: String,
    /// Updater output.
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/update",
    tag = "admin",
    responses(
        (status = 200, description = "Downloader updated", body = UpdateResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 500, description = "Update failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "update_tool"))]
pub async fn update_tool(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    tracing::info!(tool = %state.runner.tool_path(), "Starting downloader self-update");
    let message = state
        .runner
        .self_update(state.config.update_timeout)
        .await?;
    tracing::info!("Downloader self-update completed");

    Ok(Json(UpdateResponse {
        status: "success".to_string(),
        message,
    }))
}
