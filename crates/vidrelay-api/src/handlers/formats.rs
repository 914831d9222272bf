use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use vidrelay_core::AppError;
use vidrelay_pipeline::FormatDescriptor;

#[derive(Debug, Deserialize, ToSchema)]
pub struct FormatsRequest {
    /// Source media URL to probe.
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormatsResponse {
    /// Always "success".
    pub status: String,
    pub formats: Vec<FormatDescriptor>,
}

#[utoipa::path(
    post,
    path = "/formats",
    tag = "relay",
    request_body = FormatsRequest,
    responses(
        (status = 200, description = "Selectable formats in manifest order", body = FormatsResponse),
        (status = 400, description = "Missing or empty url", body = ErrorResponse),
        (status = 500, description = "Probe failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, body), fields(operation = "list_formats"))]
pub async fn list_formats(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<FormatsRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let url = body.url.trim().to_string();
    if url.is_empty() {
        return Err(HttpAppError::from(AppError::InvalidInput(
            "url must not be empty".to_string(),
        )));
    }

    tracing::info!(url = %url, "Format probe requested");
    let formats = state.lister.list_formats(&url).await?;

    Ok(Json(FormatsResponse {
        status: "success".to_string(),
        formats,
    }))
}
