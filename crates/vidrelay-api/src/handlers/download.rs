use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use vidrelay_core::AppError;
use vidrelay_pipeline::DownloadRequest;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DownloadRequestBody {
    /// Source media URL.
    pub url: String,
    /// Format selector token from /formats. Defaults to a quality-preference
    /// expression when absent.
    #[serde(default)]
    pub format_id: Option<String>,
}

#[utoipa::path(
    post,
    path = "/download",
    tag = "relay",
    request_body = DownloadRequestBody,
    responses(
        (status = 200, description = "Upload endpoint's response, passed through verbatim"),
        (status = 400, description = "Missing or empty url", body = ErrorResponse),
        (status = 500, description = "Download or relay failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, body), fields(operation = "download_and_relay"))]
pub async fn download_video(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<DownloadRequestBody>,
) -> Result<Response, HttpAppError> {
    let url = body.url.trim().to_string();
    if url.is_empty() {
        return Err(HttpAppError::from(AppError::InvalidInput(
            "url must not be empty".to_string(),
        )));
    }

    tracing::info!(url = %url, format_id = ?body.format_id, "Download requested");
    let request = DownloadRequest {
        url,
        format_id: body.format_id,
    };
    let result = state.relay.download_and_relay(&request).await?;

    // Relay the upload endpoint's status and JSON body to the caller.
    let status = StatusCode::from_u16(result.status).unwrap_or(StatusCode::OK);
    Ok((status, Json(result.body)).into_response())
}
