//! Shared-secret authentication for admin routes.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use vidrelay_core::AppError;

pub const API_KEY_HEADER: &str = "X-API-KEY";

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Rejects requests whose `X-API-KEY` header does not match the configured
/// shared secret. The protected handler never runs on a failed check.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state
        .config
        .upload_api_key
        .as_deref()
        .filter(|s| !s.is_empty())
    else {
        return HttpAppError(AppError::Configuration(
            "UPLOAD_API_KEY is not set".to_string(),
        ))
        .into_response();
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if secure_compare(key, expected) => next.run(request).await,
        _ => {
            tracing::warn!("Rejected request with missing or invalid API key");
            HttpAppError(AppError::Unauthorized(
                "invalid or missing API key".to_string(),
            ))
            .into_response()
        }
    }
}
