//! Download-and-relay scenarios: pass-through of the upload endpoint's
//! response, failure translation, and workspace teardown.

mod helpers;

use axum::http::StatusCode;
use helpers::{setup_test_app, setup_test_app_with, spawn_upload_endpoint};
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Stub body that writes one artifact into the workspace, the way the real
/// tool expands its output template.
const DOWNLOAD_STUB: &str = r#"case "$1" in
  --no-playlist)
    dir=$(dirname "$5")
    printf 'media-bytes' > "$dir/Title-[137].mp4"
    ;;
esac
exit 0"#;

#[tokio::test]
async fn test_download_relays_upload_response_verbatim() {
    let (upload_url, hits) = spawn_upload_endpoint(201, r#"{"id":"xyz"}"#).await;
    let app = setup_test_app(DOWNLOAD_STUB, Some(upload_url));

    let response = app
        .server
        .post("/download")
        .json(&json!({"url": "https://youtu.be/abc123"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body, json!({"id": "xyz"}));
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // The workspace is gone after the call returns.
    let template = app.recorded_output_template().unwrap();
    assert!(!template.parent().unwrap().exists());
}

#[tokio::test]
async fn test_download_passes_requested_format_to_tool() {
    let (upload_url, _hits) = spawn_upload_endpoint(200, r#"{"ok":true}"#).await;
    let app = setup_test_app(DOWNLOAD_STUB, Some(upload_url));

    let response = app
        .server
        .post("/download")
        .json(&json!({"url": "https://youtu.be/abc123", "format_id": "137"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let log = std::fs::read_to_string(&app.tool_log).unwrap();
    assert!(log.contains("-f 137 "));
}

#[tokio::test]
async fn test_download_without_configuration_is_500_and_spawns_nothing() {
    let app = setup_test_app(DOWNLOAD_STUB, None);

    let response = app
        .server
        .post("/download")
        .json(&json!({"url": "https://youtu.be/abc123"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("UPLOAD_URL"));
    assert_eq!(app.invocation_count(), 0);
}

#[tokio::test]
async fn test_download_timeout_is_500_and_workspace_removed() {
    let (upload_url, hits) = spawn_upload_endpoint(201, r#"{"id":"xyz"}"#).await;
    let app = setup_test_app_with("sleep 30", Some(upload_url), |config| {
        config.download_timeout = Duration::from_millis(300);
    });

    let response = app
        .server
        .post("/download")
        .json(&json!({"url": "https://youtu.be/abc123"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("timed out"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let template = app.recorded_output_template().unwrap();
    assert!(!template.parent().unwrap().exists());
}

#[tokio::test]
async fn test_download_zero_artifacts_is_500_without_upload() {
    let (upload_url, hits) = spawn_upload_endpoint(201, r#"{"id":"xyz"}"#).await;
    // Clean exit, nothing written.
    let app = setup_test_app("exit 0", Some(upload_url));

    let response = app
        .server
        .post("/download")
        .json(&json!({"url": "https://youtu.be/abc123"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("no output file"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let template = app.recorded_output_template().unwrap();
    assert!(!template.parent().unwrap().exists());
}

#[tokio::test]
async fn test_upload_rejection_is_500_and_workspace_removed() {
    let (upload_url, hits) = spawn_upload_endpoint(503, r#"{"error":"storage full"}"#).await;
    let app = setup_test_app(DOWNLOAD_STUB, Some(upload_url));

    let response = app
        .server
        .post("/download")
        .json(&json!({"url": "https://youtu.be/abc123"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("503"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let template = app.recorded_output_template().unwrap();
    assert!(!template.parent().unwrap().exists());
}

#[tokio::test]
async fn test_download_tool_failure_is_500_envelope() {
    let (upload_url, hits) = spawn_upload_endpoint(201, r#"{"id":"xyz"}"#).await;
    let app = setup_test_app("echo 'ERROR: video unavailable' >&2\nexit 1", Some(upload_url));

    let response = app
        .server
        .post("/download")
        .json(&json!({"url": "https://youtu.be/abc123"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("video unavailable"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}
