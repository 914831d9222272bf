//! Download-and-relay orchestration: tool invocation inside a scoped
//! workspace, artifact selection, and the streaming multipart upload to the
//! remote storage endpoint.

use crate::error::PipelineError;
use crate::tool::ToolRunner;
use crate::workspace::Workspace;
use reqwest::multipart;
use std::time::Duration;
use tokio_util::io::ReaderStream;

/// Quality-preference expression used when the caller picks no format.
pub const DEFAULT_FORMAT_SELECTOR: &str =
    "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// A validated download request. `url` is trimmed and non-empty by the time
/// it reaches the orchestrator.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub format_id: Option<String>,
}

/// Upload endpoint connection settings and per-step deadlines.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub upload_url: Option<String>,
    pub upload_api_key: Option<String>,
    pub download_timeout: Duration,
    pub upload_timeout: Duration,
}

/// Verbatim status and body returned by the upload endpoint.
#[derive(Debug)]
pub struct UploadResult {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Orchestrates one download-and-relay call: workspace → download → select
/// artifact → stream upload. The workspace is torn down on every exit path.
pub struct Relay {
    runner: ToolRunner,
    client: reqwest::Client,
    config: RelayConfig,
}

impl Relay {
    pub fn new(runner: ToolRunner, config: RelayConfig) -> Result<Self, PipelineError> {
        // Per-request timeouts; large uploads must not share one client-wide
        // deadline with anything else.
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            runner,
            client,
            config,
        })
    }

    #[tracing::instrument(skip(self, request), fields(url = %request.url))]
    pub async fn download_and_relay(
        &self,
        request: &DownloadRequest,
    ) -> Result<UploadResult, PipelineError> {
        // Configuration is checked before any subprocess or network work.
        let upload_url = self
            .config
            .upload_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PipelineError::Configuration("UPLOAD_URL is not set".to_string()))?;
        let api_key = self
            .config
            .upload_api_key
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PipelineError::Configuration("UPLOAD_API_KEY is not set".to_string()))?;

        let source_url = request.url.trim();
        let selector = request
            .format_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_FORMAT_SELECTOR);

        let workspace = Workspace::create()?;
        let template = workspace.path().join("%(title)s-[%(format_id)s].%(ext)s");
        let template = template.to_string_lossy();

        tracing::info!(format = selector, "Starting download");
        // The artifact's final bytes are durable only once the tool process
        // has exited; the upload must not start before this returns.
        self.runner
            .run(
                &[
                    "--no-playlist",
                    "-f",
                    selector,
                    "-o",
                    template.as_ref(),
                    "--",
                    source_url,
                ],
                self.config.download_timeout,
            )
            .await?;

        let artifact = workspace.artifact()?;
        let file_name = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "download.bin".to_string());
        tracing::info!(file = %file_name, "Download complete, starting upload");

        let file = tokio::fs::File::open(&artifact).await?;
        let length = file.metadata().await?.len();
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = multipart::Part::stream_with_length(body, length).file_name(file_name.clone());
        let form = multipart::Form::new().part("video", part);

        let response = self
            .client
            .post(upload_url)
            .header("X-API-KEY", api_key)
            .multipart(form)
            .timeout(self.config.upload_timeout)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(PipelineError::RelayFailed {
                status: status.as_u16(),
                body: text,
            });
        }

        tracing::info!(status = status.as_u16(), file = %file_name, "Upload complete");
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
        Ok(UploadResult {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(upload_url: Option<&str>, api_key: Option<&str>) -> RelayConfig {
        RelayConfig {
            upload_url: upload_url.map(String::from),
            upload_api_key: api_key.map(String::from),
            download_timeout: Duration::from_secs(5),
            upload_timeout: Duration::from_secs(5),
        }
    }

    fn request(url: &str) -> DownloadRequest {
        DownloadRequest {
            url: url.to_string(),
            format_id: None,
        }
    }

    #[tokio::test]
    async fn test_missing_upload_url_fails_before_any_work() {
        let runner = ToolRunner::new("definitely-not-on-path".to_string()).unwrap();
        let relay = Relay::new(runner, config_with(None, Some("secret"))).unwrap();
        let err = relay
            .download_and_relay(&request("https://example.com/v"))
            .await
            .unwrap_err();
        // The tool path doesn't resolve, so reaching the spawn would surface
        // an Io error instead of the expected Configuration error.
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_work() {
        let runner = ToolRunner::new("definitely-not-on-path".to_string()).unwrap();
        let relay = Relay::new(
            runner,
            config_with(Some("http://127.0.0.1:1/upload"), None),
        )
        .unwrap();
        let err = relay
            .download_and_relay(&request("https://example.com/v"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[cfg(unix)]
    mod with_stub_tool {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn stub_tool(dir: &std::path::Path, script: &str) -> ToolRunner {
            let path = dir.join("fake-yt-dlp");
            std::fs::write(&path, script).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            ToolRunner::new(path.to_str().unwrap().to_string()).unwrap()
        }

        #[tokio::test]
        async fn test_clean_exit_with_no_files_is_no_artifact_produced() {
            let dir = tempfile::tempdir().unwrap();
            // Exits zero without writing anything; the unroutable upload URL
            // proves no upload is attempted.
            let runner = stub_tool(dir.path(), "#!/bin/sh\nexit 0\n");
            let relay = Relay::new(
                runner,
                config_with(Some("http://127.0.0.1:1/upload"), Some("secret")),
            )
            .unwrap();
            let err = relay
                .download_and_relay(&request("https://example.com/v"))
                .await
                .unwrap_err();
            assert!(matches!(err, PipelineError::NoArtifactProduced));
        }

        #[tokio::test]
        async fn test_tool_failure_propagates_and_workspace_is_gone() {
            let dir = tempfile::tempdir().unwrap();
            let marker = dir.path().join("seen-args");
            // Records the output template so the test can locate the
            // workspace after the call.
            let script = format!(
                "#!/bin/sh\nprintf '%s' \"$5\" > {}\nexit 1\n",
                marker.display()
            );
            let runner = stub_tool(dir.path(), &script);
            let relay = Relay::new(
                runner,
                config_with(Some("http://127.0.0.1:1/upload"), Some("secret")),
            )
            .unwrap();
            let err = relay
                .download_and_relay(&request("https://example.com/v"))
                .await
                .unwrap_err();
            assert!(matches!(err, PipelineError::ToolFailed { .. }));

            let template = std::fs::read_to_string(&marker).unwrap();
            let workspace_dir = std::path::Path::new(&template).parent().unwrap();
            assert!(!workspace_dir.exists());
        }
    }
}
