//! Pipeline error types.
//!
//! Every externally-fallible step (tool invocation, workspace IO, upload) has
//! its own variant so the API layer can translate failures without string
//! matching.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("downloader did not exit within {timeout:?}")]
    ToolTimeout { timeout: Duration },

    #[error("downloader exited with status {status:?}: {stderr}")]
    ToolFailed {
        status: Option<i32>,
        stderr: String,
    },

    #[error("unparseable downloader metadata: {0}")]
    MalformedMetadata(String),

    #[error("no file produced by the downloader")]
    NoArtifactProduced,

    #[error("upload endpoint returned status {status}")]
    RelayFailed { status: u16, body: String },

    #[error("server configuration incomplete: {0}")]
    Configuration(String),

    #[error("invalid downloader path: {0}")]
    InvalidToolPath(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("upload request failed: {0}")]
    Upload(#[from] reqwest::Error),
}
