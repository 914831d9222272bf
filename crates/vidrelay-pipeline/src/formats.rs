//! Format probing.
//!
//! Invokes the downloader in metadata-only mode and projects the manifest's
//! format list into the simplified shape clients select from.

use crate::error::PipelineError;
use crate::tool::ToolRunner;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

/// One selectable format, derived from the probe manifest.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormatDescriptor {
    /// Opaque selector token, passed back in download requests.
    pub id: String,
    /// Human-readable summary, e.g. "1920x1080 (mp4) - approx 12.34MB".
    pub note: String,
    /// Container extension.
    pub ext: String,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    formats: Vec<ManifestFormat>,
}

#[derive(Debug, Deserialize)]
struct ManifestFormat {
    format_id: String,
    #[serde(default)]
    resolution: Option<String>,
    #[serde(default)]
    ext: Option<String>,
    #[serde(default)]
    filesize: Option<f64>,
    #[serde(default)]
    filesize_approx: Option<f64>,
}

fn describe(format: &ManifestFormat) -> FormatDescriptor {
    let resolution = format.resolution.as_deref().unwrap_or("audio only");
    let ext = format.ext.clone().unwrap_or_else(|| "unknown".to_string());
    let mut note = format!("{} ({})", resolution, ext);
    if let Some(bytes) = format.filesize.or(format.filesize_approx) {
        note.push_str(&format!(" - approx {:.2}MB", bytes / (1024.0 * 1024.0)));
    }
    FormatDescriptor {
        id: format.format_id.clone(),
        note,
        ext,
    }
}

/// Lists selectable formats for a source URL via a metadata probe.
#[derive(Clone, Debug)]
pub struct FormatLister {
    runner: ToolRunner,
    probe_timeout: Duration,
}

impl FormatLister {
    pub fn new(runner: ToolRunner, probe_timeout: Duration) -> Self {
        Self {
            runner,
            probe_timeout,
        }
    }

    /// Probe `url` and return its formats in manifest order. A manifest with
    /// zero formats yields an empty list, not an error.
    #[tracing::instrument(skip(self), fields(url = %url))]
    pub async fn list_formats(&self, url: &str) -> Result<Vec<FormatDescriptor>, PipelineError> {
        let output = self
            .runner
            .run(&["--dump-json", "--no-playlist", "--", url], self.probe_timeout)
            .await?;

        let manifest: Manifest = serde_json::from_slice(&output.stdout)
            .map_err(|e| PipelineError::MalformedMetadata(e.to_string()))?;

        tracing::info!(formats = manifest.formats.len(), "Probe completed");
        Ok(manifest.formats.iter().map(describe).collect())
    }
}
