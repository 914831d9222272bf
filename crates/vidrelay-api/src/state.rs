//! Application state.
//!
//! All fields are immutable for the process lifetime; concurrent requests
//! share nothing else. Handlers receive the state as `Arc<AppState>`.

use vidrelay_core::Config;
use vidrelay_pipeline::{FormatLister, Relay, RelayConfig, ToolRunner};

pub struct AppState {
    pub config: Config,
    /// Shared runner for the admin endpoints (self-update, health probe).
    pub runner: ToolRunner,
    pub lister: FormatLister,
    pub relay: Relay,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, anyhow::Error> {
        let runner = ToolRunner::new(config.tool_path.clone())?;
        let lister = FormatLister::new(runner.clone(), config.probe_timeout);
        let relay = Relay::new(
            runner.clone(),
            RelayConfig {
                upload_url: config.upload_url.clone(),
                upload_api_key: config.upload_api_key.clone(),
                download_timeout: config.download_timeout,
                upload_timeout: config.upload_timeout,
            },
        )?;

        Ok(Self {
            config,
            runner,
            lister,
            relay,
        })
    }
}
