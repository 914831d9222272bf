//! Configuration module
//!
//! Deployment configuration is read once at startup and treated as immutable
//! for the process lifetime. The upload endpoint and shared secret are
//! optional at startup: calls that need them fail fast with a configuration
//! error instead of preventing the service from booting.

use std::env;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOOL_PATH: &str = "yt-dlp";
const PROBE_TIMEOUT_SECS: u64 = 60;
const DOWNLOAD_TIMEOUT_SECS: u64 = 1800;
const UPLOAD_TIMEOUT_SECS: u64 = 600;
const UPDATE_TIMEOUT_SECS: u64 = 120;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Remote endpoint that receives downloaded files. Required for /download.
    pub upload_url: Option<String>,
    /// Shared secret: checked on inbound /update requests and attached as the
    /// X-API-KEY header on outbound uploads.
    pub upload_api_key: Option<String>,
    /// Path to the downloader executable.
    pub tool_path: String,
    pub probe_timeout: Duration,
    pub download_timeout: Duration,
    pub upload_timeout: Duration,
    pub update_timeout: Duration,
}

fn env_duration(name: &str, default_secs: u64) -> Duration {
    let secs = env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default_secs);
    Duration::from_secs(secs)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub(crate) fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        Ok(Self {
            server_port,
            cors_origins: parse_cors_origins(&cors_origins_str),
            environment,
            upload_url: non_empty(env::var("UPLOAD_URL").ok()),
            upload_api_key: non_empty(env::var("UPLOAD_API_KEY").ok()),
            tool_path: env::var("YTDLP_PATH").unwrap_or_else(|_| DEFAULT_TOOL_PATH.to_string()),
            probe_timeout: env_duration("PROBE_TIMEOUT_SECS", PROBE_TIMEOUT_SECS),
            download_timeout: env_duration("DOWNLOAD_TIMEOUT_SECS", DOWNLOAD_TIMEOUT_SECS),
            upload_timeout: env_duration("UPLOAD_TIMEOUT_SECS", UPLOAD_TIMEOUT_SECS),
            update_timeout: env_duration("UPDATE_TIMEOUT_SECS", UPDATE_TIMEOUT_SECS),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

impl Default for Config {
    /// Development defaults with no upload endpoint configured. Used by tests
    /// that build a config explicitly instead of reading the environment.
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            upload_url: None,
            upload_api_key: None,
            tool_path: DEFAULT_TOOL_PATH.to_string(),
            probe_timeout: Duration::from_secs(PROBE_TIMEOUT_SECS),
            download_timeout: Duration::from_secs(DOWNLOAD_TIMEOUT_SECS),
            upload_timeout: Duration::from_secs(UPLOAD_TIMEOUT_SECS),
            update_timeout: Duration::from_secs(UPDATE_TIMEOUT_SECS),
        }
    }
}
