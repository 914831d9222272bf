//! Test helpers: build the router against a stub downloader executable and
//! spawn a local upload endpoint.
//!
//! The downloader path is configurable for exactly this purpose: tests write
//! a small shell script into a temp directory and point the service at it,
//! so no network or real yt-dlp is needed.

use axum::{
    http::{header, StatusCode},
    routing::post,
    Router,
};
use axum_test::TestServer;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vidrelay_api::setup::routes;
use vidrelay_api::state::AppState;
use vidrelay_core::Config;

pub const TEST_API_KEY: &str = "test-shared-secret";

/// Test application: in-process server plus the stub tool's invocation log.
pub struct TestApp {
    pub server: TestServer,
    pub tool_log: PathBuf,
    _tool_dir: tempfile::TempDir,
}

impl TestApp {
    /// Number of times the stub downloader was spawned.
    pub fn invocation_count(&self) -> usize {
        std::fs::read_to_string(&self.tool_log)
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    /// The `-o` output template recorded by the most recent invocation.
    pub fn recorded_output_template(&self) -> Option<PathBuf> {
        let log = std::fs::read_to_string(&self.tool_log).ok()?;
        let line = log.lines().last()?;
        let mut args = line.split_whitespace();
        while let Some(arg) = args.next() {
            if arg == "-o" {
                return args.next().map(PathBuf::from);
            }
        }
        None
    }
}

fn write_stub_tool(dir: &Path, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("fake-yt-dlp");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

pub fn setup_test_app(script_body: &str, upload_url: Option<String>) -> TestApp {
    setup_test_app_with(script_body, upload_url, |_| {})
}

/// Build the app against a stub downloader. `script_body` runs after the
/// argv of every invocation has been appended to the log.
pub fn setup_test_app_with(
    script_body: &str,
    upload_url: Option<String>,
    tweak: impl FnOnce(&mut Config),
) -> TestApp {
    let tool_dir = tempfile::tempdir().unwrap();
    let tool_log = tool_dir.path().join("invocations.log");
    let script = format!(
        "#!/bin/sh\necho \"$@\" >> {}\n{}\n",
        tool_log.display(),
        script_body
    );
    let tool_path = write_stub_tool(tool_dir.path(), &script);

    let mut config = Config {
        upload_url,
        upload_api_key: Some(TEST_API_KEY.to_string()),
        tool_path: tool_path.to_str().unwrap().to_string(),
        probe_timeout: Duration::from_secs(5),
        download_timeout: Duration::from_secs(5),
        upload_timeout: Duration::from_secs(5),
        update_timeout: Duration::from_secs(5),
        ..Config::default()
    };
    tweak(&mut config);

    let state = Arc::new(AppState::from_config(config.clone()).unwrap());
    let router = routes::setup_routes(&config, state).unwrap();
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        tool_log,
        _tool_dir: tool_dir,
    }
}

/// Spawn a minimal upload endpoint returning a canned response; the counter
/// records how many uploads arrived.
pub async fn spawn_upload_endpoint(
    status: u16,
    body: &'static str,
) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();

    let app = Router::new().route(
        "/upload",
        post(move || {
            let hits = hits_clone.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (
                    StatusCode::from_u16(status).unwrap(),
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/upload", addr), hits)
}
