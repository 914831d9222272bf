//! Application initialization: state construction, routes, server startup.

pub mod routes;
pub mod server;

use crate::state::AppState;
use axum::Router;
use std::sync::Arc;
use vidrelay_core::Config;

/// Build the application state and router from configuration.
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    let state = Arc::new(AppState::from_config(config.clone())?);
    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}
