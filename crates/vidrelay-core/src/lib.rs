//! Core types for the vidrelay service: configuration and the application
//! error taxonomy shared by the pipeline and API crates.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{AppError, LogLevel};
