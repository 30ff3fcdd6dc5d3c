//! Logging bootstrap for trailhead.
//!
//! This crate provides:
//! - `tracing-subscriber` setup with JSON or pretty output
//! - Standard event names and `log_*!` macros so every crate logs the same fields
//!
//! # Usage
//!
//! ```ignore
//! use trailhead_telemetry::{LogFormat, TelemetryConfig};
//!
//! let config = TelemetryConfig::new()
//!     .with_log_level("debug")
//!     .with_log_format(LogFormat::Json);
//!
//! trailhead_telemetry::init_logging(&config)?;
//! ```

pub mod config;
pub mod logging;

pub use config::{LogFormat, TelemetryConfig};
pub use logging::{events, init_logging};

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}
