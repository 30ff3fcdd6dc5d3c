//! Structured logging setup.
//!
//! Logs go to stderr so command output on stdout stays machine-readable.

use crate::{LogFormat, TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging subsystem.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => init_json_logging(filter),
        LogFormat::Pretty => init_pretty_logging(filter),
    }
}

fn init_json_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let json_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_file(false)
        .with_line_number(false)
        .flatten_event(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(json_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

fn init_pretty_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let pretty_layer = fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(pretty_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

/// Standard log event names.
pub mod events {
    /// A route manifest was compiled into a table.
    pub const ROUTES_LOADED: &str = "routes_loaded";

    /// A path was recognized.
    pub const ROUTE_RECOGNIZED: &str = "route_recognized";

    /// No route matched a path and its attributes.
    pub const NO_MATCH: &str = "no_match";

    /// Reverse generation found no usable alternative.
    pub const GENERATION_FAILED: &str = "generation_failed";

    /// Manifest validation reported an issue.
    pub const VALIDATION_FAILURE: &str = "validation_failure";
}

/// Helper macros for structured logging with standard fields.
#[macro_export]
macro_rules! log_routes_loaded {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::ROUTES_LOADED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_route_recognized {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::ROUTE_RECOGNIZED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_no_match {
    ($($field:tt)*) => {
        tracing::warn!(
            event = $crate::logging::events::NO_MATCH,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_generation_failed {
    ($($field:tt)*) => {
        tracing::warn!(
            event = $crate::logging::events::GENERATION_FAILED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_validation_failure {
    ($($field:tt)*) => {
        tracing::warn!(
            event = $crate::logging::events::VALIDATION_FAILURE,
            $($field)*
        )
    };
}
