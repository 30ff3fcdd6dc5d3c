//! trailhead CLI library.
//!
//! Exposes the report renderers and argument helpers used by the `trailhead`
//! binary so they can be tested directly.

pub mod report;

pub use report::OutputFormat;

/// Parse a `key=value` command-line pair. The value may itself contain `=`.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}
