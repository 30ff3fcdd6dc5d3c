use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading a route manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// E2001: The manifest file could not be read.
    #[error("E2001: failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// E2002: The manifest is not valid YAML (or JSON) for the expected shape.
    #[error("E2002: failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// E2003: The manifest parsed but is structurally unusable.
    #[error("E2003: invalid manifest {}: {message}", path.display())]
    Schema { path: PathBuf, message: String },
}

impl ManifestError {
    pub fn code(&self) -> &'static str {
        match self {
            ManifestError::Io { .. } => "E2001",
            ManifestError::Parse { .. } => "E2002",
            ManifestError::Schema { .. } => "E2003",
        }
    }
}

/// Errors produced while compiling a manifest into a route table.
///
/// `position` is the 1-based index of the offending entry under `routes`.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Loading the manifest failed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// E2010: The router rejected a route template, pattern or condition.
    #[error("E2010: route #{position} '{path}': {source}")]
    Route {
        position: usize,
        path: String,
        #[source]
        source: trailhead_router::CompileError,
    },

    /// E2011: Two routes declare the same name.
    #[error("E2011: route name '{name}' is declared by routes #{first} and #{second}")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },

    /// E2012: A route has an empty destination.
    #[error("E2012: route #{position} '{path}' has no destination")]
    MissingDestination { position: usize, path: String },

    /// E2013: A route conditions a request attribute not listed in `request_keys`.
    #[error("E2013: route #{position} '{path}' has a condition on '{key}', which is not a declared request key")]
    UnknownRequestKey {
        position: usize,
        path: String,
        key: String,
    },
}

impl CompileError {
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::Manifest(e) => e.code(),
            CompileError::Route { .. } => "E2010",
            CompileError::DuplicateName { .. } => "E2011",
            CompileError::MissingDestination { .. } => "E2012",
            CompileError::UnknownRequestKey { .. } => "E2013",
        }
    }

    /// Route entry the error points at, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            CompileError::Manifest(_) => None,
            CompileError::Route { position, .. }
            | CompileError::MissingDestination { position, .. }
            | CompileError::UnknownRequestKey { position, .. } => Some(*position),
            CompileError::DuplicateName { second, .. } => Some(*second),
        }
    }

    pub(crate) fn from_router(
        position: usize,
        path: &str,
        error: trailhead_router::CompileError,
    ) -> Self {
        match error {
            trailhead_router::CompileError::UnknownRequestKey { key } => {
                CompileError::UnknownRequestKey {
                    position,
                    path: path.to_string(),
                    key,
                }
            }
            source => CompileError::Route {
                position,
                path: path.to_string(),
                source,
            },
        }
    }
}
