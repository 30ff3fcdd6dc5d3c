//! TestRoutes: manifest-driven route table harness.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;

use trailhead_compiler::compile_file;
use trailhead_router::{Match, RouterTable};

/// Errors from TestRoutes operations.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("compilation failed: {0}")]
    Compile(#[from] trailhead_compiler::CompileError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A route table compiled from a manifest on disk.
///
/// Manifests given inline are written to a temp directory that lives as long
/// as the harness, so the binary can be pointed at the same file.
pub struct TestRoutes {
    table: RouterTable,
    manifest: PathBuf,
    _temp_dir: Option<TempDir>,
}

impl TestRoutes {
    /// Compile a manifest file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TestError> {
        let manifest = path.as_ref().to_path_buf();
        Ok(Self {
            table: compile_file(&manifest)?,
            manifest,
            _temp_dir: None,
        })
    }

    /// Write `yaml` to a temporary manifest and compile it.
    pub fn from_yaml(yaml: &str) -> Result<Self, TestError> {
        let temp_dir = TempDir::new()?;
        let manifest = temp_dir.path().join("routes.yaml");
        std::fs::write(&manifest, yaml)?;

        Ok(Self {
            table: compile_file(&manifest)?,
            manifest,
            _temp_dir: Some(temp_dir),
        })
    }

    /// Path of the manifest backing this table.
    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    pub fn table(&self) -> &RouterTable {
        &self.table
    }

    /// Recognize `path` with `attributes`.
    pub fn recognize(&self, path: &str, attributes: &[(&str, &str)]) -> Option<Match> {
        self.table.recognize(path, attributes)
    }

    /// Destination recognized for `path`, if any.
    pub fn destination(&self, path: &str, attributes: &[(&str, &str)]) -> Option<String> {
        self.recognize(path, attributes).map(|m| m.destination)
    }

    pub fn generate(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        self.table.generate(name, params.iter().copied())
    }
}

/// Absolute path to the shared test fixtures directory.
pub fn fixtures() -> PathBuf {
    // CARGO_MANIFEST_DIR = .../crates/trailhead-test
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .unwrap_or(manifest_dir)
        .join("tests/fixtures")
}
