//! Compiles route manifests into trailhead route tables.
//!
//! Loads YAML/JSON manifests, checks them route by route, and builds a
//! [`RouterTable`] ready to be served or swapped in.

pub mod error;
pub mod manifest;

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use trailhead_router::{Inserted, RouterTable};

pub use error::{CompileError, ManifestError};
pub use manifest::{ConditionValue, RouteEntry, RouteManifest};

/// Compile a manifest, stopping at the first problem.
pub fn compile_manifest(manifest: &RouteManifest) -> Result<RouterTable, CompileError> {
    let mut table = RouterTable::new(manifest.request_keys.iter().cloned());
    let mut names: HashMap<&str, usize> = HashMap::new();

    for (index, entry) in manifest.routes.iter().enumerate() {
        let position = index + 1;
        check_entry(entry, position, &mut names)?;
        let inserted = table
            .insert(entry.to_definition())
            .map_err(|e| CompileError::from_router(position, &entry.path, e))?;
        if !inserted.shadowed.is_empty() {
            tracing::warn!(
                position,
                path = %entry.path,
                alternatives = inserted.shadowed.len(),
                "route is partly or fully shadowed by an earlier route"
            );
        }
    }

    tracing::debug!(
        routes = table.len(),
        request_keys = ?table.request_keys(),
        "manifest compiled"
    );
    Ok(table)
}

/// Load a manifest file and compile it.
pub fn compile_file(path: &Path) -> Result<RouterTable, CompileError> {
    let manifest = RouteManifest::load(path)?;
    compile_manifest(&manifest)
}

fn check_entry<'m>(
    entry: &'m RouteEntry,
    position: usize,
    names: &mut HashMap<&'m str, usize>,
) -> Result<(), CompileError> {
    if entry.to.trim().is_empty() {
        return Err(CompileError::MissingDestination {
            position,
            path: entry.path.clone(),
        });
    }
    if let Some(name) = &entry.name {
        if let Some(first) = names.insert(name.as_str(), position) {
            return Err(CompileError::DuplicateName {
                name: name.clone(),
                first,
                second: position,
            });
        }
    }
    Ok(())
}

/// Outcome of validating one manifest file.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub file: String,
    pub valid: bool,
    pub routes: usize,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Warning code for a route alternative whose path and conditions are
/// already owned by an earlier route.
pub const SHADOWED_ROUTE: &str = "E2020";

/// Validate a manifest file, collecting every issue rather than stopping at
/// the first.
pub fn validate_file(path: &Path) -> ValidationReport {
    let file = path.display().to_string();
    match RouteManifest::load(path) {
        Ok(manifest) => validate(&manifest, &file),
        Err(e) => ValidationReport {
            valid: false,
            routes: 0,
            errors: vec![ValidationIssue {
                code: e.code().to_string(),
                message: e.to_string(),
                location: Some(file.clone()),
            }],
            warnings: Vec::new(),
            file,
        },
    }
}

/// Validate an already loaded manifest. `file` is used in issue locations.
pub fn validate(manifest: &RouteManifest, file: &str) -> ValidationReport {
    let mut table = RouterTable::new(manifest.request_keys.iter().cloned());
    let mut names: HashMap<&str, usize> = HashMap::new();
    // Manifest position of each route in the table, by route index.
    let mut positions: Vec<usize> = Vec::new();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (index, entry) in manifest.routes.iter().enumerate() {
        let position = index + 1;
        let location = Some(format!("{}:routes[{}] {}", file, position, entry.path));

        let result = check_entry(entry, position, &mut names).and_then(|()| {
            table
                .insert(entry.to_definition())
                .map_err(|e| CompileError::from_router(position, &entry.path, e))
        });
        let inserted = match result {
            Ok(inserted) => inserted,
            Err(e) => {
                errors.push(ValidationIssue {
                    code: e.code().to_string(),
                    message: e.to_string(),
                    location,
                });
                continue;
            }
        };
        positions.push(position);

        for message in shadow_messages(&table, &inserted, &positions, entry) {
            warnings.push(ValidationIssue {
                code: SHADOWED_ROUTE.to_string(),
                message,
                location: location.clone(),
            });
        }
    }

    ValidationReport {
        file: file.to_string(),
        valid: errors.is_empty(),
        routes: table.len(),
        errors,
        warnings,
    }
}

/// One message per alternative of `inserted` hidden by an earlier route.
fn shadow_messages(
    table: &RouterTable,
    inserted: &Inserted,
    positions: &[usize],
    entry: &RouteEntry,
) -> Vec<String> {
    let Some(route) = table.route(inserted.id) else {
        return Vec::new();
    };
    let position = positions.get(inserted.id.index()).copied().unwrap_or_default();
    let whole = inserted.shadowed.len() == route.alternatives().len();

    inserted
        .shadowed
        .iter()
        .map(|hidden| {
            let by = positions.get(hidden.by.index()).copied().unwrap_or_default();
            match route.alternatives().get(hidden.alternative) {
                Some(alternative) if !whole => format!(
                    "alternative '{}' of route #{} '{}' repeats the path and conditions of route #{} and is unreachable",
                    alternative.path(),
                    position,
                    entry.path,
                    by
                ),
                _ => format!(
                    "route #{} '{}' repeats the path and conditions of route #{} and is unreachable",
                    position, entry.path, by
                ),
            }
        })
        .collect()
}
