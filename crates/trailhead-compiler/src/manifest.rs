//! Route manifest (`routes.yaml`) model and loader.
//!
//! JSON manifests load through the same path since JSON is valid YAML.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use trailhead_router::{RouteDefinition, RouteOptions, DEFAULT_REQUEST_KEYS};

use crate::error::ManifestError;

/// A route manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteManifest {
    /// Canonical order in which request attributes are checked.
    #[serde(default = "default_request_keys")]
    pub request_keys: Vec<String>,

    /// Route declarations, in registration order.
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

fn default_request_keys() -> Vec<String> {
    DEFAULT_REQUEST_KEYS.iter().map(|key| key.to_string()).collect()
}

/// One route declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Route template, e.g. `/posts/:id(.:format)`.
    pub path: String,

    /// Destination identifier.
    pub to: String,

    /// Name used for reverse generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Request attribute conditions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub conditions: BTreeMap<String, ConditionValue>,

    /// Validation patterns for path variables.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub matches_with: BTreeMap<String, String>,

    /// Whether the route may match a prefix of the request path.
    #[serde(default)]
    pub match_partially: bool,
}

/// Expected value of a request attribute: a literal, or `{ pattern: ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Exact(String),
    Pattern { pattern: String },
}

impl RouteManifest {
    /// Load a manifest from a YAML or JSON file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, path)
    }

    /// Parse a manifest from YAML content. `path` is only used in errors.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let manifest: Self =
            serde_yaml::from_str(content).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        manifest.check_schema().map_err(|message| ManifestError::Schema {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(manifest)
    }

    fn check_schema(&self) -> Result<(), String> {
        if self.routes.is_empty() {
            return Err("no routes declared".to_string());
        }
        if self.request_keys.is_empty() {
            return Err("request_keys must not be empty".to_string());
        }
        let mut seen = HashSet::new();
        for key in &self.request_keys {
            if key.is_empty() {
                return Err("request_keys contains an empty key".to_string());
            }
            if !seen.insert(key.as_str()) {
                return Err(format!("request key '{}' is listed twice", key));
            }
        }
        Ok(())
    }
}

impl RouteEntry {
    /// Convert into the router's registration data.
    pub fn to_definition(&self) -> RouteDefinition {
        let mut options = RouteOptions::new().partial(self.match_partially);
        for (key, value) in &self.conditions {
            options = match value {
                ConditionValue::Exact(value) => options.with_condition(key, value),
                ConditionValue::Pattern { pattern } => options.with_condition_pattern(key, pattern),
            };
        }
        for (variable, pattern) in &self.matches_with {
            options = options.matching(variable, pattern);
        }

        let definition = RouteDefinition::new(&self.path, &self.to).with_options(options);
        match &self.name {
            Some(name) => definition.with_name(name),
            None => definition,
        }
    }
}
