//! Text and JSON renderings of command results.

use std::fmt::Write;

use clap::ValueEnum;
use serde::Serialize;
use trailhead_compiler::ValidationReport;
use trailhead_router::{Match, Route, RouterTable};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct Param<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct MatchReport<'a> {
    destination: &'a str,
    route: usize,
    params: Vec<Param<'a>>,
    partial: bool,
    #[serde(skip_serializing_if = "str::is_empty")]
    remainder: &'a str,
}

#[derive(Debug, Serialize)]
struct RouteReport<'a> {
    index: usize,
    template: &'a str,
    destination: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    partial: bool,
    alternatives: Vec<&'a str>,
    conditions: Vec<Param<'a>>,
    #[serde(rename = "matches_with")]
    patterns: Vec<Param<'a>>,
}

impl<'a> RouteReport<'a> {
    fn new(index: usize, route: &'a Route, conditions: &'a [(&'a str, String)]) -> Self {
        Self {
            index,
            template: route.template(),
            destination: route.destination(),
            name: route.name(),
            partial: route.is_partial(),
            alternatives: route.alternatives().iter().map(|a| a.path()).collect(),
            conditions: conditions
                .iter()
                .map(|(name, value)| Param {
                    name: *name,
                    value: value.as_str(),
                })
                .collect(),
            patterns: route
                .variable_names()
                .iter()
                .filter_map(|name| {
                    route.validation_pattern(name).map(|value| Param {
                        name: name.as_str(),
                        value,
                    })
                })
                .collect(),
        }
    }
}

/// Render a recognition result.
pub fn render_match(m: &Match, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&MatchReport {
            destination: &m.destination,
            route: m.route.index(),
            params: m
                .params
                .iter()
                .map(|(name, value)| Param {
                    name: name.as_str(),
                    value: value.as_str(),
                })
                .collect(),
            partial: m.partial,
            remainder: &m.remainder,
        }),
        OutputFormat::Text => {
            let mut out = m.destination.clone();
            for (name, value) in &m.params {
                let _ = write!(out, "\n  {} = {}", name, value);
            }
            if m.partial {
                let _ = write!(out, "\n  remainder: {}", display_remainder(&m.remainder));
            }
            Ok(out)
        }
    }
}

fn display_remainder(remainder: &str) -> &str {
    if remainder.is_empty() {
        "(none)"
    } else {
        remainder
    }
}

/// Render a generated path.
pub fn render_generated(name: &str, path: &str, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "name": name,
            "path": path,
        })),
        OutputFormat::Text => Ok(path.to_string()),
    }
}

/// Render every route of a table in registration order.
pub fn render_routes(table: &RouterTable, format: OutputFormat) -> Result<String, serde_json::Error> {
    let conditions: Vec<Vec<(&str, String)>> = table
        .routes()
        .iter()
        .map(|route| {
            route
                .conditions()
                .map(|(key, condition)| (key, condition.to_string()))
                .collect()
        })
        .collect();
    let reports: Vec<RouteReport<'_>> = table
        .routes()
        .iter()
        .zip(&conditions)
        .enumerate()
        .map(|(index, (route, conditions))| RouteReport::new(index + 1, route, conditions))
        .collect();

    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "request_keys": table.request_keys(),
            "routes": reports,
        })),
        OutputFormat::Text => {
            let mut out = String::new();
            for report in &reports {
                let _ = write!(out, "#{} {} -> {}", report.index, report.template, report.destination);
                if let Some(name) = report.name {
                    let _ = write!(out, " (name: {})", name);
                }
                if report.partial {
                    out.push_str(" [partial]");
                }
                for condition in &report.conditions {
                    let _ = write!(out, "\n    when {} = {}", condition.name, condition.value);
                }
                for pattern in &report.patterns {
                    let _ = write!(out, "\n    where {} =~ {}", pattern.name, pattern.value);
                }
                if report.alternatives.len() > 1 {
                    for alternative in &report.alternatives {
                        let _ = write!(out, "\n    matches {}", alternative);
                    }
                }
                out.push('\n');
            }
            let _ = write!(out, "{} route(s)", table.len());
            Ok(out)
        }
    }
}

/// Render validation reports for one or more manifests.
pub fn render_validation(
    reports: &[ValidationReport],
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    let valid = reports.iter().filter(|r| r.valid).count();

    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "results": reports,
            "summary": {
                "total": reports.len(),
                "valid": valid,
                "invalid": reports.len() - valid,
            }
        })),
        OutputFormat::Text => {
            let mut out = String::new();
            for report in reports {
                if report.valid && report.warnings.is_empty() {
                    let _ = writeln!(out, "✓ {} is valid ({} routes)", report.file, report.routes);
                } else if report.valid {
                    let _ = writeln!(
                        out,
                        "✓ {} is valid (with {} warning(s))",
                        report.file,
                        report.warnings.len()
                    );
                } else {
                    let _ = writeln!(out, "✗ {} has {} error(s)", report.file, report.errors.len());
                }

                for issue in &report.errors {
                    match &issue.location {
                        Some(loc) => {
                            let _ = writeln!(out, "  {} [{}]: {}", issue.code, loc, issue.message);
                        }
                        None => {
                            let _ = writeln!(out, "  {}: {}", issue.code, issue.message);
                        }
                    }
                }
                for issue in &report.warnings {
                    match &issue.location {
                        Some(loc) => {
                            let _ = writeln!(
                                out,
                                "  {} [{}]: {} (warning)",
                                issue.code, loc, issue.message
                            );
                        }
                        None => {
                            let _ = writeln!(out, "  {}: {} (warning)", issue.code, issue.message);
                        }
                    }
                }
            }
            let _ = write!(
                out,
                "validated {} manifest(s): {} valid, {} invalid",
                reports.len(),
                valid,
                reports.len() - valid
            );
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailhead_router::{compile, RouteDefinition, RouteOptions};

    fn table() -> RouterTable {
        compile(
            vec![
                RouteDefinition::new("/posts/:id(.:format)", "post.show")
                    .with_name("post")
                    .with_options(
                        RouteOptions::new()
                            .with_condition("method", "GET")
                            .matching("id", r"\d+"),
                    ),
                RouteDefinition::new("/admin", "admin")
                    .with_options(RouteOptions::new().partial(true)),
            ],
            ["method"],
        )
        .unwrap()
    }

    #[test]
    fn match_as_text() {
        let table = table();
        let m = table.recognize("/posts/7.json", &[("method", "GET")]).unwrap();
        let text = render_match(&m, OutputFormat::Text).unwrap();
        assert_eq!(text, "post.show\n  id = 7\n  format = json");
    }

    #[test]
    fn partial_match_as_json() {
        let table = table();
        let m = table.recognize("/admin/users", &()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render_match(&m, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["destination"], "admin");
        assert_eq!(json["partial"], true);
        assert_eq!(json["remainder"], "/users");
        assert_eq!(json["route"], 1);
    }

    #[test]
    fn routes_as_text() {
        let text = render_routes(&table(), OutputFormat::Text).unwrap();
        assert!(text.contains("#1 /posts/:id(.:format) -> post.show (name: post)"));
        assert!(text.contains("when method = GET"));
        assert!(text.contains(r"where id =~ \d+"));
        assert!(text.contains("matches /posts/:id.:format"));
        assert!(text.contains("#2 /admin -> admin [partial]"));
        assert!(text.ends_with("2 route(s)"));
    }

    #[test]
    fn routes_as_json() {
        let json: serde_json::Value =
            serde_json::from_str(&render_routes(&table(), OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["request_keys"][0], "method");
        let first = &json["routes"][0];
        assert_eq!(first["name"], "post");
        assert_eq!(first["alternatives"].as_array().unwrap().len(), 2);
        assert_eq!(first["conditions"][0]["name"], "method");
        assert_eq!(first["conditions"][0]["value"], "GET");
        assert_eq!(first["matches_with"][0]["value"], r"\d+");
        assert!(json["routes"][1].get("name").is_none());
    }

    #[test]
    fn generated_path_as_json() {
        let json: serde_json::Value = serde_json::from_str(
            &render_generated("post", "/posts/7", OutputFormat::Json).unwrap(),
        )
        .unwrap();
        assert_eq!(json["path"], "/posts/7");
    }
}
