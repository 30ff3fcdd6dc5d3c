//! CLI regression tests for the `trailhead` binary.
//!
//! These tests invoke the binary as a subprocess to catch regressions in flag
//! names, exit codes, and output formats.
//!
//! Run with: `cargo test -p trailhead-test`
//! Requires the `trailhead` binary to be built first (`cargo build -p trailhead`).

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

use crate::fixtures;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns an assert_cmd Command wrapping the `trailhead` binary.
fn trailhead() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("trailhead")
        .expect("trailhead binary not found, run `cargo build -p trailhead` first")
}

fn json_stdout(output: &[u8]) -> serde_json::Value {
    let s = std::str::from_utf8(output).expect("stdout should be valid UTF-8");
    serde_json::from_str(s).expect("--format json output should be valid JSON")
}

// ---------------------------------------------------------------------------
// trailhead validate
// ---------------------------------------------------------------------------

#[test]
fn validate_valid_manifest_exits_zero() {
    trailhead()
        .args(["validate", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .assert()
        .success()
        .stderr(contains("is valid"));
}

#[test]
fn validate_reports_every_route_error() {
    trailhead()
        .args(["validate", "--routes"])
        .arg(fixtures().join("invalid-template.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2010"))
        .stderr(contains("E2013"));
}

#[test]
fn validate_parse_error_exits_one() {
    trailhead()
        .args(["validate", "--routes"])
        .arg(fixtures().join("invalid-parse-error.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2002"));
}

#[test]
fn validate_empty_manifest_exits_one() {
    trailhead()
        .args(["validate", "--routes"])
        .arg(fixtures().join("empty.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2003"));
}

#[test]
fn validate_missing_file_exits_one() {
    trailhead()
        .args(["validate", "--routes", "this-file-does-not-exist.yaml"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2001"));
}

#[test]
fn validate_shadowed_route_is_a_warning() {
    trailhead()
        .args(["validate", "--routes"])
        .arg(fixtures().join("shadowed.yaml"))
        .assert()
        .success()
        .stderr(contains("E2020"))
        .stderr(contains("(warning)"));
}

#[test]
fn validate_multiple_manifests() {
    trailhead()
        .args(["validate", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .arg(fixtures().join("invalid-template.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("validated 2 manifest(s): 1 valid, 1 invalid"));
}

#[test]
fn validate_json_format_outputs_valid_json() {
    let output = trailhead()
        .args(["validate", "--routes"])
        .arg(fixtures().join("invalid-template.yaml"))
        .args(["--format", "json"])
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let v = json_stdout(&output);
    let results = v["results"].as_array().expect("results should be an array");
    assert_eq!(results[0]["valid"], false);
    assert_eq!(results[0]["errors"].as_array().map(Vec::len), Some(2));
    assert_eq!(v["summary"]["invalid"], 1);
}

#[test]
fn validate_requires_routes_flag() {
    trailhead().args(["validate"]).assert().failure().code(2);
}

// ---------------------------------------------------------------------------
// trailhead routes
// ---------------------------------------------------------------------------

#[test]
fn routes_lists_every_route() {
    trailhead()
        .args(["routes", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .assert()
        .success()
        .stdout(contains("#4 /posts/:id(.:format) -> posts#show (name: post)"))
        .stdout(contains("when method = /PUT|PATCH/"))
        .stdout(contains("#10 /admin -> admin [partial]"))
        .stdout(contains("10 route(s)"));
}

#[test]
fn routes_json_format() {
    let output = trailhead()
        .args(["routes", "--format", "json", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let v = json_stdout(&output);
    assert_eq!(v["request_keys"][1], "content_type");
    assert_eq!(v["routes"].as_array().map(Vec::len), Some(10));
    assert_eq!(v["routes"][6]["alternatives"].as_array().map(Vec::len), Some(3));
}

#[test]
fn routes_invalid_manifest_exits_one() {
    trailhead()
        .args(["routes", "--routes"])
        .arg(fixtures().join("invalid-template.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("error:"))
        .stderr(contains("E2010"));
}

// ---------------------------------------------------------------------------
// trailhead recognize
// ---------------------------------------------------------------------------

#[test]
fn recognize_prints_destination_and_params() {
    trailhead()
        .args(["recognize", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .args(["/posts/42.json", "--attr", "method=GET"])
        .assert()
        .success()
        .stdout(contains("posts#show"))
        .stdout(contains("id = 42"))
        .stdout(contains("format = json"));
}

#[test]
fn recognize_with_two_attributes() {
    trailhead()
        .args(["recognize", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .arg("/posts/42")
        .args(["--attr", "method=PUT", "--attr", "content_type=application/json"])
        .assert()
        .success()
        .stdout(contains("posts#update"));
}

#[test]
fn recognize_no_match_exits_two() {
    trailhead()
        .args(["recognize", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .args(["/nowhere/at/all", "--attr", "method=GET"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("no route matches"));
}

#[test]
fn recognize_partial_json() {
    let output = trailhead()
        .args(["recognize", "--format", "json", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .arg("/admin/users/3")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let v = json_stdout(&output);
    assert_eq!(v["destination"], "admin");
    assert_eq!(v["partial"], true);
    assert_eq!(v["remainder"], "/users/3");
}

#[test]
fn recognize_rejects_malformed_attr() {
    trailhead()
        .args(["recognize", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .args(["/", "--attr", "method"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("expected key=value"));
}

// ---------------------------------------------------------------------------
// trailhead generate
// ---------------------------------------------------------------------------

#[test]
fn generate_prints_path() {
    trailhead()
        .args(["generate", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .args(["post", "--param", "id=42"])
        .assert()
        .success()
        .stdout("/posts/42\n");
}

#[test]
fn generate_appends_query() {
    trailhead()
        .args(["generate", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .args(["archive", "--param", "year=2024", "--param", "q=rust lang"])
        .assert()
        .success()
        .stdout("/archive/2024?q=rust+lang\n");
}

#[test]
fn generate_invalid_params_exits_two() {
    trailhead()
        .args(["generate", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .args(["post", "--param", "id=abc"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("cannot generate"));
}

#[test]
fn generate_unknown_name_exits_two() {
    trailhead()
        .args(["generate", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .arg("nope")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("no route named"));
}

// ---------------------------------------------------------------------------
// Logging flags
// ---------------------------------------------------------------------------

#[test]
fn json_logs_go_to_stderr() {
    let tmp = TempDir::new().expect("temp dir");
    let manifest = tmp.path().join("routes.yaml");
    std::fs::write(&manifest, "routes:\n  - { path: /, to: home }\n").expect("write manifest");

    trailhead()
        .args(["--log-level", "info", "--log-format", "json", "recognize", "--routes"])
        .arg(&manifest)
        .arg("/")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout("home\n")
        .stderr(contains("\"event\":\"route_recognized\""));
}

#[test]
fn routes_loaded_event_names_the_service() {
    trailhead()
        .args(["--log-level", "info", "--log-format", "json", "routes", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(contains("\"event\":\"routes_loaded\""))
        .stderr(contains("\"service\":\"trailhead\""));
}

#[test]
fn unknown_log_format_exits_two() {
    trailhead()
        .args(["--log-format", "xml", "routes", "--routes"])
        .arg(fixtures().join("blog.yaml"))
        .assert()
        .failure()
        .code(2);
}
