//! End-to-end recognition and generation over the fixture manifests.

use crate::{fixtures, TestRoutes};

fn blog() -> TestRoutes {
    TestRoutes::from_file(fixtures().join("blog.yaml")).expect("blog.yaml should compile")
}

const GET: &[(&str, &str)] = &[("method", "GET")];

// ---------------------------------------------------------------------------
// Recognition
// ---------------------------------------------------------------------------

#[test]
fn root_route() {
    assert_eq!(blog().destination("/", &[]).as_deref(), Some("home"));
}

#[test]
fn method_selects_destination() {
    let routes = blog();
    assert_eq!(routes.destination("/posts", GET).as_deref(), Some("posts#index"));
    assert_eq!(
        routes.destination("/posts", &[("method", "POST")]).as_deref(),
        Some("posts#create")
    );
    assert_eq!(routes.destination("/posts", &[("method", "DELETE")]), None);
}

#[test]
fn optional_format_on_collection() {
    let m = blog().recognize("/posts.json", GET).expect("match");
    assert_eq!(m.destination, "posts#index");
    assert_eq!(m.param("format"), Some("json"));
}

#[test]
fn numeric_id_before_slug() {
    let routes = blog();

    let m = routes.recognize("/posts/42", GET).expect("match");
    assert_eq!(m.destination, "posts#show");
    assert_eq!(m.param("id"), Some("42"));

    let m = routes.recognize("/posts/42.xml", GET).expect("match");
    assert_eq!(m.destination, "posts#show");
    assert_eq!(m.param("format"), Some("xml"));

    let m = routes.recognize("/posts/hello-world", GET).expect("match");
    assert_eq!(m.destination, "posts#by_slug");
    assert_eq!(m.param("slug"), Some("hello-world"));
}

#[test]
fn update_requires_both_attributes() {
    let routes = blog();
    let json_patch = [("method", "PATCH"), ("content_type", "application/json")];
    assert_eq!(
        routes.destination("/posts/42", &json_patch).as_deref(),
        Some("posts#update")
    );

    let form_put = [("method", "PUT"), ("content_type", "application/x-www-form-urlencoded")];
    assert_eq!(routes.destination("/posts/42", &form_put), None);
}

#[test]
fn literal_segment_beats_variable() {
    let routes = blog();
    assert_eq!(routes.destination("/users/active", &[]).as_deref(), Some("users#active"));
    assert_eq!(routes.destination("/users/17", &[]).as_deref(), Some("users#show"));
}

#[test]
fn archive_sections_are_validated() {
    let routes = blog();
    let m = routes.recognize("/archive/2024/05", &[]).expect("match");
    assert_eq!(m.param("year"), Some("2024"));
    assert_eq!(m.param("month"), Some("05"));

    assert_eq!(routes.destination("/archive/24", &[]), None);
}

#[test]
fn admin_mount_keeps_remainder() {
    let m = blog().recognize("/admin/settings/users", &[]).expect("match");
    assert_eq!(m.destination, "admin");
    assert!(m.partial);
    assert_eq!(m.remainder, "/settings/users");
}

#[test]
fn json_manifest_loads() {
    let routes = TestRoutes::from_file(fixtures().join("api.json")).expect("api.json");
    assert_eq!(
        routes.destination("/v1/items/9", &[]).as_deref(),
        Some("items#show")
    );
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[test]
fn generate_named_routes() {
    let routes = blog();
    assert_eq!(routes.generate("root", &[]).as_deref(), Some("/"));
    assert_eq!(routes.generate("post", &[("id", "42")]).as_deref(), Some("/posts/42"));
    assert_eq!(
        routes.generate("post", &[("id", "42"), ("format", "json")]).as_deref(),
        Some("/posts/42.json")
    );
    assert_eq!(
        routes.generate("user", &[("id", "7"), ("tab", "posts & more")]).as_deref(),
        Some("/users/7?tab=posts+%26+more")
    );
}

#[test]
fn generate_by_destination_of_unnamed_route() {
    assert_eq!(blog().generate("posts#create", &[]).as_deref(), Some("/posts"));
}

#[test]
fn generate_rejects_invalid_parameters() {
    let routes = blog();
    assert_eq!(routes.generate("post", &[("id", "abc")]), None);
    assert_eq!(routes.generate("post", &[]), None);
    assert_eq!(routes.generate("missing", &[]), None);
}

#[test]
fn generated_paths_recognize_back() {
    let routes = blog();
    for (name, params, attributes) in [
        ("post", vec![("id", "5")], GET),
        ("archive", vec![("year", "2023"), ("month", "11")], &[][..]),
        ("user", vec![("id", "abc")], &[][..]),
    ] {
        let path = routes.generate(name, &params).expect("generated");
        let m = routes.recognize(&path, attributes).expect("recognized");
        for (key, value) in &params {
            assert_eq!(m.param(key), Some(*value), "{} via {}", key, path);
        }
    }
}

#[test]
fn inline_manifest() {
    let routes = TestRoutes::from_yaml(
        r#"
routes:
  - { path: "/files/:name.:ext", to: file }
"#,
    )
    .expect("inline manifest");
    assert!(routes.manifest().exists());
    let m = routes.recognize("/files/a.tar", &[]).expect("match");
    assert_eq!(m.param("name"), Some("a"));
    assert_eq!(m.param("ext"), Some("tar"));
}
