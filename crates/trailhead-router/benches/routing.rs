//! Recognition and generation benchmarks.
//!
//! Run with: cargo bench -p trailhead-router

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use trailhead_router::{RouteDefinition, RouteOptions, RouterTable};

/// A resource-style route set of roughly `count` routes.
fn generate_routes(count: usize) -> Vec<RouteDefinition> {
    let resources = ["users", "orders", "products", "customers", "invoices", "payments"];
    let methods = ["GET", "POST", "PUT", "DELETE"];

    let mut routes = Vec::new();

    for resource in &resources {
        let by_method = |method: &str| RouteOptions::new().with_condition("method", method);
        routes.push(
            RouteDefinition::new(format!("/{}", resource), format!("{}#index", resource))
                .with_options(by_method("GET")),
        );
        routes.push(
            RouteDefinition::new(format!("/{}", resource), format!("{}#create", resource))
                .with_options(by_method("POST")),
        );
        routes.push(
            RouteDefinition::new(format!("/{}/:id(.:format)", resource), format!("{}#show", resource))
                .with_options(by_method("GET").matching("id", r"\d+")),
        );
        routes.push(
            RouteDefinition::new(format!("/{}/:id", resource), format!("{}#update", resource))
                .with_options(by_method("PUT")),
        );
    }

    routes.push(RouteDefinition::new("/users/:user_id/orders/:order_id", "user.order"));
    routes.push(
        RouteDefinition::new("/admin", "admin").with_options(RouteOptions::new().partial(true)),
    );

    while routes.len() < count {
        let i = routes.len();
        let resource = resources[i % resources.len()];
        let method = methods[i % methods.len()];
        routes.push(
            RouteDefinition::new(format!("/api/v{}/{}", i / 10, resource), format!("api.{}", i))
                .with_options(RouteOptions::new().with_condition("method", method)),
        );
    }

    routes.truncate(count);
    routes
}

fn build_table(routes: &[RouteDefinition]) -> RouterTable {
    trailhead_router::compile(routes.iter().cloned(), ["method"]).unwrap()
}

fn bench_recognize(c: &mut Criterion) {
    let mut group = c.benchmark_group("recognize");
    let get = [("method", "GET")];

    for route_count in [10, 50, 100, 500, 1000] {
        let table = build_table(&generate_routes(route_count));

        group.bench_with_input(
            BenchmarkId::new("static_path", route_count),
            &table,
            |b, table| b.iter(|| black_box(table.recognize("/users", &get))),
        );

        group.bench_with_input(
            BenchmarkId::new("pattern_path", route_count),
            &table,
            |b, table| b.iter(|| black_box(table.recognize("/users/12345.json", &get))),
        );

        group.bench_with_input(
            BenchmarkId::new("nested_wildcards", route_count),
            &table,
            |b, table| b.iter(|| black_box(table.recognize("/users/12345/orders/67890", &get))),
        );

        group.bench_with_input(
            BenchmarkId::new("partial", route_count),
            &table,
            |b, table| b.iter(|| black_box(table.recognize("/admin/settings/users", &get))),
        );

        group.bench_with_input(
            BenchmarkId::new("not_found", route_count),
            &table,
            |b, table| b.iter(|| black_box(table.recognize("/nonexistent/path/here", &get))),
        );
    }

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let table = build_table(&generate_routes(100));
    let mut group = c.benchmark_group("generate");

    group.bench_function("optional_section", |b| {
        b.iter(|| black_box(table.generate("users#show", [("id", "42"), ("format", "json")])))
    });
    group.bench_function("with_query", |b| {
        b.iter(|| black_box(table.generate("users#update", [("id", "42"), ("page", "2")])))
    });

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for route_count in [10, 50, 100, 500] {
        let routes = generate_routes(route_count);

        group.bench_with_input(
            BenchmarkId::new("build_table", route_count),
            &routes,
            |b, routes| b.iter(|| black_box(build_table(routes))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_recognize, bench_generate, bench_compile);
criterion_main!(benches);
