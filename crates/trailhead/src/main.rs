//! trailhead route manifest CLI.
//!
//! Validates route manifests, lists compiled routes, and runs recognition or
//! reverse generation against them from the command line.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use trailhead_compiler::{compile_file, validate_file};
use trailhead_lib::report::{render_generated, render_match, render_routes, render_validation};
use trailhead_lib::{parse_key_value, OutputFormat};
use trailhead_router::RouterTable;
use trailhead_telemetry::{
    log_generation_failed, log_no_match, log_route_recognized, log_routes_loaded,
    log_validation_failure, LogFormat, TelemetryConfig,
};

/// Exit code for a path that matched nothing or a route that could not be generated.
const EXIT_NO_MATCH: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "trailhead", about = "URL route manifest toolkit", version)]
struct Cli {
    /// Log level filter (overridden by RUST_LOG).
    #[arg(long, global = true, default_value = "warn", env = "TRAILHEAD_LOG_LEVEL")]
    log_level: String,

    /// Log output format (json or pretty).
    #[arg(long, global = true, default_value = "pretty", value_parser = parse_log_format)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate route manifest(s) without serving them.
    ///
    /// Reports every problem found (E2001-E2013) plus shadowed-route
    /// warnings (E2020).
    Validate {
        /// Route manifest file(s) (YAML or JSON).
        #[arg(short, long, required = true, num_args = 1..)]
        routes: Vec<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the compiled routes of a manifest.
    Routes {
        /// Route manifest file (YAML or JSON).
        #[arg(short, long)]
        routes: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Resolve a request path to its destination.
    Recognize {
        /// Route manifest file (YAML or JSON).
        #[arg(short, long)]
        routes: PathBuf,

        /// Request path, optionally with a query string.
        path: String,

        /// Request attribute as key=value (repeatable), e.g. method=GET.
        #[arg(long = "attr", value_parser = parse_key_value)]
        attrs: Vec<(String, String)>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Build a path for a named route.
    Generate {
        /// Route manifest file (YAML or JSON).
        #[arg(short, long)]
        routes: PathBuf,

        /// Route name, or destination of an unnamed route.
        name: String,

        /// Parameter as key=value (repeatable). Unused ones become the query string.
        #[arg(long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    LogFormat::parse(s).ok_or_else(|| format!("unknown log format '{}' (expected json or pretty)", s))
}

/// Load and compile a manifest, logging the outcome under `service`.
fn load_table(path: &Path, service: &str) -> anyhow::Result<RouterTable> {
    let table = compile_file(path)
        .with_context(|| format!("failed to load routes from {}", path.display()))?;
    log_routes_loaded!(
        service = %service,
        file = %path.display(),
        routes = table.len(),
        "routes loaded"
    );
    Ok(table)
}

/// Run the validate command.
fn run_validate(manifests: &[PathBuf], format: OutputFormat) -> anyhow::Result<ExitCode> {
    let reports: Vec<_> = manifests.iter().map(|path| validate_file(path)).collect();

    for report in &reports {
        for issue in &report.errors {
            log_validation_failure!(
                file = %report.file,
                code = %issue.code,
                message = %issue.message,
                "manifest validation failed"
            );
        }
    }

    let output = render_validation(&reports, format)?;
    match format {
        OutputFormat::Json => println!("{}", output),
        OutputFormat::Text => eprintln!("{}", output),
    }

    if reports.iter().all(|report| report.valid) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Run the routes command.
fn run_routes(manifest: &Path, format: OutputFormat, service: &str) -> anyhow::Result<ExitCode> {
    let table = load_table(manifest, service)?;
    println!("{}", render_routes(&table, format)?);
    Ok(ExitCode::SUCCESS)
}

/// Run the recognize command.
fn run_recognize(
    manifest: &Path,
    path: &str,
    attrs: &[(String, String)],
    format: OutputFormat,
    service: &str,
) -> anyhow::Result<ExitCode> {
    let table = load_table(manifest, service)?;

    match table.recognize(path, attrs) {
        Some(m) => {
            log_route_recognized!(
                path = %path,
                destination = %m.destination,
                partial = m.partial,
                "route recognized"
            );
            println!("{}", render_match(&m, format)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            log_no_match!(path = %path, "no route matched");
            eprintln!("error: no route matches {}", path);
            Ok(ExitCode::from(EXIT_NO_MATCH))
        }
    }
}

/// Run the generate command.
fn run_generate(
    manifest: &Path,
    name: &str,
    params: &[(String, String)],
    format: OutputFormat,
    service: &str,
) -> anyhow::Result<ExitCode> {
    let table = load_table(manifest, service)?;

    if table.route_by_name(name).is_none() {
        log_generation_failed!(name = %name, "unknown route name");
        eprintln!("error: no route named '{}'", name);
        return Ok(ExitCode::from(EXIT_NO_MATCH));
    }

    match table.generate(name, params.iter().cloned()) {
        Some(path) => {
            println!("{}", render_generated(name, &path, format)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            log_generation_failed!(name = %name, "parameters satisfy no alternative");
            eprintln!(
                "error: cannot generate '{}' from the given parameters",
                name
            );
            Ok(ExitCode::from(EXIT_NO_MATCH))
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = TelemetryConfig::new()
        .with_log_level(cli.log_level.as_str())
        .with_log_format(cli.log_format);
    if let Err(e) = trailhead_telemetry::init_logging(&telemetry) {
        eprintln!("error: {}", e);
        return ExitCode::from(1);
    }

    let service = telemetry.service_name.as_str();
    let result = match cli.command {
        Commands::Validate { routes, format } => run_validate(&routes, format),
        Commands::Routes { routes, format } => run_routes(&routes, format, service),
        Commands::Recognize {
            routes,
            path,
            attrs,
            format,
        } => run_recognize(&routes, &path, &attrs, format, service),
        Commands::Generate {
            routes,
            name,
            params,
            format,
        } => run_generate(&routes, &name, &params, format, service),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
