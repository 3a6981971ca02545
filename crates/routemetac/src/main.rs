//! The routemeta CLI.
//!
//! Provides the `routemetac` command with the following subcommands:
//!
//! - `routemetac rewrite <file>` - Append type metadata to every route registration
//! - `routemetac check <file>` - Resolve the registration method and list its call sites
//!
//! Options:
//! - `--output` - Where to write the rewritten program (stdout otherwise)
//! - `--manifest` - Where to write the JSON type manifest
//! - `--config` - A `routemeta.toml` with registry and field names
//! - `--json` - Output diagnostics as JSON (one object per line)
//! - `--no-color` - Disable colorized output
//! - `-v`/`-q`/`--log-level`/`--log-format` - Log verbosity and shape

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use routemeta_common::span::LineIndex;
use routemeta_parser::ast::AstNode;
use routemeta_rewrite::diagnostics::render_rewrite_error;
use routemeta_rewrite::{find_anchor, registration_calls, RewriteConfig, RewriteError, TypeOracle};
use routemeta_typeck::diagnostics::DiagnosticOptions;
use routemeta_typeck::TypeckResult;

const CONFIG_FILE: &str = "routemeta.toml";

#[derive(Parser)]
#[command(name = "routemetac", version, about = "Route registration type rewriter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log level, overriding -v and -q
    #[arg(long = "log-level", global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Log output format
    #[arg(long = "log-format", global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a TypeScript file, appending type ids to each route registration
    Rewrite {
        /// The TypeScript source file
        file: PathBuf,

        /// Output path for the rewritten program (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output path for the type manifest (defaults to `<output>.types.json` when --output is given)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Configuration file (defaults to routemeta.toml next to the input, if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output diagnostics as JSON (one object per line) instead of human-readable format
        #[arg(long)]
        json: bool,

        /// Disable colorized output
        #[arg(long = "no-color")]
        no_color: bool,
    },
    /// Resolve the registration method and count its call sites without rewriting
    Check {
        /// The TypeScript source file
        file: PathBuf,

        /// Configuration file (defaults to routemeta.toml next to the input, if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output diagnostics as JSON (one object per line) instead of human-readable format
        #[arg(long)]
        json: bool,

        /// Disable colorized output
        #[arg(long = "no-color")]
        no_color: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet, cli.log_level, cli.log_format);

    let (result, json) = match cli.command {
        Commands::Rewrite {
            file,
            output,
            manifest,
            config,
            json,
            no_color,
        } => {
            let diag_opts = DiagnosticOptions {
                color: !no_color && !json,
                json,
            };
            let result = run_rewrite(
                &file,
                output.as_deref(),
                manifest.as_deref(),
                config.as_deref(),
                &diag_opts,
            );
            (result, json)
        }
        Commands::Check {
            file,
            config,
            json,
            no_color,
        } => {
            let diag_opts = DiagnosticOptions {
                color: !no_color && !json,
                json,
            };
            (run_check(&file, config.as_deref(), &diag_opts), json)
        }
    };

    if let Err(e) = result {
        if json {
            let msg = serde_json::json!({
                "code": "C0001",
                "severity": "error",
                "message": e,
                "file": "",
                "spans": [],
                "fix": null
            });
            eprintln!("{}", msg);
        } else {
            eprintln!("error: {}", e);
        }
        process::exit(1);
    }
}

/// Install a stderr subscriber. Stdout is reserved for rewritten programs.
fn setup_logging(verbose: u8, quiet: bool, log_level: Option<LogLevel>, log_format: LogFormat) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if let Some(level) = log_level {
        EnvFilter::new(match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    } else if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true);

    match log_format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(formatter)
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(formatter.json())
                .with(filter)
                .init();
        }
    }
}

/// A parsed and checked input file.
struct Unit {
    source: String,
    file_name: String,
    parse: routemeta_parser::Parse,
    typeck: TypeckResult,
    config: RewriteConfig,
}

/// Read, parse and check `file`, and load its configuration.
fn load(file: &Path, config: Option<&Path>, diag_opts: &DiagnosticOptions) -> Result<Unit, String> {
    if !file.is_file() {
        return Err(format!("'{}' is not a file", file.display()));
    }
    let source = std::fs::read_to_string(file)
        .map_err(|e| format!("Failed to read '{}': {}", file.display(), e))?;
    let config = load_config(file, config)?;

    let parse = routemeta_parser::parse(&source);
    let file_name = file.display().to_string();
    if report_parse_errors(&source, &file_name, &parse, diag_opts) {
        return Err("Parsing failed due to errors above.".to_string());
    }

    let typeck = routemeta_typeck::check(&parse);
    if !typeck.errors.is_empty() {
        warn!(count = typeck.errors.len(), file = %file_name, "type checker reported problems");
        for rendered in typeck.render_errors(&source, &file_name, diag_opts) {
            eprint!("{}", rendered);
        }
    }

    Ok(Unit {
        source,
        file_name,
        parse,
        typeck,
        config,
    })
}

/// An explicit config file, else `routemeta.toml` beside the input, else defaults.
fn load_config(file: &Path, explicit: Option<&Path>) -> Result<RewriteConfig, String> {
    if let Some(path) = explicit {
        return RewriteConfig::from_file(path);
    }
    let beside = file.parent().unwrap_or(Path::new(".")).join(CONFIG_FILE);
    if beside.is_file() {
        info!(path = %beside.display(), "using configuration");
        return RewriteConfig::from_file(&beside);
    }
    Ok(RewriteConfig::default())
}

/// Execute the rewrite pipeline: read -> parse -> typecheck -> rewrite -> emit.
fn run_rewrite(
    file: &Path,
    output: Option<&Path>,
    manifest: Option<&Path>,
    config: Option<&Path>,
    diag_opts: &DiagnosticOptions,
) -> Result<(), String> {
    let unit = load(file, config, diag_opts)?;

    let rewrite = routemeta_rewrite::rewrite(&unit.parse.syntax(), &unit.typeck, &unit.config)
        .map_err(|e| report_rewrite_error(&e, &unit, diag_opts))?;

    let text = rewrite.text();
    let manifest_path = manifest
        .map(Path::to_path_buf)
        .or_else(|| output.map(|path| path.with_extension("types.json")));
    let manifest = match &manifest_path {
        Some(_) => Some(
            rewrite
                .registry
                .to_manifest()
                .map_err(|e| format!("Failed to serialize the type manifest: {}", e))?,
        ),
        None => None,
    };

    match output {
        Some(path) => std::fs::write(path, &text)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?,
        None => print!("{}", text),
    }
    if let (Some(path), Some(manifest)) = (&manifest_path, manifest) {
        std::fs::write(path, format!("{}\n", manifest))
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    }

    if let Some(path) = output {
        eprintln!(
            "  Rewrote: {} ({} call sites, {} schemas)",
            path.display(),
            rewrite.call_sites,
            rewrite.registry.len()
        );
    }
    Ok(())
}

/// Resolve the registration method and list the calls that would be rewritten.
fn run_check(file: &Path, config: Option<&Path>, diag_opts: &DiagnosticOptions) -> Result<(), String> {
    let unit = load(file, config, diag_opts)?;
    let root = unit.parse.syntax();

    let anchor = find_anchor(&unit.typeck, &root, &unit.config)
        .map_err(|e| report_rewrite_error(&e, &unit, diag_opts))?;
    let calls = registration_calls(&root, &unit.typeck, anchor);

    println!(
        "anchor: {}.{}",
        unit.config.registry.type_name,
        TypeOracle::symbol_name(&unit.typeck, anchor)
    );
    println!("call sites: {}", calls.len());
    let lines = LineIndex::new(&unit.source);
    for call in &calls {
        let (line, col) = lines.line_col(call.syntax().text_range().start().into());
        let callee = call
            .callee()
            .map(|callee| callee.syntax().text().to_string())
            .unwrap_or_default();
        println!("  {}:{}:{} {}", unit.file_name, line, col, callee);
    }
    Ok(())
}

fn report_rewrite_error(error: &RewriteError, unit: &Unit, diag_opts: &DiagnosticOptions) -> String {
    eprint!(
        "{}",
        render_rewrite_error(error, &unit.source, &unit.file_name, diag_opts)
    );
    "Rewrite failed due to errors above.".to_string()
}

/// Report parse errors. Returns true if there were any.
fn report_parse_errors(
    source: &str,
    file_name: &str,
    parse: &routemeta_parser::Parse,
    diag_opts: &DiagnosticOptions,
) -> bool {
    for error in parse.errors() {
        let start = error.span.start as usize;
        let end = (error.span.end as usize).max(start + 1);
        if diag_opts.json {
            let json_diag = serde_json::json!({
                "code": "P0001",
                "severity": "error",
                "message": format!("Parse error: {}", error.message),
                "file": file_name,
                "spans": [{
                    "start": start,
                    "end": end,
                    "label": error.message
                }],
                "fix": null
            });
            eprintln!("{}", json_diag);
        } else {
            use ariadne::{Color, Config, Label, Report, ReportKind, Source};
            let config = Config::default().with_color(diag_opts.color);
            let mut report = Report::<std::ops::Range<usize>>::build(ReportKind::Error, start..end)
                .with_code("P0001")
                .with_message("Parse error")
                .with_config(config)
                .with_label(
                    Label::new(start..end)
                        .with_message(&error.message)
                        .with_color(Color::Red),
                );
            if let Some((message, span)) = &error.related {
                report = report.with_label(
                    Label::new(span.to_range())
                        .with_message(message)
                        .with_color(Color::Blue),
                );
            }
            let _ = report.finish().eprint(Source::from(source));
        }
    }
    !parse.ok()
}
