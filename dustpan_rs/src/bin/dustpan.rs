//! # dustpan
//!
//! Sweeps a web project for unused symbols, copy-pasted functions and orphan
//! assets.
//!
//! ```bash
//! dustpan                      # current directory, colored text
//! dustpan ./web --json --pretty
//! RUST_LOG=dustpan=debug dustpan ./web
//! ```

use std::any::Any;
use std::io::{self, Write};
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use dustpan::analyzer::output::{render_json, render_text};
use dustpan::fs_utils::load_project;
use dustpan::{DustpanConfig, run_analysis};

#[derive(Parser, Debug)]
#[command(name = "dustpan")]
#[command(about = "Find dead code, unused assets and duplicate functions in web projects")]
#[command(version)]
struct Args {
    /// Project root to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, requires = "json")]
    pretty: bool,

    /// Run analyzers one after another instead of on scoped threads
    #[arg(long)]
    sequential: bool,

    /// Similarity threshold for duplicate functions (0.0 - 1.0)
    #[arg(long, value_parser = parse_threshold)]
    threshold: Option<f64>,

    /// Exit with status 1 when anything unused or copy-pasted is found
    #[arg(long)]
    fail_on_findings: bool,

    /// Config file (default: <path>/.dustpan/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Colorize text output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

fn parse_threshold(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("not a number: {raw}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("threshold must be between 0.0 and 1.0, got {value}"))
    }
}

fn install_broken_pipe_handler() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let payload = info.payload();
        let is_broken = <dyn Any>::downcast_ref::<&str>(payload)
            .is_some_and(|s| s.contains("Broken pipe"))
            || <dyn Any>::downcast_ref::<String>(payload)
                .is_some_and(|s| s.contains("Broken pipe"));

        if is_broken {
            // Quietly exit when downstream closes the pipe (e.g. piping to `head`).
            std::process::exit(0);
        }

        default_hook(info);
    }));
}

fn load_config(args: &Args) -> Result<DustpanConfig> {
    let mut config = match &args.config {
        Some(path) => DustpanConfig::load_from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DustpanConfig::load(&args.path),
    };
    if args.sequential {
        config.analysis.parallel = false;
    }
    if let Some(threshold) = args.threshold {
        config.duplicates.threshold = threshold;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = load_config(args)?;
    let files = load_project(&args.path, &config.census)
        .with_context(|| format!("reading project {}", args.path.display()))?;
    info!(root = %args.path.display(), files = files.len(), "project loaded");

    let result = run_analysis(&files, &config);

    let mut rendered = if args.json {
        render_json(&result, args.pretty).context("serializing report")?
    } else {
        match args.color {
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
            ColorMode::Auto => {}
        }
        render_text(&result)
    };

    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("writing report")?;

    if args.fail_on_findings && !result.is_clean() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn main() -> ExitCode {
    install_broken_pipe_handler();
    let args = Args::parse();

    // stdout carries the report; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.parse().unwrap_or_default()),
        )
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            if err
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
            {
                return ExitCode::SUCCESS;
            }
            eprintln!("[dustpan] Error: {err:#}");
            ExitCode::from(2)
        }
    }
}
