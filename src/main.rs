// SPDX-License-Identifier: MIT
//
// tonal — derive contrast-checked design tokens from a color scheme.
//
// A one-shot front end over tonal-tokens. Each run flows through:
//
//   scheme file / builtin → validate → raw palette → derive → render → stdout / file
//
// Diagnostics are part of the result, not failures. `--strict` turns any
// critical diagnostic into exit code 2 so CI can gate on unreachable
// contrast targets.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use tonal_tokens::{ColorScheme, DerivationResult, SchemeError, builtin_names, builtin_scheme, derive, export};

/// Scheme used when neither a file nor `--builtin` is given.
const DEFAULT_BUILTIN: &str = "r316";

const EXIT_OK: u8 = 0;

/// Exit code for `--strict` runs that produced critical diagnostics.
const EXIT_CRITICAL: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "tonal")]
#[command(about = "Derive contrast-checked design tokens from a color scheme")]
#[command(version)]
struct Cli {
    /// Scheme file to derive (.json or .toml)
    #[arg(conflicts_with = "builtin")]
    scheme: Option<PathBuf>,

    /// Derive a builtin scheme instead of a file
    #[arg(short, long)]
    builtin: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Css)]
    format: Format,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List builtin schemes and exit
    #[arg(long)]
    list_builtins: bool,

    /// Exit with status 2 when any role cannot reach its minimum contrast
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// CSS custom properties for light and dark themes
    Css,
    /// One row per derived token
    Csv,
    /// The full derivation result
    Json,
    /// Counts and diagnostics
    Summary,
    /// The scheme itself, normalized to JSON
    Scheme,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("tonal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<u8> {
    if cli.list_builtins {
        for name in builtin_names() {
            println!("{name}");
        }
        return Ok(EXIT_OK);
    }

    let scheme = load_scheme(cli)?;
    let result = derive(&scheme).with_context(|| format!("failed to derive scheme '{}'", scheme.name))?;

    let text = match cli.format {
        Format::Css => export::to_css(&result)?,
        Format::Csv => export::to_csv(&result)?,
        Format::Json => export::to_json(&result)?,
        Format::Summary => render_summary(&result)?,
        Format::Scheme => scheme.to_json_pretty()?,
    };
    emit(cli, &text)?;

    if cli.strict && result.summary.critical > 0 {
        return Ok(EXIT_CRITICAL);
    }
    Ok(EXIT_OK)
}

fn load_scheme(cli: &Cli) -> Result<ColorScheme> {
    if let Some(path) = &cli.scheme {
        tracing::info!("Loading scheme from: {}", path.display());
        return ColorScheme::load(path).with_context(|| format!("failed to load scheme {}", path.display()));
    }
    let name = cli.builtin.as_deref().unwrap_or(DEFAULT_BUILTIN);
    builtin_scheme(name).ok_or_else(|| SchemeError::UnknownBuiltin(name.to_string()).into())
}

fn render_summary(result: &DerivationResult) -> Result<String> {
    let s = &result.summary;
    let mut out = String::new();
    for (label, count) in [
        ("groups", s.groups),
        ("weights", s.weights),
        ("roles", s.roles),
        ("themes", s.themes),
        ("tokens", s.tokens),
        ("critical", s.critical),
        ("warnings", s.warnings),
    ] {
        writeln!(out, "{label:<10}{count}")?;
    }
    for d in result.diagnostics.iter() {
        let role = d.role.as_deref().unwrap_or("-");
        writeln!(out, "{:<10}{}/{role} ({}): {}", d.severity.as_str(), d.group, d.theme, d.message)?;
    }
    Ok(out)
}

fn emit(cli: &Cli, text: &str) -> Result<()> {
    match &cli.output {
        Some(path) => fs::write(path, text).with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}
