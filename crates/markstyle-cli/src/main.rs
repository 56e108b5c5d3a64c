// SPDX-License-Identifier: AGPL-3.0-or-later
//! markstyle - convert Markdown or AsciiDoc text into plain text plus style ranges

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use markstyle_core::{convert_bytes, Conversion, ConversionError, ConvertConfig, Format};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    /// Full conversion as pretty-printed JSON
    Json,
    /// Detected format followed by the plain text
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "markstyle")]
#[command(about = "Convert Markdown or AsciiDoc into plain text and style ranges")]
struct Cli {
    /// Input file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Skip detection and parse as this format (md, markdown, adoc, asciidoc)
    #[arg(short, long)]
    format: Option<Format>,

    /// TOML file with conversion settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output representation
    #[arg(short, long, value_enum, default_value_t = OutputKind::Json)]
    output: OutputKind,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Load settings from `path`, or the defaults when no file is given
fn load_config(path: Option<&Path>) -> Result<ConvertConfig> {
    let Some(path) = path else {
        return Ok(ConvertConfig::default());
    };
    let raw = fs::read_to_string(path)
        .map_err(ConversionError::from)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&raw)
        .map_err(|e| ConversionError::Config(e.to_string()))
        .with_context(|| format!("parsing config {}", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path)
            .map_err(ConversionError::from)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(ConversionError::from)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn render(conversion: &Conversion, output: OutputKind) -> Result<String> {
    match output {
        OutputKind::Json => serde_json::to_string_pretty(conversion)
            .map_err(|e| ConversionError::Serialization(e.to_string()).into()),
        OutputKind::Text => Ok(format!("{}\n{}", conversion.format, conversion.text)),
    }
}

fn run(cli: &Cli) -> Result<String> {
    let mut config = load_config(cli.config.as_deref())?;
    if cli.format.is_some() {
        config.format = cli.format;
    }
    tracing::debug!(?config, "loaded configuration");

    let input = read_input(cli.input.as_deref())?;
    let conversion = convert_bytes(&input, &config)?;
    render(&conversion, cli.output)
}

/// One readable line for the user; the full chain goes to the log
fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ConversionError>() {
        Some(conversion) => conversion.user_message(),
        None => format!("Conversion failed: {err}"),
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = ?e, "conversion failed");
            eprintln!("{}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}
