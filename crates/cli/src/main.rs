//! # sheetman-cli
//!
//! Command-line interface for sheetman: runs a JSON batch of spreadsheet
//! operations and prints one result per item.

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use serde_json::Value;
use sheetman_core::{BatchPolicy, BatchReport, Engine, EngineConfig, FsStorage};
use sheetman_sheet::{JsonCodec, WorkbookCodec, XlsxCodec};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// sheetman - batch operations on spreadsheet files
#[derive(Parser)]
#[command(name = "sheetman")]
#[command(author, version, about = "Create, view, edit and delete spreadsheet rows from JSON batches", long_about = None)]
struct Cli {
    /// Batch file: a JSON array of items, or a single item (stdin when omitted or `-`)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Engine configuration file (JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory relative file paths are resolved under
    #[arg(long = "base-dir", env = "SHEETMAN_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// File used by items without a filePath
    #[arg(long = "default-file")]
    default_file: Option<String>,

    /// Keep processing items after one fails
    #[arg(long = "continue-on-fail")]
    continue_on_fail: bool,

    /// Workbook file format
    #[arg(short = 'f', long = "format", default_value = "xlsx")]
    format: FileFormat,

    /// Pretty-print the results
    #[arg(short, long)]
    pretty: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Storage format of the workbooks.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum FileFormat {
    /// Office Open XML workbook (default)
    #[default]
    Xlsx,
    /// The workbook model as JSON
    Json,
}

impl FileFormat {
    fn codec(self, pretty: bool) -> Box<dyn WorkbookCodec> {
        match self {
            FileFormat::Xlsx => Box::new(XlsxCodec::new()),
            FileFormat::Json => Box::new(JsonCodec::new().pretty(pretty)),
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the results
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let config = build_config(&cli)?;
    let source = read_source(cli.file.as_ref())?;
    let items = parse_batch(&source)?;

    info!(
        items = items.len(),
        base_dir = %config.base_dir.display(),
        policy = ?config.batch_policy,
        "running batch"
    );
    let mut engine = Engine::new(cli.format.codec(cli.pretty), FsStorage::new(), config);
    let report = engine.run_batch(&items);
    info!(
        processed = report.items.len(),
        failures = report.failures(),
        skipped = report.skipped,
        "batch finished"
    );

    print_report(&report, cli.pretty)?;

    if report.failures() > 0 {
        eprintln!(
            "{} {} of {} item(s) failed{}",
            "Error:".red().bold(),
            report.failures(),
            items.len(),
            if report.skipped > 0 {
                format!(", {} skipped", report.skipped)
            } else {
                String::new()
            }
        );
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

/// Merge the config file (if any) with command-line overrides.
fn build_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str::<EngineConfig>(&text)
                .with_context(|| format!("Invalid config: {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Some(base_dir) = &cli.base_dir {
        config = config.with_base_dir(base_dir.clone());
    }
    if let Some(default_file) = &cli.default_file {
        config = config.with_default_file_path(default_file.clone());
    }
    if cli.continue_on_fail {
        config = config.with_batch_policy(BatchPolicy::ContinueOnError);
    }

    Ok(config)
}

fn read_source(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read batch from stdin")?;
            Ok(source)
        }
    }
}

/// Parse the batch text: an array of item objects, or one item object.
fn parse_batch(source: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(source).context("Batch is not valid JSON")?;
    match value {
        Value::Array(items) => Ok(items),
        item @ Value::Object(_) => Ok(vec![item]),
        other => bail!("Batch must be an array of items or a single item, got {other}"),
    }
}

fn print_report(report: &BatchReport, pretty: bool) -> Result<()> {
    let json = report.to_json();
    if pretty {
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", serde_json::to_string(&json)?);
    }
    Ok(())
}
