//! dataset-usage-report: Export dataset licence reports as CSV
//!
//! Writes `gateway-datasets.csv`, `commercial-datasets.csv` and
//! `non-commercial-datasets.csv`. Connection settings come from the
//! environment (`DATABASE_HOST`, `DATABASE`, `DATABASE_COLLECTION`,
//! `DATABASE_USER`, `DATABASE_PASSWORD`) and the secrets file.
//!
//! Usage:
//!   # Query the gateway database, write to the current directory
//!   dataset-usage-report
//!
//!   # Replay a mongoexport dump instead of querying the database
//!   dataset-usage-report --input tools.json --output-dir ./reports

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use dataset_usage::config::DEFAULT_SECRETS_FILE;
use dataset_usage::types::DEFAULT_SEPARATOR;
use dataset_usage::{export_reports, run_report, Config, FlattenConfig, JsonFileStore, ReportPaths};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dataset-usage-report")]
#[command(about = "Classify gateway datasets by usage licence and export CSV reports", long_about = None)]
struct Args {
    /// Directory the three CSV files are written to
    #[arg(long, short = 'o', default_value = ".")]
    output_dir: PathBuf,

    /// Dotenv-style file holding mongodb_user and mongodb_password
    #[arg(long, default_value = DEFAULT_SECRETS_FILE)]
    secrets_file: PathBuf,

    /// Read documents from a JSON or NDJSON export instead of the database
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Separator for flattened column names
    #[arg(long, default_value = DEFAULT_SEPARATOR)]
    separator: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dataset_usage=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::from_env(&args.secrets_file).context("Failed to load configuration")?;
    let flatten_config = FlattenConfig::with_separator(args.separator);

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;
    let paths = ReportPaths::in_dir(&args.output_dir);

    let summary = match args.input {
        Some(input) => {
            let store = JsonFileStore::new(input);
            run_report(&store, &config.collection, &paths, &flatten_config)
        }
        None => export_reports(&config, &paths, &flatten_config),
    }
    .context("Report run failed")?;

    let mut stdout = std::io::stdout();
    let line = serde_json::to_string(&summary)?;
    writeln!(stdout, "{}", line)?;
    Ok(())
}
