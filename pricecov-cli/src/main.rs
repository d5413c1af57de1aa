//! pricecov CLI: availability matrix and coverage summary commands.
//!
//! Commands:
//! - `run`: build the matrix, both summaries and the run manifest
//! - `build-matrix`: build and persist the availability matrix only
//! - `instruments`: per-instrument summary from a persisted matrix
//! - `dates`: per-date coverage series from a persisted matrix
//! - `config`: print the effective configuration as TOML

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pricecov_core::CoverageConfig;
use pricecov_runner::artifacts::{DATE_FILE, INSTRUMENT_FILE, MATRIX_FILE};
use pricecov_runner::{
    build_matrix_stage, date_summary_stage, instrument_summary_stage, run_pipeline,
    PipelineOptions, RunReport,
};

#[derive(Parser)]
#[command(
    name = "pricecov",
    about = "pricecov: availability and coverage of adjusted vs unadjusted EOD archives"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Config file plus command-line overrides of the calendar span.
#[derive(Args)]
struct ConfigArgs {
    /// Path to a TOML config file. Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Calendar start (YYYY-MM-DD), overrides the config.
    #[arg(long)]
    start: Option<String>,

    /// Calendar end (YYYY-MM-DD), overrides the config.
    #[arg(long)]
    end: Option<String>,
}

#[derive(Args)]
struct SourceArgs {
    /// Unadjusted EOD price CSV.
    #[arg(long)]
    unadjusted: PathBuf,

    /// Adjusted EOD price CSV.
    #[arg(long)]
    adjusted: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the matrix, both summaries and the manifest.
    Run {
        #[command(flatten)]
        sources: SourceArgs,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output directory for all artifacts.
        #[arg(long, default_value = "metadata")]
        output_dir: PathBuf,
    },
    /// Build and persist the availability matrix only.
    BuildMatrix {
        #[command(flatten)]
        sources: SourceArgs,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output directory; the matrix lands in availability_matrix.csv.
        #[arg(long, default_value = "metadata")]
        output_dir: PathBuf,
    },
    /// Per-instrument lifespan and coverage from a persisted matrix.
    Instruments {
        /// Persisted availability matrix.
        #[arg(long, default_value = "metadata/availability_matrix.csv")]
        matrix: PathBuf,

        /// Output CSV. Defaults to company_metadata.csv next to the matrix.
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Per-date coverage series from a persisted matrix.
    Dates {
        /// Persisted availability matrix.
        #[arg(long, default_value = "metadata/availability_matrix.csv")]
        matrix: PathBuf,

        /// Output CSV. Defaults to date_coverage_summary.csv next to the matrix.
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print the effective configuration as TOML.
    Config {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { sources, config, output_dir } => run_all(sources, &config, &output_dir),
        Commands::BuildMatrix { sources, config, output_dir } => {
            run_build_matrix(sources, &config, &output_dir)
        }
        Commands::Instruments { matrix, output, config } => {
            run_instruments(&matrix, output, &config)
        }
        Commands::Dates { matrix, output, config } => run_dates(&matrix, output, &config),
        Commands::Config { config } => print_config(&config),
    }
}

/// Logs go to stderr so stdout stays clean for summary lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_date(flag: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("--{flag} '{value}' is not a YYYY-MM-DD date"))
}

/// Load the config file (or defaults), apply overrides, then validate.
fn load_config(args: &ConfigArgs) -> Result<CoverageConfig> {
    let mut config = match &args.config {
        Some(path) => CoverageConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CoverageConfig::default(),
    };

    if let Some(start) = &args.start {
        config.calendar.start = parse_date("start", start)?;
    }
    if let Some(end) = &args.end {
        config.calendar.end = parse_date("end", end)?;
    }
    config.validate().context("invalid configuration")?;
    debug!(start = %config.calendar.start, end = %config.calendar.end, "effective calendar");
    Ok(config)
}

/// Sibling of the matrix file, used when `--output` is omitted.
fn beside(matrix: &Path, file_name: &str) -> PathBuf {
    matrix
        .parent()
        .map(|dir| dir.join(file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

fn run_all(sources: SourceArgs, config: &ConfigArgs, output_dir: &Path) -> Result<()> {
    let config = load_config(config)?;
    let opts = PipelineOptions::new(sources.unadjusted, sources.adjusted, output_dir, config);
    let report = run_pipeline(&opts).context("coverage run failed")?;
    print_report(&report);
    Ok(())
}

fn run_build_matrix(sources: SourceArgs, config: &ConfigArgs, output_dir: &Path) -> Result<()> {
    let config = load_config(config)?;
    let output = output_dir.join(MATRIX_FILE);
    let built = build_matrix_stage(&sources.unadjusted, &sources.adjusted, &config, &output)
        .context("matrix build failed")?;

    let counts = built.matrix.value_counts();
    println!("Matrix: {}", output.display());
    println!("  {} dates x {} tickers", built.matrix.date_count(), built.matrix.ticker_count());
    println!(
        "  absent {}  adjusted-only {}  unadjusted-only {}  both {}",
        counts.absent, counts.adjusted_only, counts.unadjusted_only, counts.both
    );
    println!("  blake3 {}", built.blake3);
    Ok(())
}

fn run_instruments(matrix: &Path, output: Option<PathBuf>, config: &ConfigArgs) -> Result<()> {
    let config = load_config(config)?;
    let output = output.unwrap_or_else(|| beside(matrix, INSTRUMENT_FILE));
    let summaries = instrument_summary_stage(matrix, &config, &output)
        .context("instrument summary failed")?;

    println!("Instrument summary: {} ({} instruments)", output.display(), summaries.len());
    for (instrument_type, count) in pricecov_core::summary::type_breakdown(&summaries) {
        println!("  {:<14} {:>6}", instrument_type.as_str(), count);
    }
    Ok(())
}

fn run_dates(matrix: &Path, output: Option<PathBuf>, config: &ConfigArgs) -> Result<()> {
    let config = load_config(config)?;
    let output = output.unwrap_or_else(|| beside(matrix, DATE_FILE));
    let summaries =
        date_summary_stage(matrix, &config, &output).context("date summary failed")?;

    let weekend = summaries.iter().filter(|s| s.is_weekend).count();
    println!("Date summary: {} ({} dates, {} weekend)", output.display(), summaries.len(), weekend);
    Ok(())
}

fn print_config(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args)?;
    let toml = config.to_toml().context("failed to render configuration")?;
    print!("{toml}");
    Ok(())
}

fn print_report(report: &RunReport) {
    let m = &report.manifest;
    let paths = &report.artifacts;

    println!("Matrix:             {} ({} dates x {} tickers)", paths.matrix.display(), m.dates, m.tickers);
    println!(
        "  absent {}  adjusted-only {}  unadjusted-only {}  both {}",
        m.value_counts.absent,
        m.value_counts.adjusted_only,
        m.value_counts.unadjusted_only,
        m.value_counts.both
    );
    println!(
        "Instrument summary: {} ({} instruments)",
        paths.instruments.display(),
        m.instruments_summarized
    );
    for (instrument_type, count) in &m.instrument_types {
        println!("  {:<14} {:>6}", instrument_type, count);
    }
    println!("Date summary:       {}", paths.dates.display());
    println!("Manifest:           {}", paths.manifest.display());
}
