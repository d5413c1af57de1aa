//! Batch pipeline: wires ingestion, matrix build, and both summaries.
//!
//! Stage order is fixed: load both sources → build matrix → persist matrix
//! → each summarizer re-reads the persisted matrix → persist summaries →
//! manifest. Each stage writes only after its in-memory result is complete
//! and validated, so a failure never leaves a partial file behind.
//!
//! Entry points:
//! - `run_pipeline()`: the whole batch, used by `pricecov run`.
//! - `build_matrix_stage()`, `instrument_summary_stage()`,
//!   `date_summary_stage()`: one stage each, reading inputs from disk.

use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use pricecov_core::data::{load_observations, IngestError};
use pricecov_core::matrix::{read_matrix_csv, write_matrix_csv};
use pricecov_core::summary::{
    type_breakdown, write_date_summary_csv, write_instrument_summary_csv,
};
use pricecov_core::{
    AvailabilityMatrix, ConfigError, CoverageConfig, DateSummarizer, DateSummary,
    InstrumentSummarizer, InstrumentSummary, MatrixBuilder, MatrixError, RawObservation,
    SourceKind,
};

use crate::artifacts::{content_hash, hash_file, write_atomic, ArtifactError, ArtifactPaths};
use crate::manifest::{FileDigest, RunManifest, SCHEMA_VERSION};

/// Errors from the pipeline, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("ingest stage failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("matrix build stage failed: {0}")]
    Build(#[source] MatrixError),

    #[error("cannot load availability matrix {path}: {source}")]
    LoadMatrix {
        path: String,
        #[source]
        source: MatrixError,
    },

    #[error("failed to encode {table}: {reason}")]
    Encode { table: &'static str, reason: String },

    #[error("persist stage failed: {0}")]
    Persist(#[from] ArtifactError),
}

/// Inputs and outputs of a full run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub unadjusted: PathBuf,
    pub adjusted: PathBuf,
    pub artifacts: ArtifactPaths,
    pub config: CoverageConfig,
}

impl PipelineOptions {
    /// Default artifact names under `output_dir`.
    pub fn new(
        unadjusted: impl Into<PathBuf>,
        adjusted: impl Into<PathBuf>,
        output_dir: &Path,
        config: CoverageConfig,
    ) -> Self {
        Self {
            unadjusted: unadjusted.into(),
            adjusted: adjusted.into(),
            artifacts: ArtifactPaths::in_dir(output_dir),
            config,
        }
    }
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub artifacts: ArtifactPaths,
    pub manifest: RunManifest,
}

/// Result of the matrix stage.
#[derive(Debug, Clone)]
pub struct MatrixStageReport {
    pub matrix: AvailabilityMatrix,
    pub blake3: String,
}

/// Run every stage and write the manifest.
pub fn run_pipeline(opts: &PipelineOptions) -> Result<RunReport, RunError> {
    opts.config.validate()?;
    let paths = &opts.artifacts;

    let built = build_matrix_stage(&opts.unadjusted, &opts.adjusted, &opts.config, &paths.matrix)?;
    let instruments = instrument_summary_stage(&paths.matrix, &opts.config, &paths.instruments)?;
    let dates = date_summary_stage(&paths.matrix, &opts.config, &paths.dates)?;

    let digest = |path: &Path| -> Result<FileDigest, RunError> {
        Ok(FileDigest { path: path.display().to_string(), blake3: hash_file(path)? })
    };

    let manifest = RunManifest {
        schema_version: SCHEMA_VERSION,
        config: opts.config.clone(),
        unadjusted: digest(&opts.unadjusted)?,
        adjusted: digest(&opts.adjusted)?,
        matrix: FileDigest { path: paths.matrix.display().to_string(), blake3: built.blake3 },
        instrument_summary: digest(&paths.instruments)?,
        date_summary: digest(&paths.dates)?,
        tickers: built.matrix.ticker_count(),
        dates: dates.len(),
        value_counts: built.matrix.value_counts(),
        instruments_summarized: instruments.len(),
        instrument_types: type_breakdown(&instruments)
            .into_iter()
            .map(|(t, n)| (t.to_string(), n))
            .collect(),
    };
    write_atomic(&paths.manifest, manifest.to_json().map_err(ArtifactError::from)?.as_bytes())?;
    info!(path = %paths.manifest.display(), "wrote run manifest");

    Ok(RunReport { artifacts: paths.clone(), manifest })
}

/// Load both sources in full before anything is computed.
pub fn load_sources(
    unadjusted: &Path,
    adjusted: &Path,
    config: &CoverageConfig,
) -> Result<(Vec<RawObservation>, Vec<RawObservation>), RunError> {
    let parser = config.date_parser();
    let unadjusted = load_observations(unadjusted, SourceKind::Unadjusted, &config.input, &parser)?;
    let adjusted = load_observations(adjusted, SourceKind::Adjusted, &config.input, &parser)?;
    info!(
        unadjusted_rows = unadjusted.len(),
        adjusted_rows = adjusted.len(),
        "loaded sources"
    );
    Ok((unadjusted, adjusted))
}

/// Build the matrix from both source files and persist it to `output`.
pub fn build_matrix_stage(
    unadjusted: &Path,
    adjusted: &Path,
    config: &CoverageConfig,
    output: &Path,
) -> Result<MatrixStageReport, RunError> {
    let (unadjusted, adjusted) = load_sources(unadjusted, adjusted, config)?;

    let matrix = MatrixBuilder::from_config(config)
        .and_then(|builder| builder.build(&unadjusted, &adjusted))
        .map_err(RunError::Build)?;

    let mut bytes = Vec::new();
    write_matrix_csv(&matrix, &mut bytes).map_err(|e| RunError::Encode {
        table: "availability matrix",
        reason: e.to_string(),
    })?;
    write_atomic(output, &bytes)?;
    info!(path = %output.display(), bytes = bytes.len(), "wrote availability matrix");

    Ok(MatrixStageReport { matrix, blake3: content_hash(&bytes) })
}

/// Read a persisted matrix, re-validating every cell.
pub fn load_matrix(path: &Path) -> Result<AvailabilityMatrix, RunError> {
    let load_err = |source| RunError::LoadMatrix { path: path.display().to_string(), source };
    let file = File::open(path).map_err(|e| load_err(MatrixError::Io(e)))?;
    read_matrix_csv(file).map_err(load_err)
}

/// Per-instrument lifespan/coverage from the matrix at `matrix_path`.
pub fn instrument_summary_stage(
    matrix_path: &Path,
    config: &CoverageConfig,
    output: &Path,
) -> Result<Vec<InstrumentSummary>, RunError> {
    let matrix = load_matrix(matrix_path)?;
    let classifier = config.classifier();
    let summaries = InstrumentSummarizer::new(&classifier).summarize(&matrix);

    for (instrument_type, count) in type_breakdown(&summaries) {
        info!(%instrument_type, count, "instrument type");
    }

    let mut bytes = Vec::new();
    write_instrument_summary_csv(&summaries, &mut bytes).map_err(|e| RunError::Encode {
        table: "instrument summary",
        reason: e.to_string(),
    })?;
    write_atomic(output, &bytes)?;
    info!(path = %output.display(), rows = summaries.len(), "wrote instrument summary");

    Ok(summaries)
}

/// Per-date coverage series from the matrix at `matrix_path`.
pub fn date_summary_stage(
    matrix_path: &Path,
    config: &CoverageConfig,
    output: &Path,
) -> Result<Vec<DateSummary>, RunError> {
    let weekend = config.weekend_rule().map_err(ConfigError::from)?;
    let matrix = load_matrix(matrix_path)?;
    let summaries = DateSummarizer::new(weekend).summarize(&matrix);

    let mut bytes = Vec::new();
    write_date_summary_csv(&summaries, &mut bytes).map_err(|e| RunError::Encode {
        table: "date summary",
        reason: e.to_string(),
    })?;
    write_atomic(output, &bytes)?;
    info!(path = %output.display(), rows = summaries.len(), "wrote date summary");

    Ok(summaries)
}
