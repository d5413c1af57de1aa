//! pricecov runner: batch orchestration on top of `pricecov-core`.
//!
//! This crate provides:
//! - The full pipeline (load → build → persist → summarize → persist)
//! - Each stage on its own, reading its inputs from disk
//! - Atomic artifact writes and BLAKE3 content hashes
//! - A deterministic run manifest

pub mod artifacts;
pub mod manifest;
pub mod pipeline;

pub use artifacts::{ArtifactError, ArtifactPaths};
pub use manifest::{FileDigest, RunManifest};
pub use pipeline::{
    build_matrix_stage, date_summary_stage, instrument_summary_stage, load_matrix, load_sources,
    run_pipeline, MatrixStageReport, PipelineOptions, RunError, RunReport,
};
