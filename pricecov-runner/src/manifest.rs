//! Run manifest: what went in, what came out, and the shape of the matrix.
//!
//! Contains no wall-clock time, so two runs over identical inputs produce
//! identical manifests.

use pricecov_core::{CoverageConfig, ValueCounts};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current schema version for persisted manifests.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDigest {
    pub path: String,
    pub blake3: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub config: CoverageConfig,
    pub unadjusted: FileDigest,
    pub adjusted: FileDigest,
    pub matrix: FileDigest,
    pub instrument_summary: FileDigest,
    pub date_summary: FileDigest,
    pub tickers: usize,
    pub dates: usize,
    pub value_counts: ValueCounts,
    pub instruments_summarized: usize,
    /// Summarized instruments per type label.
    pub instrument_types: BTreeMap<String, usize>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl RunManifest {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
