//! Output files: default layout, atomic writes, content hashes.
//!
//! Every artifact is written to `{name}.tmp` and renamed into place, so a
//! crash mid-write never leaves a truncated file under the final name.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MATRIX_FILE: &str = "availability_matrix.csv";
pub const INSTRUMENT_FILE: &str = "company_metadata.csv";
pub const DATE_FILE: &str = "date_coverage_summary.csv";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Where each output of a run lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub matrix: PathBuf,
    pub instruments: PathBuf,
    pub dates: PathBuf,
    pub manifest: PathBuf,
}

impl ArtifactPaths {
    /// Default file names under `output_dir`.
    pub fn in_dir(output_dir: &Path) -> Self {
        Self {
            matrix: output_dir.join(MATRIX_FILE),
            instruments: output_dir.join(INSTRUMENT_FILE),
            dates: output_dir.join(DATE_FILE),
            manifest: output_dir.join(MANIFEST_FILE),
        }
    }
}

/// Write `bytes` to `path` via a sibling temp file and rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ArtifactError::CreateDir {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let tmp_path = tmp_path_for(path);
    let write_err = |source| ArtifactError::Write {
        path: path.display().to_string(),
        source,
    };

    fs::write(&tmp_path, bytes).map_err(write_err)?;
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        write_err(e)
    })
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// BLAKE3 hex digest of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

pub fn hash_file(path: &Path) -> Result<String, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(content_hash(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let paths = ArtifactPaths::in_dir(Path::new("metadata"));
        assert_eq!(paths.matrix, Path::new("metadata/availability_matrix.csv"));
        assert_eq!(paths.instruments, Path::new("metadata/company_metadata.csv"));
        assert_eq!(paths.dates, Path::new("metadata/date_coverage_summary.csv"));
        assert_eq!(paths.manifest, Path::new("metadata/manifest.json"));
    }

    #[test]
    fn atomic_write_creates_parent_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");
        write_atomic(&path, b"a,b\n").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"a,b\n");
        assert!(!dir.path().join("nested/out.csv.tmp").exists());
    }

    #[test]
    fn atomic_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_atomic(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn hashes_are_stable_and_content_sensitive() {
        assert_eq!(content_hash(b"abc"), content_hash(b"abc"));
        assert_ne!(content_hash(b"abc"), content_hash(b"abd"));
        assert_eq!(content_hash(b"").len(), 64);
    }

    #[test]
    fn hash_file_matches_content_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.csv");
        fs::write(&path, b"Date,X\n").unwrap();
        assert_eq!(hash_file(&path).unwrap(), content_hash(b"Date,X\n"));
        assert!(hash_file(&dir.path().join("missing.csv")).is_err());
    }
}
