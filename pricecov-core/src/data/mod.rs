//! Source ingestion and canonicalization

pub mod canonicalize;
pub mod ingest;

pub use canonicalize::{Canonicalizer, SourcePairs};
pub use ingest::{load_observations, read_observations, IngestError};
