//! pricecov core: availability matrix and coverage summaries.
//!
//! This crate reconciles an adjusted and an unadjusted end-of-day price
//! archive into one ticker × date presence matrix and derives coverage
//! views from it:
//! - Calendar span, weekend convention and the single date parser
//! - Source CSV ingestion and (ticker, date) deduplication
//! - Matrix build with a `{0,1,2,3}` post-condition check, CSV persistence
//! - Per-instrument lifespan/coverage and per-date coverage summaries
//! - Ordered-rule ticker classification
//! - TOML run configuration

pub mod calendar;
pub mod classify;
pub mod config;
pub mod data;
pub mod domain;
pub mod matrix;
pub mod summary;

pub use calendar::{Calendar, CalendarError, DateParser, WeekendRule};
pub use classify::{ClassifierRule, InstrumentClassifier, MatchKind, RuleClassifier};
pub use config::{ConfigError, CoverageConfig, OutOfRangePolicy};
pub use domain::{AvailabilityCell, InstrumentType, RawObservation, SourceKind};
pub use matrix::{AvailabilityMatrix, MatrixBuilder, MatrixError, ValueCounts};
pub use summary::{DateSummarizer, DateSummary, InstrumentSummarizer, InstrumentSummary};
