use super::coverage_ratio;
use crate::classify::InstrumentClassifier;
use crate::domain::InstrumentType;
use crate::matrix::AvailabilityMatrix;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Lifespan and coverage of one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSummary {
    pub ticker: String,
    pub instrument_type: InstrumentType,
    pub first_active_date: NaiveDate,
    pub last_active_date: NaiveDate,
    /// Inclusive day count from first to last active date.
    pub calendar_span_days: usize,
    pub days_with_adjusted: usize,
    pub days_with_unadjusted: usize,
    pub days_with_both: usize,
    /// `days_with_both / calendar_span_days`, 4 decimals.
    pub coverage_ratio: f64,
}

pub struct InstrumentSummarizer<'a, C: InstrumentClassifier + ?Sized> {
    classifier: &'a C,
}

impl<'a, C: InstrumentClassifier + ?Sized> InstrumentSummarizer<'a, C> {
    pub fn new(classifier: &'a C) -> Self {
        Self { classifier }
    }

    /// One record per ticker with at least one active day, in ticker order.
    pub fn summarize(&self, matrix: &AvailabilityMatrix) -> Vec<InstrumentSummary> {
        let summaries: Vec<_> = matrix
            .tickers()
            .iter()
            .filter_map(|ticker| self.summarize_ticker(matrix, ticker))
            .collect();

        info!(
            tickers = matrix.ticker_count(),
            summarized = summaries.len(),
            "summarized instruments"
        );
        summaries
    }

    fn summarize_ticker(&self, matrix: &AvailabilityMatrix, ticker: &str) -> Option<InstrumentSummary> {
        let mut first: Option<NaiveDate> = None;
        let mut last: Option<NaiveDate> = None;
        let (mut adjusted, mut unadjusted, mut both) = (0, 0, 0);

        for (date, cell) in matrix.column(ticker)?.filter(|(_, c)| c.is_present()) {
            first.get_or_insert(date);
            last = Some(date);
            adjusted += usize::from(cell.has_adjusted());
            unadjusted += usize::from(cell.has_unadjusted());
            both += usize::from(cell.has_both());
        }

        let (first, last) = (first?, last?);
        // Column dates ascend, so last >= first.
        let span = (last - first).num_days().unsigned_abs() as usize + 1;

        Some(InstrumentSummary {
            ticker: ticker.to_string(),
            instrument_type: self.classifier.classify(ticker),
            first_active_date: first,
            last_active_date: last,
            calendar_span_days: span,
            days_with_adjusted: adjusted,
            days_with_unadjusted: unadjusted,
            days_with_both: both,
            coverage_ratio: coverage_ratio(both, span),
        })
    }
}

/// Number of summarized instruments per type.
pub fn type_breakdown(summaries: &[InstrumentSummary]) -> BTreeMap<InstrumentType, usize> {
    let mut counts = BTreeMap::new();
    for s in summaries {
        *counts.entry(s.instrument_type).or_insert(0) += 1;
    }
    counts
}
