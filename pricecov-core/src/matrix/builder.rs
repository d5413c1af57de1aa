//! Merge the two source archives into one availability matrix.
//!
//! Every (ticker, date) in `AllTickers × AllDates` starts at 0; each
//! distinct adjusted pair adds 1 and each distinct unadjusted pair adds 2.
//! The result is checked against `{0,1,2,3}` before it is handed out.

use super::{validate_cells, AvailabilityMatrix, MatrixError};
use crate::calendar::Calendar;
use crate::config::{CoverageConfig, OutOfRangePolicy};
use crate::data::{Canonicalizer, SourcePairs};
use crate::domain::{RawObservation, SourceKind};
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct MatrixBuilder {
    calendar: Calendar,
    out_of_range: OutOfRangePolicy,
}

impl MatrixBuilder {
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar, out_of_range: OutOfRangePolicy::Reject }
    }

    pub fn from_config(config: &CoverageConfig) -> Result<Self, MatrixError> {
        Ok(Self::new(config.calendar()?).with_out_of_range(config.input.out_of_range))
    }

    pub fn with_out_of_range(mut self, policy: OutOfRangePolicy) -> Self {
        self.out_of_range = policy;
        self
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn build(
        &self,
        unadjusted: &[RawObservation],
        adjusted: &[RawObservation],
    ) -> Result<AvailabilityMatrix, MatrixError> {
        if unadjusted.is_empty() {
            return Err(MatrixError::EmptySource { kind: SourceKind::Unadjusted });
        }
        if adjusted.is_empty() {
            return Err(MatrixError::EmptySource { kind: SourceKind::Adjusted });
        }

        let adjusted = Canonicalizer::dedupe(SourceKind::Adjusted, adjusted);
        let unadjusted = Canonicalizer::dedupe(SourceKind::Unadjusted, unadjusted);

        let tickers: Vec<String> = adjusted
            .tickers()
            .chain(unadjusted.tickers())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        let columns: HashMap<&str, usize> = tickers
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let mut raw = vec![0u8; self.calendar.len() * tickers.len()];
        for source in [&adjusted, &unadjusted] {
            self.mark(source, &columns, &mut raw)?;
        }

        let cells = validate_cells(&self.calendar, &tickers, &raw)?;
        let matrix = AvailabilityMatrix::from_parts(self.calendar, tickers, cells)?;

        let counts = matrix.value_counts();
        info!(
            tickers = matrix.ticker_count(),
            dates = matrix.date_count(),
            absent = counts.absent,
            adjusted_only = counts.adjusted_only,
            unadjusted_only = counts.unadjusted_only,
            both = counts.both,
            "built availability matrix"
        );
        Ok(matrix)
    }

    /// Add the source's bit to every cell it covers.
    fn mark(
        &self,
        source: &SourcePairs,
        columns: &HashMap<&str, usize>,
        raw: &mut [u8],
    ) -> Result<(), MatrixError> {
        let width = columns.len();
        let bit = source.kind.bit();
        let mut dropped = 0usize;

        for (ticker, date) in &source.pairs {
            let Some(row) = self.calendar.index_of(*date) else {
                match self.out_of_range {
                    OutOfRangePolicy::Reject => {
                        return Err(MatrixError::OutsideCalendar {
                            kind: source.kind,
                            ticker: ticker.clone(),
                            date: *date,
                            start: self.calendar.start(),
                            end: self.calendar.end(),
                        })
                    }
                    OutOfRangePolicy::Drop => {
                        dropped += 1;
                        continue;
                    }
                }
            };
            // Every ticker came from one of the two sources, so it has a column.
            let Some(&col) = columns.get(ticker.as_str()) else {
                continue;
            };
            raw[row * width + col] += bit;
        }

        if source.duplicates > 0 {
            info!(source = %source.kind, duplicates = source.duplicates, "collapsed duplicate rows");
        }
        if dropped > 0 {
            warn!(source = %source.kind, dropped, "dropped observations outside the calendar");
        }
        Ok(())
    }
}
