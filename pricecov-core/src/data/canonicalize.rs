use crate::domain::{RawObservation, SourceKind};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::debug;

/// Distinct (ticker, date) pairs of one source after deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePairs {
    pub kind: SourceKind,
    pub pairs: BTreeSet<(String, NaiveDate)>,
    /// Raw rows collapsed because their (ticker, date) was already seen.
    pub duplicates: usize,
}

impl SourcePairs {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(ticker, _)| ticker.as_str())
    }

    pub fn contains(&self, ticker: &str, date: NaiveDate) -> bool {
        self.pairs.contains(&(ticker.to_string(), date))
    }
}

/// Canonicalizer for source observations
pub struct Canonicalizer;

impl Canonicalizer {
    /// Collapse rows to distinct (ticker, date) pairs, ordered by ticker then date.
    pub fn dedupe(kind: SourceKind, observations: &[RawObservation]) -> SourcePairs {
        let mut pairs = BTreeSet::new();
        let mut duplicates = 0;
        for obs in observations {
            if !pairs.insert((obs.ticker.clone(), obs.date)) {
                duplicates += 1;
            }
        }
        debug!(source = %kind, distinct = pairs.len(), duplicates, "deduplicated source");
        SourcePairs { kind, pairs, duplicates }
    }
}
