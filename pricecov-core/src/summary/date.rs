use super::coverage_ratio;
use crate::calendar::{day_name, WeekendRule};
use crate::matrix::AvailabilityMatrix;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Availability of the whole universe on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateSummary {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub is_weekend: bool,
    /// Size of the full ticker universe; identical on every row.
    pub total_instruments: usize,
    pub available_any: usize,
    pub available_unadjusted_only_or_both: usize,
    pub available_adjusted_only_or_both: usize,
    pub available_both: usize,
    /// `available_both / total_instruments`, 4 decimals.
    pub coverage_ratio: f64,
}

pub struct DateSummarizer {
    weekend: WeekendRule,
}

impl DateSummarizer {
    pub fn new(weekend: WeekendRule) -> Self {
        Self { weekend }
    }

    /// One row per calendar day of the matrix, ascending, no gaps.
    pub fn summarize(&self, matrix: &AvailabilityMatrix) -> Vec<DateSummary> {
        let total = matrix.ticker_count();

        let summaries: Vec<DateSummary> = matrix
            .rows()
            .map(|(date, row)| {
                let mut any = 0;
                let mut unadjusted = 0;
                let mut adjusted = 0;
                let mut both = 0;
                for cell in row {
                    any += usize::from(cell.is_present());
                    unadjusted += usize::from(cell.has_unadjusted());
                    adjusted += usize::from(cell.has_adjusted());
                    both += usize::from(cell.has_both());
                }

                DateSummary {
                    date,
                    day_of_week: day_name(date),
                    is_weekend: self.weekend.is_weekend(date),
                    total_instruments: total,
                    available_any: any,
                    available_unadjusted_only_or_both: unadjusted,
                    available_adjusted_only_or_both: adjusted,
                    available_both: both,
                    coverage_ratio: coverage_ratio(both, total),
                }
            })
            .collect();

        info!(
            dates = summaries.len(),
            total_instruments = total,
            weekend_days = summaries.iter().filter(|s| s.is_weekend).count(),
            "summarized dates"
        );
        summaries
    }
}

impl Default for DateSummarizer {
    fn default() -> Self {
        Self::new(WeekendRule::default())
    }
}
