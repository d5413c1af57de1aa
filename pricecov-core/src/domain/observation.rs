use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of a source price archive, date already normalised to the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub ticker: String,
    pub date: NaiveDate,
    /// Closing price when the source file carries a price column.
    pub close_price: Option<f64>,
}

impl RawObservation {
    pub fn new(ticker: impl Into<String>, date: NaiveDate, close_price: Option<f64>) -> Self {
        Self { ticker: ticker.into(), date, close_price }
    }

    /// The (ticker, date) key the matrix is indexed by.
    pub fn key(&self) -> (&str, NaiveDate) {
        (self.ticker.as_str(), self.date)
    }
}
