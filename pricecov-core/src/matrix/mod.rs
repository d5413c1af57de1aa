//! The dense ticker × date availability matrix.
//!
//! Storage is date-major (one row per calendar day, one column per ticker)
//! because that is also the persisted shape. Lookups go through the
//! (ticker, date) → cell mapping; the row/column views are conveniences
//! over the same buffer.

pub mod builder;
pub mod io;

pub use builder::MatrixBuilder;
pub use io::{read_matrix_csv, write_matrix_csv};

use crate::calendar::{Calendar, CalendarError};
use crate::domain::{AvailabilityCell, SourceKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("{kind} source is empty: nothing to reconcile")]
    EmptySource { kind: SourceKind },

    #[error("calendar: {0}")]
    Calendar(#[from] CalendarError),

    #[error("{kind} observation ({ticker}, {date}) is outside the calendar {start}..={end}")]
    OutsideCalendar {
        kind: SourceKind,
        ticker: String,
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("invalid availability cell ({ticker}, {date}) = {value}; expected one of 0,1,2,3")]
    InvalidCell { ticker: String, date: NaiveDate, value: u8 },

    #[error("matrix has {actual} cells, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("ticker columns must be sorted and unique: '{ticker}' follows '{previous}'")]
    UnsortedTickers { previous: String, ticker: String },

    #[error("empty ticker name in column {column}")]
    EmptyTicker { column: usize },

    #[error("matrix CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("matrix I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("matrix file must start with a 'Date' column, found '{found}'")]
    MissingDateColumn { found: String },

    #[error("matrix file has no date rows")]
    NoRows,

    #[error("matrix row {line}: {source}")]
    BadDate {
        line: u64,
        #[source]
        source: CalendarError,
    },

    #[error("matrix dates must be consecutive days: expected {expected}, found {found}")]
    DateGap { expected: NaiveDate, found: NaiveDate },

    #[error("matrix row for {date} has {found} cells, expected {expected}")]
    RowWidth { date: NaiveDate, expected: usize, found: usize },

    #[error("non-integer availability cell ({ticker}, {date}) = '{value}'")]
    BadCellValue { ticker: String, date: NaiveDate, value: String },
}

/// Histogram of cell values across the whole matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCounts {
    pub absent: usize,
    pub adjusted_only: usize,
    pub unadjusted_only: usize,
    pub both: usize,
}

impl ValueCounts {
    pub fn record(&mut self, cell: AvailabilityCell) {
        match cell.value() {
            0 => self.absent += 1,
            1 => self.adjusted_only += 1,
            2 => self.unadjusted_only += 1,
            _ => self.both += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.absent + self.adjusted_only + self.unadjusted_only + self.both
    }
}

/// Mapping (ticker, date) → cell, total over `tickers × calendar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityMatrix {
    calendar: Calendar,
    tickers: Vec<String>,
    ticker_index: HashMap<String, usize>,
    cells: Vec<AvailabilityCell>,
}

impl AvailabilityMatrix {
    /// Assemble a matrix from date-major cells.
    ///
    /// Tickers must be strictly ascending and `cells.len()` must equal
    /// `calendar.len() * tickers.len()`.
    pub fn from_parts(
        calendar: Calendar,
        tickers: Vec<String>,
        cells: Vec<AvailabilityCell>,
    ) -> Result<Self, MatrixError> {
        for (column, ticker) in tickers.iter().enumerate() {
            if ticker.is_empty() {
                return Err(MatrixError::EmptyTicker { column });
            }
        }
        for pair in tickers.windows(2) {
            if pair[0] >= pair[1] {
                return Err(MatrixError::UnsortedTickers {
                    previous: pair[0].clone(),
                    ticker: pair[1].clone(),
                });
            }
        }

        let expected = calendar.len() * tickers.len();
        if cells.len() != expected {
            return Err(MatrixError::DimensionMismatch { expected, actual: cells.len() });
        }

        let ticker_index = tickers
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        Ok(Self { calendar, tickers, ticker_index, cells })
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// All tickers, lexicographically sorted.
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn ticker_count(&self) -> usize {
        self.tickers.len()
    }

    pub fn date_count(&self) -> usize {
        self.calendar.len()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.calendar.days()
    }

    pub fn ticker_position(&self, ticker: &str) -> Option<usize> {
        self.ticker_index.get(ticker).copied()
    }

    /// The cell for `(ticker, date)`, or `None` if either is outside the matrix.
    pub fn cell(&self, ticker: &str, date: NaiveDate) -> Option<AvailabilityCell> {
        let col = self.ticker_position(ticker)?;
        let row = self.calendar.index_of(date)?;
        self.cells.get(row * self.tickers.len() + col).copied()
    }

    /// All cells of one date, in ticker order.
    pub fn row(&self, date: NaiveDate) -> Option<&[AvailabilityCell]> {
        let row = self.calendar.index_of(date)?;
        Some(self.row_at(row))
    }

    fn row_at(&self, row: usize) -> &[AvailabilityCell] {
        let width = self.tickers.len();
        &self.cells[row * width..(row + 1) * width]
    }

    /// `(date, row)` for every date, ascending.
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, &[AvailabilityCell])> + '_ {
        self.calendar
            .days()
            .enumerate()
            .map(move |(i, date)| (date, self.row_at(i)))
    }

    /// `(date, cell)` down one ticker's column, ascending by date.
    pub fn column(
        &self,
        ticker: &str,
    ) -> Option<impl Iterator<Item = (NaiveDate, AvailabilityCell)> + '_> {
        let col = self.ticker_position(ticker)?;
        let width = self.tickers.len();
        Some(
            self.calendar
                .days()
                .enumerate()
                .map(move |(row, date)| (date, self.cells[row * width + col])),
        )
    }

    pub fn value_counts(&self) -> ValueCounts {
        let mut counts = ValueCounts::default();
        for &cell in &self.cells {
            counts.record(cell);
        }
        counts
    }
}

/// Check every raw cell against `{0,1,2,3}` and convert.
///
/// Runs on every build and every load; the first offending cell is
/// reported with its ticker and date.
pub fn validate_cells(
    calendar: &Calendar,
    tickers: &[String],
    raw: &[u8],
) -> Result<Vec<AvailabilityCell>, MatrixError> {
    let width = tickers.len();
    raw.iter()
        .enumerate()
        .map(|(i, &value)| {
            AvailabilityCell::try_from(value).map_err(|_| {
                let (row, col) = if width == 0 { (0, 0) } else { (i / width, i % width) };
                MatrixError::InvalidCell {
                    ticker: tickers.get(col).cloned().unwrap_or_default(),
                    date: calendar.date_at(row).unwrap_or(calendar.start()),
                    value,
                }
            })
        })
        .collect()
}
