//! CSV ingestion for the two source archives.
//!
//! Columns are located by header name; extra columns are ignored. Dates go
//! through the run's single [`DateParser`] so that every row lands on a
//! calendar day under one convention.

use crate::calendar::{CalendarError, DateParser};
use crate::config::InputConfig;
use crate::domain::{RawObservation, SourceKind};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{kind} source: cannot open {path}: {source}")]
    Open {
        kind: SourceKind,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} source: CSV error: {source}")]
    Csv {
        kind: SourceKind,
        #[source]
        source: csv::Error,
    },

    #[error("{kind} source: missing required column '{column}'")]
    MissingColumn { kind: SourceKind, column: String },

    #[error("{kind} source, line {line}: {source}")]
    BadDate {
        kind: SourceKind,
        line: u64,
        #[source]
        source: CalendarError,
    },

    #[error("{kind} source, line {line}: empty ticker")]
    EmptyTicker { kind: SourceKind, line: u64 },
}

/// Open `path` and read every observation from it.
pub fn load_observations(
    path: &Path,
    kind: SourceKind,
    input: &InputConfig,
    parser: &DateParser,
) -> Result<Vec<RawObservation>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        kind,
        path: path.display().to_string(),
        source,
    })?;
    read_observations(file, kind, input, parser)
}

/// Read observations from any CSV byte stream with a header row.
pub fn read_observations<R: Read>(
    reader: R,
    kind: SourceKind,
    input: &InputConfig,
    parser: &DateParser,
) -> Result<Vec<RawObservation>, IngestError> {
    let csv_err = |source| IngestError::Csv { kind, source };

    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();

    let find = |name: &str| headers.iter().position(|h| h.trim() == name);
    let date_idx = find(&input.date_column).ok_or_else(|| IngestError::MissingColumn {
        kind,
        column: input.date_column.clone(),
    })?;
    let ticker_idx = find(&input.ticker_column).ok_or_else(|| IngestError::MissingColumn {
        kind,
        column: input.ticker_column.clone(),
    })?;
    let price_idx = find(&input.price_column);

    let mut observations = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(csv_err)?;
        // Header is line 1.
        let line = record.position().map(|p| p.line()).unwrap_or(i as u64 + 2);

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = parser
            .parse(raw_date)
            .map_err(|source| IngestError::BadDate { kind, line, source })?;

        let ticker = record.get(ticker_idx).unwrap_or_default().trim();
        if ticker.is_empty() {
            return Err(IngestError::EmptyTicker { kind, line });
        }

        // Presence alone drives availability; an unreadable price keeps the row.
        let close_price = match price_idx.and_then(|idx| record.get(idx)).map(str::trim) {
            None | Some("") => None,
            Some(value) => match value.parse::<f64>() {
                Ok(price) => Some(price),
                Err(_) => {
                    debug!(source = %kind, line, value, "unparseable price, kept as missing");
                    None
                }
            },
        };

        observations.push(RawObservation::new(ticker, date, close_price));
    }

    debug!(source = %kind, rows = observations.len(), "read source rows");
    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn read(csv: &str) -> Result<Vec<RawObservation>, IngestError> {
        read_observations(
            csv.as_bytes(),
            SourceKind::Adjusted,
            &InputConfig::default(),
            &DateParser::iso(),
        )
    }

    #[test]
    fn reads_rows_by_header_name() {
        let rows = read("Ticker,Open,Close,Date\nGP,1,2.5,2020-01-01\nBATBC,3,4,2020-01-02\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ticker, "GP");
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(rows[0].close_price, Some(2.5));
        assert_eq!(rows[1].ticker, "BATBC");
    }

    #[test]
    fn time_component_collapses_to_day() {
        let rows = read("Date,Ticker,Close\n2020-01-01 10:00:00,GP,1\n2020-01-01T14:30:00,GP,2\n").unwrap();
        assert_eq!(rows[0].date, rows[1].date);
    }

    #[test]
    fn price_column_is_optional() {
        let rows = read("Date,Ticker\n2020-01-01,GP\n").unwrap();
        assert_eq!(rows[0].close_price, None);
    }

    #[test]
    fn blank_price_is_none() {
        let rows = read("Date,Ticker,Close\n2020-01-01,GP,\n").unwrap();
        assert_eq!(rows[0].close_price, None);
    }

    #[test]
    fn tickers_are_trimmed() {
        let rows = read("Date,Ticker\n2020-01-01,  GP \n").unwrap();
        assert_eq!(rows[0].ticker, "GP");
    }

    #[test]
    fn missing_ticker_column_is_fatal() {
        let err = read("Date,Symbol\n2020-01-01,GP\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "Ticker"));
    }

    #[test]
    fn bad_date_reports_line() {
        let err = read("Date,Ticker\n2020-01-01,GP\nnot-a-date,GP\n").unwrap_err();
        assert!(matches!(err, IngestError::BadDate { line: 3, .. }), "got {err}");
    }

    #[test]
    fn empty_ticker_is_fatal() {
        let err = read("Date,Ticker\n2020-01-01, \n").unwrap_err();
        assert!(matches!(err, IngestError::EmptyTicker { line: 2, .. }));
    }

    #[test]
    fn unparseable_price_keeps_the_row() {
        let rows = read("Date,Ticker,Close\n2020-01-01,GP,-\n2020-01-02,GP,\"1,234.5\"\n2020-01-03,GP,7\n")
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].close_price, None);
        assert_eq!(rows[1].close_price, None);
        assert_eq!(rows[2].close_price, Some(7.0));
    }

    #[test]
    fn header_only_file_reads_empty() {
        assert!(read("Date,Ticker,Close\n").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = load_observations(
            Path::new("/definitely/not/here.csv"),
            SourceKind::Unadjusted,
            &InputConfig::default(),
            &DateParser::iso(),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::Open { kind: SourceKind::Unadjusted, .. }));
    }
}
