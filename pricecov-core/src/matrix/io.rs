//! Flat CSV persistence of the availability matrix.
//!
//! Layout: a `Date` column (ISO, ascending, one row per calendar day)
//! followed by one column per ticker in sorted order. Reading re-checks
//! every invariant the builder guarantees, so a hand-edited or truncated
//! file is rejected instead of silently misaligning the summaries.

use super::{validate_cells, AvailabilityMatrix, MatrixError};
use crate::calendar::{Calendar, DateParser, ISO_DATE_FORMAT};
use chrono::NaiveDate;
use std::io::{Read, Write};
use tracing::debug;

pub const DATE_COLUMN: &str = "Date";

pub fn write_matrix_csv<W: Write>(matrix: &AvailabilityMatrix, writer: W) -> Result<(), MatrixError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(matrix.ticker_count() + 1);
    header.push(DATE_COLUMN);
    header.extend(matrix.tickers().iter().map(String::as_str));
    wtr.write_record(&header)?;

    let mut record = Vec::with_capacity(matrix.ticker_count() + 1);
    for (date, row) in matrix.rows() {
        record.clear();
        record.push(date.format(ISO_DATE_FORMAT).to_string());
        record.extend(row.iter().map(|cell| cell.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_matrix_csv<R: Read>(reader: R) -> Result<AvailabilityMatrix, MatrixError> {
    let parser = DateParser::iso();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut columns = headers.iter();
    match columns.next().map(str::trim) {
        Some(DATE_COLUMN) => {}
        other => {
            return Err(MatrixError::MissingDateColumn {
                found: other.unwrap_or_default().to_string(),
            })
        }
    }
    let tickers: Vec<String> = columns.map(|t| t.trim().to_string()).collect();

    let mut start: Option<NaiveDate> = None;
    let mut previous: Option<NaiveDate> = None;
    let mut raw: Vec<u8> = Vec::new();

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(i as u64 + 2);
        let date = parser
            .parse(record.get(0).unwrap_or_default())
            .map_err(|source| MatrixError::BadDate { line, source })?;

        if let Some(prev) = previous {
            let expected = prev.succ_opt().unwrap_or(prev);
            if date != expected {
                return Err(MatrixError::DateGap { expected, found: date });
            }
        }
        start.get_or_insert(date);
        previous = Some(date);

        if record.len() != tickers.len() + 1 {
            return Err(MatrixError::RowWidth {
                date,
                expected: tickers.len(),
                found: record.len().saturating_sub(1),
            });
        }

        for (ticker, value) in tickers.iter().zip(record.iter().skip(1)) {
            let value = value.trim();
            let parsed = value.parse::<u8>().map_err(|_| MatrixError::BadCellValue {
                ticker: ticker.clone(),
                date,
                value: value.to_string(),
            })?;
            raw.push(parsed);
        }
    }

    let (Some(start), Some(end)) = (start, previous) else {
        return Err(MatrixError::NoRows);
    };
    let calendar = Calendar::new(start, end)?;
    let cells = validate_cells(&calendar, &tickers, &raw)?;
    let matrix = AvailabilityMatrix::from_parts(calendar, tickers, cells)?;
    debug!(
        tickers = matrix.ticker_count(),
        dates = matrix.date_count(),
        "loaded availability matrix"
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AvailabilityCell;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> AvailabilityMatrix {
        let cal = Calendar::new(d("2020-01-01"), d("2020-01-02")).unwrap();
        let cells = [3u8, 0, 0, 2]
            .iter()
            .map(|&v| AvailabilityCell::try_from(v).unwrap())
            .collect();
        AvailabilityMatrix::from_parts(cal, vec!["X".into(), "Y".into()], cells).unwrap()
    }

    fn to_string(m: &AvailabilityMatrix) -> String {
        let mut buf = Vec::new();
        write_matrix_csv(m, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_date_rows_and_ticker_columns() {
        assert_eq!(to_string(&sample()), "Date,X,Y\n2020-01-01,3,0\n2020-01-02,0,2\n");
    }

    #[test]
    fn reads_back_what_it_wrote() {
        let m = sample();
        let text = to_string(&m);
        let loaded = read_matrix_csv(text.as_bytes()).unwrap();
        assert_eq!(loaded, m);
    }

    #[test]
    fn rejects_missing_date_column() {
        let err = read_matrix_csv("When,X\n2020-01-01,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MatrixError::MissingDateColumn { .. }));
    }

    #[test]
    fn rejects_gaps_and_reordering() {
        let err = read_matrix_csv("Date,X\n2020-01-01,1\n2020-01-03,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MatrixError::DateGap { .. }));

        let err = read_matrix_csv("Date,X\n2020-01-02,1\n2020-01-01,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MatrixError::DateGap { .. }));

        let err = read_matrix_csv("Date,X\n2020-01-01,1\n2020-01-01,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MatrixError::DateGap { .. }));
    }

    #[test]
    fn rejects_illegal_cell_with_location() {
        let err = read_matrix_csv("Date,X,Y\n2020-01-01,0,0\n2020-01-02,0,7\n".as_bytes()).unwrap_err();
        match err {
            MatrixError::InvalidCell { ticker, date, value } => {
                assert_eq!(ticker, "Y");
                assert_eq!(date, d("2020-01-02"));
                assert_eq!(value, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_integer_cells() {
        let err = read_matrix_csv("Date,X\n2020-01-01,1.5\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MatrixError::BadCellValue { .. }));
    }

    #[test]
    fn rejects_short_rows() {
        let err = read_matrix_csv("Date,X,Y\n2020-01-01,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MatrixError::RowWidth { expected: 2, found: 1, .. }));
    }

    #[test]
    fn rejects_unsorted_header() {
        let err = read_matrix_csv("Date,Y,X\n2020-01-01,1,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MatrixError::UnsortedTickers { .. }));
    }

    #[test]
    fn rejects_header_only_file() {
        let err = read_matrix_csv("Date,X\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MatrixError::NoRows));
    }

    #[test]
    fn day_first_dates_are_not_guessed() {
        let err = read_matrix_csv("Date,X\n01-02-2020,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MatrixError::BadDate { line: 2, .. }));
    }
}
