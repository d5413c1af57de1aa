//! CSV export of both summary tables.
//!
//! Column names are fixed because the forecasting and plotting jobs read
//! these files by header. Ratios keep a trailing `.0` on whole numbers and
//! booleans are written `True`/`False`, which is what those readers expect.

use super::{DateSummary, InstrumentSummary};
use crate::calendar::ISO_DATE_FORMAT;
use std::io::Write;

pub const INSTRUMENT_COLUMNS: [&str; 9] = [
    "Ticker",
    "Instrument_Type",
    "First_Date",
    "Last_Date",
    "Calendar_Days",
    "Days_Adjusted",
    "Days_Unadjusted",
    "Days_Both",
    "Coverage_Ratio",
];

pub const DATE_COLUMNS: [&str; 9] = [
    "Date",
    "DayOfWeek",
    "IsWeekend",
    "Total_Instruments",
    "Available_Any",
    "Available_Unadjusted",
    "Available_Adjusted",
    "Available_Both",
    "Coverage_Ratio",
];

pub fn write_instrument_summary_csv<W: Write>(
    summaries: &[InstrumentSummary],
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(INSTRUMENT_COLUMNS)?;
    for s in summaries {
        wtr.write_record([
            s.ticker.clone(),
            s.instrument_type.to_string(),
            s.first_active_date.format(ISO_DATE_FORMAT).to_string(),
            s.last_active_date.format(ISO_DATE_FORMAT).to_string(),
            s.calendar_span_days.to_string(),
            s.days_with_adjusted.to_string(),
            s.days_with_unadjusted.to_string(),
            s.days_with_both.to_string(),
            format_ratio(s.coverage_ratio),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_date_summary_csv<W: Write>(summaries: &[DateSummary], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(DATE_COLUMNS)?;
    for s in summaries {
        wtr.write_record([
            s.date.format(ISO_DATE_FORMAT).to_string(),
            s.day_of_week.clone(),
            format_bool(s.is_weekend).to_string(),
            s.total_instruments.to_string(),
            s.available_any.to_string(),
            s.available_unadjusted_only_or_both.to_string(),
            s.available_adjusted_only_or_both.to_string(),
            s.available_both.to_string(),
            format_ratio(s.coverage_ratio),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Shortest round-trip form, always with a decimal point (`1.0`, `0.3333`).
pub fn format_ratio(ratio: f64) -> String {
    format!("{ratio:?}")
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
