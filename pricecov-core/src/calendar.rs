//! Calendar span, weekend convention and the single date parser.
//!
//! Every component that touches a date goes through [`DateParser`], so the
//! matrix builder and both summarizers agree on one calendar representation.
//! There is no format sniffing: a value either matches the configured format
//! (optionally followed by a time of day, which is discarded) or it is an
//! input defect.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

/// ISO calendar date, the format every persisted file uses.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("unparseable date '{value}' (expected format {format})")]
    UnparseableDate { value: String, format: String },

    #[error("calendar end {end} is before start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("unknown weekday name '{0}'")]
    UnknownWeekday(String),
}

/// Parses calendar dates with one explicit format and strips any time of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParser {
    format: String,
}

impl DateParser {
    pub fn new(format: impl Into<String>) -> Self {
        Self { format: format.into() }
    }

    pub fn iso() -> Self {
        Self::new(ISO_DATE_FORMAT)
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parse `value` to a day. A trailing `T`- or space-separated time is
    /// accepted and dropped, so `2020-01-01 15:30:00` and `2020-01-01`
    /// land on the same calendar day.
    pub fn parse(&self, value: &str) -> Result<NaiveDate, CalendarError> {
        let trimmed = value.trim();
        let (date, rest) = NaiveDate::parse_and_remainder(trimmed, &self.format)
            .map_err(|_| self.unparseable(value))?;

        if rest.is_empty() || is_time_of_day(rest) {
            Ok(date)
        } else {
            Err(self.unparseable(value))
        }
    }

    fn unparseable(&self, value: &str) -> CalendarError {
        CalendarError::UnparseableDate {
            value: value.to_string(),
            format: self.format.clone(),
        }
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::iso()
    }
}

fn is_time_of_day(rest: &str) -> bool {
    let Some(time) = rest.strip_prefix('T').or_else(|| rest.strip_prefix(' ')) else {
        return false;
    };
    let time = time.trim();
    TIME_FORMATS
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(time, fmt).is_ok())
}

/// Inclusive span of every calendar day (weekends and holidays included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    start: NaiveDate,
    end: NaiveDate,
}

impl Calendar {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CalendarError> {
        if end < start {
            return Err(CalendarError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the span, both endpoints included.
    pub fn len(&self) -> usize {
        // end >= start is guaranteed by the constructor
        (self.end - self.start).num_days().unsigned_abs() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if !self.contains(date) {
            return None;
        }
        Some((date - self.start).num_days().unsigned_abs() as usize)
    }

    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        if index >= self.len() {
            return None;
        }
        self.start.checked_add_days(Days::new(index as u64))
    }

    /// Every day from start to end, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.len())
    }
}

/// The exchange's weekend convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekendRule {
    days: BTreeSet<WeekdayKey>,
}

// Weekday is not Ord; key it by its Monday-based index.
type WeekdayKey = u32;

impl WeekendRule {
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            days: days.into_iter().map(|d| d.num_days_from_monday()).collect(),
        }
    }

    /// Build from English weekday names (`"Friday"`, `"sat"`, ...).
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, CalendarError> {
        let days = names
            .iter()
            .map(|name| {
                Weekday::from_str(name.as_ref().trim())
                    .map_err(|_| CalendarError::UnknownWeekday(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(days))
    }

    /// Friday and Saturday.
    pub fn friday_saturday() -> Self {
        Self::new([Weekday::Fri, Weekday::Sat])
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.days.contains(&date.weekday().num_days_from_monday())
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl Default for WeekendRule {
    fn default() -> Self {
        Self::friday_saturday()
    }
}

/// Full English weekday name, e.g. `Friday`.
pub fn day_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}
