//! Run configuration.
//!
//! Calendar bounds, weekend convention, input column names and classifier
//! rules are all fixed per run and passed explicitly into each component.
//! Stored as TOML; every section is optional and falls back to the
//! defaults below.
//!
//! ```toml
//! [calendar]
//! start = "2012-10-01"
//! end = "2026-01-25"
//! weekend_days = ["Friday", "Saturday"]
//!
//! [input]
//! date_format = "%Y-%m-%d"
//! out_of_range = "reject"
//!
//! [[classifier.rules]]
//! kind = "prefix"
//! pattern = "00"
//! instrument_type = "Index"
//! ```

use crate::calendar::{Calendar, CalendarError, DateParser, WeekendRule, ISO_DATE_FORMAT};
use crate::classify::{ClassifierRule, RuleClassifier};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid calendar: {0}")]
    Calendar(#[from] CalendarError),

    #[error("weekend_days must name at least one day")]
    NoWeekendDays,

    #[error("classifier rule {index} has an empty pattern")]
    EmptyRulePattern { index: usize },

    #[error("input.{field} must not be empty")]
    EmptyColumnName { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CoverageConfig {
    pub calendar: CalendarConfig,
    pub input: InputConfig,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// First calendar day of the matrix (inclusive).
    pub start: NaiveDate,
    /// Last calendar day of the matrix (inclusive).
    pub end: NaiveDate,
    pub weekend_days: Vec<String>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2012, 10, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2026, 1, 25).unwrap_or_default(),
            weekend_days: vec!["Friday".into(), "Saturday".into()],
        }
    }
}

/// What to do with a source row dated outside the configured calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    /// Fail the build, naming the offending row.
    #[default]
    Reject,
    /// Skip the row and log how many were skipped.
    Drop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// chrono format string for the source `Date` column.
    pub date_format: String,
    pub date_column: String,
    pub ticker_column: String,
    /// Optional in the file; rows keep `None` when the column is absent.
    pub price_column: String,
    pub out_of_range: OutOfRangePolicy,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            date_format: ISO_DATE_FORMAT.to_string(),
            date_column: "Date".into(),
            ticker_column: "Ticker".into(),
            price_column: "Close".into(),
            out_of_range: OutOfRangePolicy::Reject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub rules: Vec<ClassifierRule>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { rules: RuleClassifier::default_rules() }
    }
}

impl CoverageConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calendar()?;
        if self.calendar.weekend_days.is_empty() {
            return Err(ConfigError::NoWeekendDays);
        }
        self.weekend_rule()?;

        for (field, value) in [
            ("date_format", &self.input.date_format),
            ("date_column", &self.input.date_column),
            ("ticker_column", &self.input.ticker_column),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyColumnName { field });
            }
        }

        if let Some(index) = self
            .classifier
            .rules
            .iter()
            .position(|rule| rule.pattern.trim().is_empty())
        {
            return Err(ConfigError::EmptyRulePattern { index });
        }
        Ok(())
    }

    pub fn calendar(&self) -> Result<Calendar, CalendarError> {
        Calendar::new(self.calendar.start, self.calendar.end)
    }

    pub fn weekend_rule(&self) -> Result<WeekendRule, CalendarError> {
        WeekendRule::from_names(&self.calendar.weekend_days)
    }

    pub fn date_parser(&self) -> DateParser {
        DateParser::new(self.input.date_format.clone())
    }

    pub fn classifier(&self) -> RuleClassifier {
        RuleClassifier::new(self.classifier.rules.clone())
    }
}
