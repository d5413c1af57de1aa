use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Instrument category inferred from the ticker symbol alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InstrumentType {
    Index,
    TreasuryBill,
    Sukuk,
    Bond,
    MutualFund,
    Equity,
}

impl InstrumentType {
    pub const ALL: [InstrumentType; 6] = [
        InstrumentType::Index,
        InstrumentType::TreasuryBill,
        InstrumentType::Sukuk,
        InstrumentType::Bond,
        InstrumentType::MutualFund,
        InstrumentType::Equity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InstrumentType::Index => "Index",
            InstrumentType::TreasuryBill => "TreasuryBill",
            InstrumentType::Sukuk => "Sukuk",
            InstrumentType::Bond => "Bond",
            InstrumentType::MutualFund => "MutualFund",
            InstrumentType::Equity => "Equity",
        }
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentType {
    type Err = InstrumentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstrumentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InstrumentTypeError::Unknown(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum InstrumentTypeError {
    #[error("unknown instrument type '{0}'")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("treasurybill".parse::<InstrumentType>().unwrap(), InstrumentType::TreasuryBill);
        assert_eq!(" Equity ".parse::<InstrumentType>().unwrap(), InstrumentType::Equity);
        assert!("Futures".parse::<InstrumentType>().is_err());
    }

    #[test]
    fn display_matches_output_labels() {
        for t in InstrumentType::ALL {
            assert_eq!(t.to_string(), t.as_str());
        }
    }
}
