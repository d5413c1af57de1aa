use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which of the two price archives an observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceKind {
    Adjusted,
    Unadjusted,
}

impl SourceKind {
    /// The bit this source contributes to an availability cell.
    pub fn bit(self) -> u8 {
        match self {
            SourceKind::Adjusted => AvailabilityCell::ADJUSTED_BIT,
            SourceKind::Unadjusted => AvailabilityCell::UNADJUSTED_BIT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Adjusted => "adjusted",
            SourceKind::Unadjusted => "unadjusted",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 2-bit presence flag for one (ticker, date) pair.
///
/// bit 0 = present in the adjusted archive, bit 1 = present in the
/// unadjusted archive. Only 0..=3 can be constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AvailabilityCell(u8);

impl AvailabilityCell {
    pub const ADJUSTED_BIT: u8 = 1;
    pub const UNADJUSTED_BIT: u8 = 2;
    pub const MAX: u8 = Self::ADJUSTED_BIT | Self::UNADJUSTED_BIT;

    pub const EMPTY: Self = Self(0);
    pub const BOTH: Self = Self(Self::MAX);

    pub fn from_flags(adjusted: bool, unadjusted: bool) -> Self {
        let mut value = 0;
        if adjusted {
            value |= Self::ADJUSTED_BIT;
        }
        if unadjusted {
            value |= Self::UNADJUSTED_BIT;
        }
        Self(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_present(self) -> bool {
        self.0 != 0
    }

    pub fn has_adjusted(self) -> bool {
        self.0 & Self::ADJUSTED_BIT != 0
    }

    pub fn has_unadjusted(self) -> bool {
        self.0 & Self::UNADJUSTED_BIT != 0
    }

    pub fn has_both(self) -> bool {
        self.0 == Self::MAX
    }
}

impl TryFrom<u8> for AvailabilityCell {
    type Error = CellError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            return Err(CellError::OutOfRange { value });
        }
        Ok(Self(value))
    }
}

impl From<AvailabilityCell> for u8 {
    fn from(cell: AvailabilityCell) -> u8 {
        cell.0
    }
}

impl fmt::Display for AvailabilityCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    #[error("availability cell value {value} is outside {{0,1,2,3}}")]
    OutOfRange { value: u8 },
}
