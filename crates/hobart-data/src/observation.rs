//! Observation fields carried by the raw data stream.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// A named daily field in the observation stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationField {
    /// Daily bullish-minus-bearish message sentiment score
    BullMinusBear,
    /// Daily closing price
    Close,
}

impl ObservationField {
    /// All known fields.
    pub const ALL: [Self; 2] = [Self::BullMinusBear, Self::Close];

    /// Column name used in CSV files and factor frames.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BullMinusBear => "bull_minus_bear",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for ObservationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObservationField {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bull_minus_bear" | "sentiment" => Ok(Self::BullMinusBear),
            "close" | "price" => Ok(Self::Close),
            other => Err(DataError::UnknownField(other.to_string())),
        }
    }
}
