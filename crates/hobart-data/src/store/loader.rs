//! CSV loaders for observations, universe membership and holdings.
//!
//! Formats (with header row):
//! - observations: `date,symbol,field,value` (empty value = missing)
//! - universe: `date,symbol`
//! - holdings: `symbol,weight`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use super::memory::MarketData;
use crate::asset::Asset;
use crate::error::{DataError, Result};
use crate::observation::ObservationField;
use crate::portfolio::CurrentPortfolio;

/// One row of an observations file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Session date
    pub date: NaiveDate,
    /// Asset symbol
    pub symbol: String,
    /// Field name (see [`ObservationField`])
    pub field: String,
    /// Observed value, empty when missing
    pub value: Option<f64>,
}

/// One row of a universe membership file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseRecord {
    /// Date the membership applies from
    pub date: NaiveDate,
    /// Asset symbol
    pub symbol: String,
}

/// One row of a holdings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingRecord {
    /// Asset symbol
    pub symbol: String,
    /// Signed portfolio weight
    pub weight: f64,
}

impl MarketData {
    /// Load observations from CSV into this store. Returns rows read.
    pub fn load_observations<R: Read>(&mut self, reader: R) -> Result<usize> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut rows = 0;
        for record in rdr.deserialize() {
            let record: ObservationRecord = record?;
            let asset = Asset::parse(&record.symbol)?;
            let field: ObservationField = record.field.parse()?;
            self.insert(record.date, asset, field, record.value);
            rows += 1;
        }
        tracing::debug!(rows, "loaded observations");
        Ok(rows)
    }

    /// Load universe membership from CSV into this store. Returns rows read.
    pub fn load_universe<R: Read>(&mut self, reader: R) -> Result<usize> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut rows = 0;
        for record in rdr.deserialize() {
            let record: UniverseRecord = record?;
            self.add_to_universe(record.date, Asset::parse(&record.symbol)?);
            rows += 1;
        }
        tracing::debug!(rows, "loaded universe membership");
        Ok(rows)
    }

    /// Build a store from an observations file and an optional universe file.
    pub fn from_paths(observations: &Path, universe: Option<&Path>) -> Result<Self> {
        let mut data = Self::new();
        data.load_observations(std::fs::File::open(observations)?)?;
        if let Some(path) = universe {
            data.load_universe(std::fs::File::open(path)?)?;
        }
        Ok(data)
    }
}

/// Read holdings from CSV.
///
/// Lines starting with `#` are skipped and extra columns are ignored, so an
/// exported target can be read back as the next day's holdings. Zero weights
/// are not holdings. Rejects non-finite weights and duplicate symbols.
pub fn read_holdings<R: Read>(reader: R) -> Result<CurrentPortfolio> {
    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .from_reader(reader);
    let mut weights = BTreeMap::new();
    for record in rdr.deserialize() {
        let record: HoldingRecord = record?;
        let asset = Asset::parse(&record.symbol)?;
        if !record.weight.is_finite() {
            return Err(DataError::InvalidValue {
                symbol: record.symbol,
                reason: format!("non-finite weight {}", record.weight),
            });
        }
        if weights.insert(asset, record.weight).is_some() {
            return Err(DataError::DuplicateHolding(record.symbol));
        }
    }
    weights.retain(|_, w| *w != 0.0);
    Ok(CurrentPortfolio::from(weights))
}

/// Read holdings from a CSV file path.
pub fn read_holdings_path(path: &Path) -> Result<CurrentPortfolio> {
    read_holdings(std::fs::File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ObservationProvider, UniverseProvider};

    #[test]
    fn test_load_observations() {
        let csv = "date,symbol,field,value\n\
                   2024-01-02,AAPL,close,185.5\n\
                   2024-01-02,AAPL,bull_minus_bear,0.4\n\
                   2024-01-03,AAPL,close,\n";
        let mut data = MarketData::new();
        let rows = data.load_observations(csv.as_bytes()).unwrap();

        assert_eq!(rows, 3);
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let aapl = Asset::from("AAPL");
        assert_eq!(data.observation(&aapl, ObservationField::Close, d2), Some(185.5));
        assert_eq!(data.observation(&aapl, ObservationField::BullMinusBear, d2), Some(0.4));
        assert_eq!(data.observation(&aapl, ObservationField::Close, d3), None);
        assert_eq!(data.sessions_ending(d3, 10), vec![d2, d3]);
    }

    #[test]
    fn test_load_observations_rejects_unknown_field() {
        let csv = "date,symbol,field,value\n2024-01-02,AAPL,volume,100\n";
        let mut data = MarketData::new();
        let err = data.load_observations(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::UnknownField(_)));
    }

    #[test]
    fn test_load_universe() {
        let csv = "date,symbol\n2024-01-02,AAPL\n2024-01-02,MSFT\n";
        let mut data = MarketData::new();
        data.load_universe(csv.as_bytes()).unwrap();
        let mask = data.universe_mask(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(mask.len(), 2);
    }

    #[test]
    fn test_read_holdings() {
        let csv = "symbol,weight\nAAPL,0.01\nMSFT,-0.01\n";
        let holdings = read_holdings(csv.as_bytes()).unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings.weight(&Asset::from("MSFT")), -0.01);
    }

    #[test]
    fn test_read_holdings_rejects_duplicates() {
        let csv = "symbol,weight\nAAPL,0.01\nAAPL,0.02\n";
        let err = read_holdings(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::DuplicateHolding(s) if s == "AAPL"));
    }

    #[test]
    fn test_read_holdings_from_exported_target() {
        let csv = "# Date: 2024-03-08\n\
                   symbol,weight,current,trade\n\
                   AAPL,0.015,0.01,0.005\n\
                   MSFT,0,-0.01,0.01\n";
        let holdings = read_holdings(csv.as_bytes()).unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings.weight(&Asset::from("AAPL")), 0.015);
        assert!(!holdings.holds(&Asset::from("MSFT")));
    }
}
