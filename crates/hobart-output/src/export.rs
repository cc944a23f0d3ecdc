//! Export of rebalance targets and factor panels.
//!
//! This module provides CSV and JSON rendering for the target portfolio with
//! its trades, and for the factor values behind a signal.

use chrono::NaiveDate;
use hobart_data::CurrentPortfolio;
use hobart_optimize::TargetPortfolio;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::trades::TradeList;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendered CSV was not UTF-8.
    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::PrettyJson => "pretty-json",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn write_csv<'a, T, I>(records: I) -> Result<String, ExportError>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Factor value for a single asset on one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FactorExposureExport {
    /// Asset symbol.
    pub symbol: String,

    /// Panel date.
    pub date: NaiveDate,

    /// Name of the factor.
    pub factor_name: String,

    /// Raw factor value.
    pub exposure: f64,

    /// Cross-sectional z-score of the value.
    pub z_score: f64,
}

impl FactorExposureExport {
    /// Create a new factor exposure export.
    pub const fn new(
        symbol: String,
        date: NaiveDate,
        factor_name: String,
        exposure: f64,
        z_score: f64,
    ) -> Self {
        Self {
            symbol,
            date,
            factor_name,
            exposure,
            z_score,
        }
    }
}

impl Exporter for Vec<FactorExposureExport> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// One row of an exported target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HoldingExport {
    /// Asset symbol.
    pub symbol: String,

    /// Target weight.
    pub weight: f64,

    /// Weight held before the rebalance.
    pub current: f64,

    /// `weight - current`.
    pub trade: f64,
}

/// Target portfolio with its trades for one rebalance date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RebalanceExport {
    /// Rebalance date.
    pub date: NaiveDate,

    /// Rebalance outcome.
    pub status: String,

    /// `Σ α w` at the target.
    pub expected_alpha: f64,

    /// One row per asset in the target or the current portfolio.
    pub holdings: Vec<HoldingExport>,
}

impl RebalanceExport {
    /// Build the export from a target and the holdings it replaces.
    pub fn new(
        date: NaiveDate,
        status: impl Into<String>,
        expected_alpha: f64,
        target: &TargetPortfolio,
        current: &CurrentPortfolio,
    ) -> Self {
        let holdings = TradeList::between(target, current)
            .iter()
            .map(|t| HoldingExport {
                symbol: t.asset.symbol().to_string(),
                weight: t.target,
                current: t.current,
                trade: t.delta(),
            })
            .collect();
        Self {
            date,
            status: status.into(),
            expected_alpha,
            holdings,
        }
    }

    /// `Σ|weight|`
    pub fn gross_exposure(&self) -> f64 {
        self.holdings.iter().map(|h| h.weight.abs()).sum()
    }

    /// `Σ weight`
    pub fn net_exposure(&self) -> f64 {
        self.holdings.iter().map(|h| h.weight).sum()
    }
}

impl Exporter for RebalanceExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut output = String::new();

                // Header information as comments
                output.push_str(&format!("# Date: {}\n", self.date));
                output.push_str(&format!("# Status: {}\n", self.status));
                output.push_str(&format!("# Gross: {}\n", self.gross_exposure()));
                output.push_str(&format!("# Net: {}\n", self.net_exposure()));

                output.push_str(&write_csv(&self.holdings)?);
                Ok(output)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hobart_data::Asset;
    use rstest::rstest;

    fn export() -> RebalanceExport {
        let target: TargetPortfolio = [(Asset::from("AAPL"), 0.5), (Asset::from("MSFT"), -0.5)]
            .into_iter()
            .collect();
        let current: CurrentPortfolio = [(Asset::from("IBM"), 0.1)].into_iter().collect();
        RebalanceExport::new(
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            "optimal",
            1.3,
            &target,
            &current,
        )
    }

    #[test]
    fn test_rebalance_export_csv() {
        let csv = export().export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "# Date: 2024-03-08");
        assert_eq!(lines[1], "# Status: optimal");
        assert_eq!(lines[4], "symbol,weight,current,trade");
        assert_eq!(lines[5], "AAPL,0.5,0.0,0.5");
        assert_eq!(lines[6], "IBM,0.0,0.1,-0.1");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_rebalance_export_json() {
        let json = export().export_to_string(ExportFormat::Json).unwrap();
        let parsed: RebalanceExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, export());
    }

    #[test]
    fn test_exposures() {
        let export = export();
        assert_eq!(export.gross_exposure(), 1.0);
        assert_eq!(export.net_exposure(), 0.0);
    }

    #[test]
    fn test_factor_exports_csv() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let rows = vec![
            FactorExposureExport::new(
                "AAPL".to_string(),
                date,
                "smoothed_sentiment".to_string(),
                0.25,
                1.1,
            ),
            FactorExposureExport::new(
                "MSFT".to_string(),
                date,
                "smoothed_sentiment".to_string(),
                -0.1,
                -1.1,
            ),
        ];

        let csv = rows.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.starts_with("symbol,date,factor_name,exposure,z_score\n"));
        assert!(csv.contains("AAPL,2024-03-08,smoothed_sentiment,0.25,1.1"));

        let pretty = rows.export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(pretty.contains("  ")); // Indentation indicates pretty format
    }

    #[rstest]
    #[case("csv", ExportFormat::Csv)]
    #[case("JSON", ExportFormat::Json)]
    #[case("pretty-json", ExportFormat::PrettyJson)]
    fn test_format_from_str(#[case] input: &str, #[case] expected: ExportFormat) {
        assert_eq!(input.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_format_from_str_rejects_unknown() {
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
