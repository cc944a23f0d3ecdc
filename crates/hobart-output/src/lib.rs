#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod trades;

pub use export::{
    ExportError, ExportFormat, Exporter, FactorExposureExport, HoldingExport, RebalanceExport,
};
pub use report::{RebalanceReport, ReportBuilder, ReportError};
pub use trades::{Trade, TradeList};
