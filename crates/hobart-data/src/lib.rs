#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod asset;
pub mod error;
pub mod observation;
pub mod portfolio;
pub mod provider;
pub mod store;

pub use asset::{Asset, UniverseMask};
pub use error::{DataError, Result};
pub use observation::ObservationField;
pub use portfolio::CurrentPortfolio;
pub use provider::{ObservationProvider, PortfolioProvider, UniverseProvider};
pub use store::MarketData;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
