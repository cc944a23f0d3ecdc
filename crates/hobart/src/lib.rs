#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod strategy;

// Re-export main types from sub-crates
pub use hobart_data as data;
pub use hobart_factors as factors;
pub use hobart_optimize as optimize;
pub use hobart_output as output;
pub use hobart_signal as signal;

pub use config::StrategyConfig;
pub use error::{ConfigError, RebalanceError};
pub use strategy::{Rebalance, RebalanceStatus, Strategy};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RebalanceStatus::Optimal.to_string(), "optimal");
        assert_eq!(RebalanceStatus::NoSignal.to_string(), "no_signal");
    }
}
