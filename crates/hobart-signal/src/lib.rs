#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod combine;
pub mod combiner;
pub mod error;
pub mod normalize;
pub mod select;

pub use combine::{CombinedScore, SignalTerm, combine};
pub use combiner::{CombinerConfig, Signal, SignalCombiner};
pub use error::SignalError;
pub use normalize::zscore;
pub use select::{SelectionMask, percentile, select};
