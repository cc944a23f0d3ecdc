#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod momentum;
pub mod panel;
pub mod registry;
pub mod sentiment;
pub mod traits;

pub use engine::{FactorEngine, FactorPanels, compute_panel};
pub use panel::{DataGap, FactorPanel};
pub use traits::{ConfigurableFactor, Factor, FactorError};

// Re-export registry types for convenience
pub use registry::{FactorCategory, FactorInfo, available_factors, get_factor_info};
