#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constraints;
pub mod error;
pub mod optimizer;
pub mod target;

// Re-export main types
pub use constraints::{Constraint, ConstraintSet, ConstraintSetBuilder, Violation};
pub use error::{ConstraintError, OptimizeError};
pub use optimizer::{Optimization, Optimizer, SolverConfig};
pub use target::TargetPortfolio;
