//! Error types for strategy configuration and rebalancing.

use hobart_factors::FactorError;
use hobart_optimize::{ConstraintError, OptimizeError};
use hobart_signal::SignalError;
use thiserror::Error;

/// Invalid strategy configuration, raised before any computation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for the schema
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Bad factor window
    #[error("Factor config error: {0}")]
    Factor(#[from] FactorError),

    /// Bad weights or percentiles
    #[error("Signal config error: {0}")]
    Signal(#[from] SignalError),

    /// Bad constraint bounds or solver settings
    #[error("Constraint config error: {0}")]
    Constraint(#[from] ConstraintError),
}

/// Failures of a rebalance.
#[derive(Debug, Error)]
pub enum RebalanceError {
    /// Strategy configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Factor computation failed
    #[error("Factor computation failed: {0}")]
    Factor(#[from] FactorError),

    /// Signal construction failed
    #[error("Signal construction failed: {0}")]
    Signal(#[from] SignalError),

    /// Optimization ended without a certified target
    #[error(transparent)]
    Optimize(#[from] OptimizeError),
}

impl RebalanceError {
    /// Whether the same rebalance may succeed on the next cycle.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Optimize(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Whether no portfolio satisfies the constraints.
    pub const fn is_infeasible(&self) -> bool {
        matches!(self, Self::Optimize(OptimizeError::Infeasible(_)))
    }
}
