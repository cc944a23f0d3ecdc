//! Strategy configuration.
//!
//! Every field is optional in the JSON file; missing fields take the
//! defaults below.
//!
//! ```json
//! {
//!   "max_leverage": 1.0,
//!   "max_position_size": 0.015,
//!   "max_turnover": 0.95,
//!   "sentiment_window": 3,
//!   "returns_window": 5,
//!   "sentiment_weight": 0.65,
//!   "returns_weight": 0.35,
//!   "selection_low_percentile": 10.0,
//!   "selection_high_percentile": 90.0,
//!   "dollar_neutral": true,
//!   "solver": { "max_iterations": 200, "tolerance": 1e-6, "zero_threshold": 1e-9 }
//! }
//! ```

use hobart_factors::FactorEngine;
use hobart_factors::momentum::RETURNS_LOOKBACK_DAYS;
use hobart_optimize::{ConstraintError, ConstraintSet, ConstraintSetBuilder, SolverConfig};
use hobart_signal::CombinerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Parameters of the strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Gross exposure cap (default: 1.0)
    pub max_leverage: f64,
    /// Per-asset absolute weight cap (default: 0.015)
    pub max_position_size: f64,
    /// One-way turnover cap per rebalance (default: 0.95)
    pub max_turnover: f64,
    /// Sessions averaged by the sentiment factor (default: 3)
    pub sentiment_window: usize,
    /// Sessions spanned by the returns factor (default: 5)
    pub returns_window: usize,
    /// Weight on the sentiment z-score (default: 0.65)
    pub sentiment_weight: f64,
    /// Weight on the returns z-score, entered negatively (default: 0.35)
    pub returns_weight: f64,
    /// Lower selection percentile (default: 10)
    pub selection_low_percentile: f64,
    /// Upper selection percentile (default: 90)
    pub selection_high_percentile: f64,
    /// Pin net exposure to 0 (default: true)
    pub dollar_neutral: bool,
    /// Solver budget and tolerances
    pub solver: SolverConfig,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        let combiner = CombinerConfig::default();
        Self {
            max_leverage: 1.0,
            max_position_size: 0.015,
            max_turnover: 0.95,
            sentiment_window: 3,
            returns_window: RETURNS_LOOKBACK_DAYS,
            sentiment_weight: combiner.sentiment_weight,
            returns_weight: combiner.returns_weight,
            selection_low_percentile: combiner.low_percentile,
            selection_high_percentile: combiner.high_percentile,
            dollar_neutral: true,
            solver: SolverConfig::default(),
        }
    }
}

impl StrategyConfig {
    /// Parse a config from JSON. Does not validate.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file. Does not validate.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check every parameter before any computation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.combiner_config().validate()?;
        self.factor_engine()?;
        self.constraint_set()?;
        self.solver.validate()?;
        Ok(())
    }

    /// Signal combiner parameters.
    pub const fn combiner_config(&self) -> CombinerConfig {
        CombinerConfig {
            sentiment_weight: self.sentiment_weight,
            returns_weight: self.returns_weight,
            low_percentile: self.selection_low_percentile,
            high_percentile: self.selection_high_percentile,
        }
    }

    /// Factor engine with the configured windows.
    pub fn factor_engine(&self) -> Result<FactorEngine, ConfigError> {
        Ok(FactorEngine::new(self.sentiment_window, self.returns_window)?)
    }

    /// Constraint set from the configured bounds.
    pub fn constraint_set(&self) -> Result<ConstraintSet, ConstraintError> {
        let mut builder = ConstraintSetBuilder::new()
            .position_bound(self.max_position_size)
            .gross_exposure(self.max_leverage)
            .turnover(self.max_turnover);
        if self.dollar_neutral {
            builder = builder.dollar_neutral();
        }
        builder.build()
    }
}
