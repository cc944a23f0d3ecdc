//! Trailing Return Factor
//!
//! Fractional price change over the trailing window of sessions. With a
//! window of W sessions this is `close[t] / close[t - (W - 1)] - 1`, i.e.
//! W prices and W - 1 daily intervals. Used with a negative weight it
//! expresses short-term reversal.

use hobart_data::ObservationField;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::traits::{ConfigurableFactor, Factor, FactorError};

/// Default lookback in sessions for the returns factor.
pub const RETURNS_LOOKBACK_DAYS: usize = 5;

/// Configuration for the TrailingReturn factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailingReturnConfig {
    /// Number of price observations in the window (default: 5)
    pub window: usize,
}

impl Default for TrailingReturnConfig {
    fn default() -> Self {
        Self {
            window: RETURNS_LOOKBACK_DAYS,
        }
    }
}

/// TrailingReturn computes the total return across the lookback window
#[derive(Debug)]
pub struct TrailingReturnFactor {
    config: TrailingReturnConfig,
}

impl Factor for TrailingReturnFactor {
    fn name(&self) -> &str {
        "trailing_return"
    }

    fn field(&self) -> ObservationField {
        ObservationField::Close
    }

    fn window(&self) -> usize {
        self.config.window
    }

    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame, FactorError> {
        let window = self.config.window;
        let lag = (window - 1) as i64;

        // 1. Sort by symbol and session
        // 2. Rolling mean with min_periods = window flags complete windows
        // 3. Ratio of the latest close to the close `lag` sessions back
        let result = data
            .sort(["symbol", "day"], Default::default())
            .with_columns([
                col("value")
                    .rolling_mean(RollingOptionsFixedWindow {
                        window_size: window,
                        min_periods: window,
                        ..Default::default()
                    })
                    .over([col("symbol")])
                    .alias("window_mean"),
                col("value")
                    .shift(lit(lag))
                    .over([col("symbol")])
                    .alias("start_value"),
            ])
            .filter(col("window_mean").is_not_null())
            .with_columns([((col("value") / col("start_value")) - lit(1.0)).alias("score")])
            .select([col("symbol"), col("day"), col("score")]);

        Ok(result)
    }
}

impl ConfigurableFactor for TrailingReturnFactor {
    type Config = TrailingReturnConfig;

    fn with_config(config: Self::Config) -> Result<Self, FactorError> {
        if config.window < 2 {
            return Err(FactorError::InvalidWindow {
                factor: "trailing_return".to_string(),
                reason: format!("window must span at least 2 prices, got {}", config.window),
            });
        }
        Ok(Self { config })
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for TrailingReturnFactor {
    fn default() -> Self {
        Self {
            config: TrailingReturnConfig::default(),
        }
    }
}
