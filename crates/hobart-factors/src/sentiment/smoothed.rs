//! Smoothed Sentiment Factor
//!
//! Trailing simple moving average of the daily bullish-minus-bearish
//! message sentiment score. Smoothing over a few sessions dampens the
//! day-to-day noise in message volume.

use hobart_data::ObservationField;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::traits::{ConfigurableFactor, Factor, FactorError};

/// Configuration for the SmoothedSentiment factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothedSentimentConfig {
    /// Moving average window in sessions (default: 3)
    pub window: usize,
}

impl Default for SmoothedSentimentConfig {
    fn default() -> Self {
        Self { window: 3 }
    }
}

/// SmoothedSentiment computes the trailing mean of `bull_minus_bear`
#[derive(Debug)]
pub struct SmoothedSentimentFactor {
    config: SmoothedSentimentConfig,
}

impl Factor for SmoothedSentimentFactor {
    fn name(&self) -> &str {
        "smoothed_sentiment"
    }

    fn field(&self) -> ObservationField {
        ObservationField::BullMinusBear
    }

    fn window(&self) -> usize {
        self.config.window
    }

    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame, FactorError> {
        let window = self.config.window;

        // min_periods = window: a single missing session voids the average
        let result = data
            .sort(["symbol", "day"], Default::default())
            .with_columns([col("value")
                .rolling_mean(RollingOptionsFixedWindow {
                    window_size: window,
                    min_periods: window,
                    ..Default::default()
                })
                .over([col("symbol")])
                .alias("score")])
            .select([col("symbol"), col("day"), col("score")]);

        Ok(result)
    }
}

impl ConfigurableFactor for SmoothedSentimentFactor {
    type Config = SmoothedSentimentConfig;

    fn with_config(config: Self::Config) -> Result<Self, FactorError> {
        if config.window == 0 {
            return Err(FactorError::InvalidWindow {
                factor: "smoothed_sentiment".to_string(),
                reason: "window must be at least 1".to_string(),
            });
        }
        Ok(Self { config })
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for SmoothedSentimentFactor {
    fn default() -> Self {
        Self {
            config: SmoothedSentimentConfig::default(),
        }
    }
}
