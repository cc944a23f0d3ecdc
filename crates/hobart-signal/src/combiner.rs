//! The sentiment / reversal signal combiner.

use chrono::NaiveDate;
use hobart_factors::{FactorPanel, FactorPanels};
use serde::{Deserialize, Serialize};

use crate::combine::{CombinedScore, SignalTerm, combine};
use crate::error::SignalError;
use crate::normalize::zscore;
use crate::select::{SelectionMask, select, validate_percentiles};

/// Allowed distance of the weight sum from 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Configuration for the SignalCombiner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinerConfig {
    /// Weight on the sentiment z-score (default: 0.65)
    pub sentiment_weight: f64,
    /// Weight on the returns z-score, applied with a negative sign (default: 0.35)
    pub returns_weight: f64,
    /// Lower selection percentile (default: 10)
    pub low_percentile: f64,
    /// Upper selection percentile (default: 90)
    pub high_percentile: f64,
}

impl Default for CombinerConfig {
    fn default() -> Self {
        Self {
            sentiment_weight: 0.65,
            returns_weight: 0.35,
            low_percentile: 10.0,
            high_percentile: 90.0,
        }
    }
}

impl CombinerConfig {
    /// Check weights and percentiles.
    pub fn validate(&self) -> Result<(), SignalError> {
        for (name, value) in [
            ("sentiment_weight", self.sentiment_weight),
            ("returns_weight", self.returns_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SignalError::InvalidWeight { name, value });
            }
        }
        let sum = self.sentiment_weight + self.returns_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SignalError::WeightSum(sum));
        }
        validate_percentiles(self.low_percentile, self.high_percentile)
    }
}

/// Combined score and the tails selected from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Score over the intersection of the factor domains
    pub combined: CombinedScore,
    /// Assets selected from the score tails
    pub selection: SelectionMask,
}

impl Signal {
    /// Signal date.
    pub const fn date(&self) -> NaiveDate {
        self.combined.date()
    }

    /// Combined score restricted to the selection: the optimizer's alpha.
    pub fn alpha(&self) -> CombinedScore {
        self.combined.restrict(|a| self.selection.contains(a))
    }

    /// Whether no asset was selected.
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }
}

/// Builds `sentiment_weight * z_sentiment - returns_weight * z_returns` and
/// selects its tails.
#[derive(Debug, Clone)]
pub struct SignalCombiner {
    config: CombinerConfig,
}

impl Default for SignalCombiner {
    fn default() -> Self {
        Self {
            config: CombinerConfig::default(),
        }
    }
}

impl SignalCombiner {
    /// Create a combiner, validating the configuration.
    pub fn new(config: CombinerConfig) -> Result<Self, SignalError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub const fn config(&self) -> &CombinerConfig {
        &self.config
    }

    /// Z-score both raw panels and combine them.
    pub fn combine(
        &self,
        sentiment: &FactorPanel,
        returns: &FactorPanel,
    ) -> Result<CombinedScore, SignalError> {
        self.combine_normalized(&zscore(sentiment), &zscore(returns))
    }

    /// Combine panels that are already z-scored.
    pub fn combine_normalized(
        &self,
        z_sentiment: &FactorPanel,
        z_returns: &FactorPanel,
    ) -> Result<CombinedScore, SignalError> {
        combine(
            z_sentiment.date(),
            &[
                SignalTerm::new(z_sentiment, self.config.sentiment_weight),
                SignalTerm::new(z_returns, -self.config.returns_weight),
            ],
        )
    }

    /// Select the configured tails of a combined score.
    pub fn select(&self, combined: &CombinedScore) -> Result<SelectionMask, SignalError> {
        select(
            combined,
            self.config.low_percentile,
            self.config.high_percentile,
        )
    }

    /// Normalize, combine and select in one pass.
    pub fn build(&self, panels: &FactorPanels) -> Result<Signal, SignalError> {
        let combined = self.combine(&panels.sentiment, &panels.returns)?;
        let selection = self.select(&combined)?;
        tracing::debug!(
            date = %combined.date(),
            scored = combined.len(),
            selected = selection.len(),
            "built signal"
        );
        Ok(Signal {
            combined,
            selection,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hobart_data::Asset;
    use rstest::rstest;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    fn panel(name: &str, values: &[(&str, f64)]) -> FactorPanel {
        FactorPanel::from_values(
            name,
            date(),
            values.iter().map(|(s, v)| (Asset::from(*s), *v)),
        )
    }

    #[rstest]
    #[case(0.6, 0.6)]
    #[case(-0.1, 1.1)]
    #[case(f64::NAN, 0.35)]
    fn test_invalid_weights(#[case] sentiment_weight: f64, #[case] returns_weight: f64) {
        let config = CombinerConfig {
            sentiment_weight,
            returns_weight,
            ..Default::default()
        };
        assert!(SignalCombiner::new(config).is_err());
    }

    #[test]
    fn test_returns_enter_with_negative_sign() {
        let combiner = SignalCombiner::default();
        let z_sentiment = panel("s", &[("A", 0.0), ("B", 0.0)]);
        let z_returns = panel("r", &[("A", 1.0), ("B", -1.0)]);
        let combined = combiner.combine_normalized(&z_sentiment, &z_returns).unwrap();

        // Recent winners are disfavored
        assert_relative_eq!(combined.get(&Asset::from("A")).unwrap(), -0.35);
        assert_relative_eq!(combined.get(&Asset::from("B")).unwrap(), 0.35);
    }

    #[test]
    fn test_reference_scenario_selects_extremes() {
        let combiner = SignalCombiner::default();
        let z_sentiment = panel("s", &[("A", 2.0), ("B", -2.0), ("C", 0.1), ("D", -0.1)]);
        let z_returns = panel("r", &[("A", 0.0), ("B", 0.0), ("C", 0.0), ("D", 0.0)]);

        let combined = combiner.combine_normalized(&z_sentiment, &z_returns).unwrap();
        for (asset, z) in z_sentiment.iter() {
            assert_relative_eq!(combined.get(asset).unwrap(), 0.65 * z);
        }

        let signal = Signal {
            selection: combiner.select(&combined).unwrap(),
            combined,
        };
        let alpha = signal.alpha();
        assert_eq!(alpha.len(), 2);
        assert_relative_eq!(alpha.get(&Asset::from("A")).unwrap(), 1.3);
        assert_relative_eq!(alpha.get(&Asset::from("B")).unwrap(), -1.3);
    }

    #[test]
    fn test_build_from_raw_panels() {
        let combiner = SignalCombiner::default();
        let panels = FactorPanels {
            sentiment: panel(
                "smoothed_sentiment",
                &[("A", 0.9), ("B", -0.4), ("C", 0.1), ("D", 0.0), ("E", 0.2)],
            ),
            returns: panel(
                "trailing_return",
                &[("A", 0.01), ("B", 0.02), ("C", -0.01), ("D", 0.0)],
            ),
        };
        let signal = combiner.build(&panels).unwrap();

        // E has no return and drops out of the intersection
        assert_eq!(signal.combined.len(), 4);
        assert!(signal.combined.get(&Asset::from("E")).is_none());
        assert!(!signal.is_empty());
        assert_eq!(signal.date(), date());
    }
}
