//! Holdings before a rebalance.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::asset::Asset;

/// Signed portfolio weights held before the rebalance.
///
/// Weights are fractions of portfolio value; shorts are negative. An asset
/// that is not present is held at zero. The rebalance core only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrentPortfolio {
    weights: BTreeMap<Asset, f64>,
}

impl CurrentPortfolio {
    /// An empty (all cash) portfolio.
    pub const fn new() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Weight held in `asset`, or 0 when not held.
    pub fn weight(&self, asset: &Asset) -> f64 {
        self.weights.get(asset).copied().unwrap_or(0.0)
    }

    /// Whether `asset` carries a non-zero position.
    pub fn holds(&self, asset: &Asset) -> bool {
        self.weight(asset) != 0.0
    }

    /// Iterate holdings in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&Asset, f64)> {
        self.weights.iter().map(|(a, w)| (a, *w))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the portfolio has no entries.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of absolute weights.
    pub fn gross_exposure(&self) -> f64 {
        self.weights.values().map(|w| w.abs()).sum()
    }

    /// Sum of signed weights.
    pub fn net_exposure(&self) -> f64 {
        self.weights.values().sum()
    }
}

impl FromIterator<(Asset, f64)> for CurrentPortfolio {
    fn from_iter<I: IntoIterator<Item = (Asset, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<Asset, f64>> for CurrentPortfolio {
    fn from(weights: BTreeMap<Asset, f64>) -> Self {
        Self { weights }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_missing_asset_has_zero_weight() {
        let portfolio: CurrentPortfolio = [(Asset::from("A"), 0.25)].into_iter().collect();
        assert_eq!(portfolio.weight(&Asset::from("A")), 0.25);
        assert_eq!(portfolio.weight(&Asset::from("Z")), 0.0);
        assert!(!portfolio.holds(&Asset::from("Z")));
    }

    #[test]
    fn test_exposures() {
        let portfolio: CurrentPortfolio = [
            (Asset::from("A"), 0.3),
            (Asset::from("B"), -0.2),
            (Asset::from("C"), -0.1),
        ]
        .into_iter()
        .collect();
        assert_relative_eq!(portfolio.gross_exposure(), 0.6);
        assert_relative_eq!(portfolio.net_exposure(), 0.0, epsilon = 1e-12);
    }
}
