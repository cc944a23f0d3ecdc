//! Target portfolio produced by the optimizer.

use hobart_data::{Asset, CurrentPortfolio};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Asset → target weight as a fraction of NAV. Absent assets are 0.
///
/// Held assets that are being liquidated are kept with an explicit 0 so the
/// exit is visible downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetPortfolio {
    weights: BTreeMap<Asset, f64>,
}

impl TargetPortfolio {
    /// Create an empty target.
    pub const fn new() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// The target that sells every current holding.
    pub fn liquidation(current: &CurrentPortfolio) -> Self {
        current.iter().map(|(a, _)| (a.clone(), 0.0)).collect()
    }

    /// Set the weight for an asset.
    pub fn set(&mut self, asset: Asset, weight: f64) {
        self.weights.insert(asset, weight);
    }

    /// Weight for an asset, 0 when absent.
    pub fn weight(&self, asset: &Asset) -> f64 {
        self.weights.get(asset).copied().unwrap_or(0.0)
    }

    /// Iterate `(asset, weight)` in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&Asset, f64)> {
        self.weights.iter().map(|(a, w)| (a, *w))
    }

    /// Number of entries, including explicit zeros.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// The underlying map.
    pub const fn as_map(&self) -> &BTreeMap<Asset, f64> {
        &self.weights
    }

    /// `Σ|w|`
    pub fn gross_exposure(&self) -> f64 {
        self.weights.values().map(|w| w.abs()).sum()
    }

    /// `Σw`
    pub fn net_exposure(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Largest absolute weight.
    pub fn max_abs_weight(&self) -> f64 {
        self.weights
            .values()
            .map(|w| w.abs())
            .fold(0.0, |acc, w| if w.is_nan() || w > acc { w } else { acc })
    }

    /// Number of strictly positive weights.
    pub fn long_count(&self) -> usize {
        self.weights.values().filter(|w| **w > 0.0).count()
    }

    /// Number of strictly negative weights.
    pub fn short_count(&self) -> usize {
        self.weights.values().filter(|w| **w < 0.0).count()
    }

    /// `Σ|w(a) - current(a)|` over the union of target and current assets.
    pub fn turnover_from(&self, current: &CurrentPortfolio) -> f64 {
        let assets: BTreeSet<&Asset> = self
            .weights
            .keys()
            .chain(current.iter().map(|(a, _)| a))
            .collect();
        assets
            .into_iter()
            .map(|a| (self.weight(a) - current.weight(a)).abs())
            .sum()
    }

    /// The holdings this target becomes once executed. Zero weights are dropped.
    pub fn to_current(&self) -> CurrentPortfolio {
        self.weights
            .iter()
            .filter(|(_, w)| **w != 0.0)
            .map(|(a, w)| (a.clone(), *w))
            .collect()
    }
}

impl FromIterator<(Asset, f64)> for TargetPortfolio {
    fn from_iter<I: IntoIterator<Item = (Asset, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}
