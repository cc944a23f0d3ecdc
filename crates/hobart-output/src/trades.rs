//! Orders that move the current portfolio to a target.

use hobart_data::{Asset, CurrentPortfolio};
use hobart_optimize::TargetPortfolio;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Weight change for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Traded asset
    pub asset: Asset,
    /// Weight held now
    pub current: f64,
    /// Weight after the trade
    pub target: f64,
}

impl Trade {
    /// `target - current`
    pub fn delta(&self) -> f64 {
        self.target - self.current
    }

    /// Whether nothing changes.
    pub fn is_noop(&self) -> bool {
        self.delta() == 0.0
    }
}

/// Trades over the union of target and current assets, in symbol order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeList {
    trades: Vec<Trade>,
}

impl TradeList {
    /// Diff `target` against `current`.
    pub fn between(target: &TargetPortfolio, current: &CurrentPortfolio) -> Self {
        let assets: BTreeSet<&Asset> = target
            .iter()
            .map(|(a, _)| a)
            .chain(current.iter().map(|(a, _)| a))
            .collect();

        let trades = assets
            .into_iter()
            .map(|asset| Trade {
                asset: asset.clone(),
                current: current.weight(asset),
                target: target.weight(asset),
            })
            .collect();
        Self { trades }
    }

    /// All rows, including unchanged assets.
    pub fn iter(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter()
    }

    /// Rows with a non-zero change.
    pub fn orders(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| !t.is_noop())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// `Σ|delta|`
    pub fn turnover(&self) -> f64 {
        self.trades.iter().map(|t| t.delta().abs()).sum()
    }

    /// Rows that increase weight.
    pub fn buys(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| t.delta() > 0.0)
    }

    /// Rows that decrease weight.
    pub fn sells(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| t.delta() < 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_between_covers_union() {
        let target: TargetPortfolio = [(Asset::from("A"), 0.4), (Asset::from("B"), 0.0)]
            .into_iter()
            .collect();
        let current: CurrentPortfolio = [(Asset::from("B"), -0.2), (Asset::from("C"), 0.1)]
            .into_iter()
            .collect();
        let trades = TradeList::between(&target, &current);

        let symbols: Vec<&str> = trades.iter().map(|t| t.asset.symbol()).collect();
        assert_eq!(symbols, vec!["A", "B", "C"]);
        assert_relative_eq!(trades.turnover(), 0.7, epsilon = 1e-12);
        assert_eq!(trades.buys().count(), 2);
        assert_eq!(trades.sells().count(), 1);
    }

    #[test]
    fn test_unchanged_assets_are_not_orders() {
        let target: TargetPortfolio = [(Asset::from("A"), 0.1)].into_iter().collect();
        let current: CurrentPortfolio = [(Asset::from("A"), 0.1)].into_iter().collect();
        let trades = TradeList::between(&target, &current);

        assert_eq!(trades.len(), 1);
        assert_eq!(trades.orders().count(), 0);
    }
}
