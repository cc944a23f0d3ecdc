//! Asset identifiers and the per-day eligibility mask.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{DataError, Result};

/// Identifier of a tradable instrument.
///
/// Assets order lexicographically by symbol. Every map and set keyed by
/// `Asset` in Hobart is a `BTree*`, so iteration order (and therefore the
/// optimizer's variable order) is the symbol order.
#[derive(
    Debug, Display, From, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Asset(String);

impl Asset {
    /// Create an asset from a symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Create an asset from untrusted input, trimming whitespace and
    /// rejecting empty symbols.
    pub fn parse(symbol: &str) -> Result<Self> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(DataError::InvalidSymbol(symbol.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The symbol string.
    pub fn symbol(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Asset {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

impl AsRef<str> for Asset {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Set of assets eligible for trading on one date.
///
/// Supplied by the universe filter and consumed read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseMask {
    assets: BTreeSet<Asset>,
}

impl UniverseMask {
    /// Create an empty mask.
    pub const fn new() -> Self {
        Self {
            assets: BTreeSet::new(),
        }
    }

    /// Add an asset to the mask.
    pub fn insert(&mut self, asset: Asset) -> bool {
        self.assets.insert(asset)
    }

    /// Check whether an asset is eligible.
    pub fn contains(&self, asset: &Asset) -> bool {
        self.assets.contains(asset)
    }

    /// Number of eligible assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether no asset is eligible.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Iterate eligible assets in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }
}

impl FromIterator<Asset> for UniverseMask {
    fn from_iter<I: IntoIterator<Item = Asset>>(iter: I) -> Self {
        Self {
            assets: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a UniverseMask {
    type Item = &'a Asset;
    type IntoIter = std::collections::btree_set::Iter<'a, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_ordering_is_lexicographic() {
        let mut assets = [Asset::from("MSFT"), Asset::from("AAPL"), Asset::from("GOOG")];
        assets.sort();
        let symbols: Vec<&str> = assets.iter().map(Asset::symbol).collect();
        assert_eq!(symbols, vec!["AAPL", "GOOG", "MSFT"]);
    }

    #[test]
    fn test_asset_display() {
        assert_eq!(Asset::from("AAPL").to_string(), "AAPL");
    }

    #[test]
    fn test_asset_parse_trims_and_rejects_empty() {
        assert_eq!(Asset::parse("  IBM ").unwrap(), Asset::from("IBM"));
        assert!(Asset::parse("   ").is_err());
    }

    #[test]
    fn test_universe_mask_dedups() {
        let mask: UniverseMask = ["B", "A", "B"].into_iter().map(Asset::from).collect();
        assert_eq!(mask.len(), 2);
        assert!(mask.contains(&Asset::from("A")));
        assert!(!mask.contains(&Asset::from("C")));
        let first = mask.iter().next().unwrap();
        assert_eq!(first.symbol(), "A");
    }
}
