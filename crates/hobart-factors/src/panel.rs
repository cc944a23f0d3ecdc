//! Dated cross-sections of factor values.

use chrono::NaiveDate;
use hobart_data::Asset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An asset left out of a panel because its observation window was
/// incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataGap {
    /// Asset that was excluded
    pub asset: Asset,
    /// Factor the gap applies to
    pub factor: String,
    /// Observations found in the window
    pub available: usize,
    /// Observations the window requires
    pub required: usize,
}

impl fmt::Display for DataGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lacks history for {} ({}/{} observations)",
            self.asset, self.factor, self.available, self.required
        )
    }
}

/// Asset → value for one factor on one date.
///
/// The domain holds only assets with a complete, finite window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorPanel {
    name: String,
    date: NaiveDate,
    values: BTreeMap<Asset, f64>,
    gaps: Vec<DataGap>,
}

impl FactorPanel {
    /// Create an empty panel.
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
            values: BTreeMap::new(),
            gaps: Vec::new(),
        }
    }

    /// Create a panel from precomputed values. Non-finite values are dropped.
    pub fn from_values<I>(name: impl Into<String>, date: NaiveDate, values: I) -> Self
    where
        I: IntoIterator<Item = (Asset, f64)>,
    {
        let mut panel = Self::new(name, date);
        panel
            .values
            .extend(values.into_iter().filter(|(_, v)| v.is_finite()));
        panel
    }

    /// Copy the data gaps recorded on `other` onto this panel.
    pub fn with_gaps_of(mut self, other: &Self) -> Self {
        self.gaps = other.gaps.clone();
        self
    }

    pub(crate) fn insert(&mut self, asset: Asset, value: f64) {
        self.values.insert(asset, value);
    }

    pub(crate) fn push_gap(&mut self, gap: DataGap) {
        self.gaps.push(gap);
    }

    /// Factor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Panel date.
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Value for an asset, if in the domain.
    pub fn get(&self, asset: &Asset) -> Option<f64> {
        self.values.get(asset).copied()
    }

    /// Whether the asset is in the domain.
    pub fn contains(&self, asset: &Asset) -> bool {
        self.values.contains_key(asset)
    }

    /// Domain size.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the domain is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(asset, value)` in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&Asset, f64)> {
        self.values.iter().map(|(a, v)| (a, *v))
    }

    /// Assets in the domain, in symbol order.
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.values.keys()
    }

    /// Values in symbol order.
    pub fn values(&self) -> Vec<f64> {
        self.values.values().copied().collect()
    }

    /// Assets excluded for insufficient history.
    pub fn gaps(&self) -> &[DataGap] {
        &self.gaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_drops_non_finite() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let panel = FactorPanel::from_values(
            "test",
            date,
            [
                (Asset::from("A"), 1.0),
                (Asset::from("B"), f64::NAN),
                (Asset::from("C"), f64::INFINITY),
            ],
        );
        assert_eq!(panel.len(), 1);
        assert!(panel.contains(&Asset::from("A")));
        assert!(!panel.contains(&Asset::from("B")));
        assert_eq!(panel.date(), date);
        assert_eq!(panel.name(), "test");
    }

    #[test]
    fn test_gap_display() {
        let gap = DataGap {
            asset: Asset::from("XYZ"),
            factor: "trailing_return".to_string(),
            available: 3,
            required: 5,
        };
        assert_eq!(
            gap.to_string(),
            "XYZ lacks history for trailing_return (3/5 observations)"
        );
    }
}
