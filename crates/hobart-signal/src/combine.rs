//! Linear combination of normalized factor panels.

use chrono::NaiveDate;
use hobart_data::Asset;
use hobart_factors::FactorPanel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SignalError;

/// One weighted term of a combination. The weight is signed.
#[derive(Debug, Clone, Copy)]
pub struct SignalTerm<'a> {
    /// Normalized panel
    pub panel: &'a FactorPanel,
    /// Signed weight applied to the panel
    pub weight: f64,
}

impl<'a> SignalTerm<'a> {
    /// Create a term.
    pub const fn new(panel: &'a FactorPanel, weight: f64) -> Self {
        Self { panel, weight }
    }
}

/// Asset → combined score for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedScore {
    date: NaiveDate,
    values: BTreeMap<Asset, f64>,
}

impl CombinedScore {
    /// Build a score directly from values. Non-finite values are dropped.
    pub fn from_values<I>(date: NaiveDate, values: I) -> Self
    where
        I: IntoIterator<Item = (Asset, f64)>,
    {
        Self {
            date,
            values: values.into_iter().filter(|(_, v)| v.is_finite()).collect(),
        }
    }

    /// Score date.
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Score for an asset.
    pub fn get(&self, asset: &Asset) -> Option<f64> {
        self.values.get(asset).copied()
    }

    /// Number of scored assets.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no asset is scored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(asset, score)` in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&Asset, f64)> {
        self.values.iter().map(|(a, v)| (a, *v))
    }

    /// The underlying map.
    pub const fn as_map(&self) -> &BTreeMap<Asset, f64> {
        &self.values
    }

    /// Keep only the assets accepted by `keep`.
    pub fn restrict<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Asset) -> bool,
    {
        Self {
            date: self.date,
            values: self
                .values
                .iter()
                .filter(|(a, _)| keep(a))
                .map(|(a, v)| (a.clone(), *v))
                .collect(),
        }
    }
}

/// Combine weighted panels over the intersection of their domains.
///
/// `combined(a) = Σ weight_i * panel_i(a)` for every asset present in all
/// panels. Panels are expected to be normalized already.
pub fn combine(date: NaiveDate, terms: &[SignalTerm<'_>]) -> Result<CombinedScore, SignalError> {
    let (first, rest) = terms.split_first().ok_or(SignalError::NoFactors)?;

    let values = first.panel.iter().filter_map(|(asset, v)| {
        let mut total = first.weight * v;
        for term in rest {
            total += term.weight * term.panel.get(asset)?;
        }
        Some((asset.clone(), total))
    });

    Ok(CombinedScore::from_values(date, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

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

    #[test]
    fn test_combine_uses_domain_intersection() {
        let sentiment = panel("s", &[("A", 1.0), ("B", -1.0), ("C", 0.5)]);
        let returns = panel("r", &[("B", 2.0), ("C", -1.0), ("D", 3.0)]);

        let combined = combine(
            date(),
            &[SignalTerm::new(&sentiment, 0.65), SignalTerm::new(&returns, -0.35)],
        )
        .unwrap();

        assert_eq!(combined.len(), 2);
        assert!(combined.get(&Asset::from("A")).is_none());
        assert!(combined.get(&Asset::from("D")).is_none());
        assert_relative_eq!(combined.get(&Asset::from("B")).unwrap(), -0.65 - 0.7);
        assert_relative_eq!(combined.get(&Asset::from("C")).unwrap(), 0.325 + 0.35);
    }

    #[test]
    fn test_combine_requires_terms() {
        assert!(matches!(combine(date(), &[]), Err(SignalError::NoFactors)));
    }

    #[test]
    fn test_restrict() {
        let combined = CombinedScore::from_values(
            date(),
            [(Asset::from("A"), 1.0), (Asset::from("B"), 2.0)],
        );
        let only_b = combined.restrict(|a| a.symbol() == "B");
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b.get(&Asset::from("B")), Some(2.0));
    }
}
