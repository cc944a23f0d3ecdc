//! In-memory observation store.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::asset::{Asset, UniverseMask};
use crate::observation::ObservationField;
use crate::provider::{ObservationProvider, UniverseProvider};

type Series = BTreeMap<NaiveDate, f64>;

/// In-memory market data: daily observation series, the session calendar
/// and a dated universe schedule.
///
/// The session calendar is the set of dates seen on any inserted
/// observation (or added explicitly). A universe mask applies from its date
/// until the next mask date.
#[derive(Debug, Clone, Default)]
pub struct MarketData {
    series: HashMap<Asset, HashMap<ObservationField, Series>>,
    sessions: BTreeSet<NaiveDate>,
    universe: BTreeMap<NaiveDate, UniverseMask>,
}

impl MarketData {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation.
    ///
    /// The date always joins the session calendar. Missing and non-finite
    /// values are not stored, so the asset reads as having no observation on
    /// that session.
    pub fn insert(
        &mut self,
        date: NaiveDate,
        asset: Asset,
        field: ObservationField,
        value: Option<f64>,
    ) {
        self.sessions.insert(date);
        match value {
            Some(v) if v.is_finite() => {
                self.series
                    .entry(asset)
                    .or_default()
                    .entry(field)
                    .or_default()
                    .insert(date, v);
            }
            Some(v) => {
                tracing::debug!(%asset, %field, %date, value = v, "dropping non-finite observation");
            }
            None => {}
        }
    }

    /// Add a trading session with no observations.
    pub fn add_session(&mut self, date: NaiveDate) {
        self.sessions.insert(date);
    }

    /// Replace the universe mask effective from `date`.
    pub fn set_universe(&mut self, date: NaiveDate, mask: UniverseMask) {
        self.universe.insert(date, mask);
    }

    /// Add a single asset to the universe mask effective from `date`.
    pub fn add_to_universe(&mut self, date: NaiveDate, asset: Asset) {
        self.universe.entry(date).or_default().insert(asset);
    }

    /// Whether any universe mask has been loaded.
    pub fn has_universe(&self) -> bool {
        !self.universe.is_empty()
    }

    /// All assets with at least one stored observation.
    pub fn assets(&self) -> BTreeSet<Asset> {
        self.series.keys().cloned().collect()
    }

    /// A mask containing every asset with stored observations.
    pub fn all_assets_mask(&self) -> UniverseMask {
        self.series.keys().cloned().collect()
    }

    /// Iterate the session calendar in ascending order.
    pub fn sessions(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.sessions.iter().copied()
    }

    /// Most recent session, if any.
    pub fn last_session(&self) -> Option<NaiveDate> {
        self.sessions.last().copied()
    }

    /// Number of stored (finite) observations.
    pub fn observation_count(&self) -> usize {
        self.series
            .values()
            .flat_map(|fields| fields.values())
            .map(BTreeMap::len)
            .sum()
    }
}

impl ObservationProvider for MarketData {
    fn observation(&self, asset: &Asset, field: ObservationField, date: NaiveDate) -> Option<f64> {
        self.series.get(asset)?.get(&field)?.get(&date).copied()
    }

    fn sessions_ending(&self, date: NaiveDate, count: usize) -> Vec<NaiveDate> {
        let mut sessions: Vec<NaiveDate> =
            self.sessions.range(..=date).rev().take(count).copied().collect();
        sessions.reverse();
        sessions
    }
}

impl UniverseProvider for MarketData {
    fn universe_mask(&self, date: NaiveDate) -> UniverseMask {
        self.universe
            .range(..=date)
            .next_back()
            .map(|(_, mask)| mask.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_sessions_ending_is_inclusive_and_ascending() {
        let mut data = MarketData::new();
        for d in [2, 3, 4, 5, 8] {
            data.add_session(day(d));
        }

        assert_eq!(data.sessions_ending(day(5), 3), vec![day(3), day(4), day(5)]);
        // A non-session date ends the window at the previous session
        assert_eq!(data.sessions_ending(day(7), 2), vec![day(4), day(5)]);
        // Short calendar
        assert_eq!(data.sessions_ending(day(3), 5), vec![day(2), day(3)]);
    }

    #[test]
    fn test_missing_and_non_finite_values_are_not_stored() {
        let mut data = MarketData::new();
        let asset = Asset::from("A");
        data.insert(day(2), asset.clone(), ObservationField::Close, Some(10.0));
        data.insert(day(3), asset.clone(), ObservationField::Close, None);
        data.insert(day(4), asset.clone(), ObservationField::Close, Some(f64::NAN));

        assert_eq!(data.observation(&asset, ObservationField::Close, day(2)), Some(10.0));
        assert_eq!(data.observation(&asset, ObservationField::Close, day(3)), None);
        assert_eq!(data.observation(&asset, ObservationField::Close, day(4)), None);
        assert_eq!(data.sessions().count(), 3);
        assert_eq!(data.observation_count(), 1);
    }

    #[test]
    fn test_universe_mask_carries_forward() {
        let mut data = MarketData::new();
        data.add_to_universe(day(2), Asset::from("A"));
        data.add_to_universe(day(9), Asset::from("B"));

        assert!(data.universe_mask(day(1)).is_empty());
        assert!(data.universe_mask(day(5)).contains(&Asset::from("A")));
        let later = data.universe_mask(day(10));
        assert!(later.contains(&Asset::from("B")));
        assert!(!later.contains(&Asset::from("A")));
    }
}
