//! Interfaces to the external collaborators the rebalance core reads from.
//!
//! The universe filter, the observation store with its trading calendar,
//! and the holdings source all live outside Hobart. These traits are the
//! whole contract; [`crate::store::MarketData`] is an in-memory
//! implementation for files and tests.

use chrono::NaiveDate;

use crate::asset::{Asset, UniverseMask};
use crate::observation::ObservationField;
use crate::portfolio::CurrentPortfolio;

/// Supplies the set of eligible assets per day.
pub trait UniverseProvider {
    /// Eligible assets on `date`.
    fn universe_mask(&self, date: NaiveDate) -> UniverseMask;
}

/// Supplies raw daily observations and the trading calendar.
pub trait ObservationProvider {
    /// Value of `field` for `asset` on `date`, if one was recorded.
    fn observation(&self, asset: &Asset, field: ObservationField, date: NaiveDate) -> Option<f64>;

    /// The `count` most recent trading sessions ending at `date` (inclusive
    /// when `date` is a session), in ascending order.
    ///
    /// Returns fewer than `count` sessions when the calendar is shorter.
    fn sessions_ending(&self, date: NaiveDate, count: usize) -> Vec<NaiveDate>;
}

/// Supplies the holdings in place before a rebalance.
pub trait PortfolioProvider {
    /// Current signed weights.
    fn current_weights(&self) -> CurrentPortfolio;
}

impl<T: UniverseProvider + ?Sized> UniverseProvider for &T {
    fn universe_mask(&self, date: NaiveDate) -> UniverseMask {
        (**self).universe_mask(date)
    }
}

impl<T: ObservationProvider + ?Sized> ObservationProvider for &T {
    fn observation(&self, asset: &Asset, field: ObservationField, date: NaiveDate) -> Option<f64> {
        (**self).observation(asset, field, date)
    }

    fn sessions_ending(&self, date: NaiveDate, count: usize) -> Vec<NaiveDate> {
        (**self).sessions_ending(date, count)
    }
}

impl<T: PortfolioProvider + ?Sized> PortfolioProvider for &T {
    fn current_weights(&self) -> CurrentPortfolio {
        (**self).current_weights()
    }
}

impl PortfolioProvider for CurrentPortfolio {
    fn current_weights(&self) -> CurrentPortfolio {
        self.clone()
    }
}

impl UniverseProvider for UniverseMask {
    fn universe_mask(&self, _date: NaiveDate) -> UniverseMask {
        self.clone()
    }
}
