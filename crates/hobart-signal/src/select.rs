//! Percentile-based selection of the score tails.

use hobart_data::Asset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::combine::CombinedScore;
use crate::error::SignalError;

/// Percentile of ascending-sorted values by linear interpolation between
/// closest ranks (`rank = p / 100 * (n - 1)`), as numpy's default.
///
/// Returns `None` for an empty slice. `p` is clamped to [0, 100].
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (p.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Assets picked from the tails of a combined score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionMask {
    assets: BTreeSet<Asset>,
    lower_cut: Option<f64>,
    upper_cut: Option<f64>,
}

impl SelectionMask {
    /// Whether the asset was selected.
    pub fn contains(&self, asset: &Asset) -> bool {
        self.assets.contains(asset)
    }

    /// Number of selected assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Selected assets in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    /// Score at the low percentile (`None` when the score was empty).
    pub const fn lower_cut(&self) -> Option<f64> {
        self.lower_cut
    }

    /// Score at the high percentile (`None` when the score was empty).
    pub const fn upper_cut(&self) -> Option<f64> {
        self.upper_cut
    }
}

/// Validate a pair of selection percentiles.
pub fn validate_percentiles(low: f64, high: f64) -> Result<(), SignalError> {
    let in_range = |p: f64| p.is_finite() && (0.0..=100.0).contains(&p);
    if !in_range(low) || !in_range(high) || low > high {
        return Err(SignalError::InvalidPercentiles { low, high });
    }
    Ok(())
}

/// Select `{a : score(a) <= P_low} ∪ {a : score(a) >= P_high}`.
///
/// Boundary ties are kept. An asset meeting both conditions appears once.
pub fn select(
    score: &CombinedScore,
    low_percentile: f64,
    high_percentile: f64,
) -> Result<SelectionMask, SignalError> {
    validate_percentiles(low_percentile, high_percentile)?;

    let mut sorted: Vec<f64> = score.iter().map(|(_, v)| v).collect();
    sorted.sort_by(f64::total_cmp);

    let (Some(lower), Some(upper)) = (
        percentile(&sorted, low_percentile),
        percentile(&sorted, high_percentile),
    ) else {
        return Ok(SelectionMask::default());
    };

    let assets = score
        .iter()
        .filter(|(_, v)| *v <= lower || *v >= upper)
        .map(|(a, _)| a.clone())
        .collect();

    Ok(SelectionMask {
        assets,
        lower_cut: Some(lower),
        upper_cut: Some(upper),
    })
}
