//! Cross-sectional z-scoring.

use hobart_factors::FactorPanel;
use ndarray::Array1;

/// Relative spread below which a panel is treated as having zero variance.
///
/// Repeated decimal values rarely average back to exactly themselves, so an
/// exact `std == 0.0` test misses constant panels.
pub const DEGENERATE_STD_TOLERANCE: f64 = 1e-12;

/// Z-score a panel over its own domain.
///
/// `z(a) = (v(a) - mean) / std` with the sample standard deviation
/// (ddof = 1). Panels with fewer than two assets, or whose standard
/// deviation is below [`DEGENERATE_STD_TOLERANCE`] relative to the largest
/// magnitude, map every asset to 0. Gaps are carried over.
pub fn zscore(panel: &FactorPanel) -> FactorPanel {
    let values = Array1::from(panel.values());
    let n = values.len();

    if n < 2 {
        return zeros(panel);
    }

    let mean = values.mean().unwrap_or(0.0);
    let std = values.std(1.0);
    let scale = values.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));

    if !std.is_finite() || std <= DEGENERATE_STD_TOLERANCE * scale {
        tracing::debug!(factor = panel.name(), n, std, "zero-variance panel, z-scores set to 0");
        return zeros(panel);
    }

    rebuild(panel, panel.iter().map(|(a, v)| (a.clone(), (v - mean) / std)))
}

fn zeros(panel: &FactorPanel) -> FactorPanel {
    rebuild(panel, panel.assets().map(|a| (a.clone(), 0.0)))
}

fn rebuild<I>(panel: &FactorPanel, values: I) -> FactorPanel
where
    I: IntoIterator<Item = (hobart_data::Asset, f64)>,
{
    FactorPanel::from_values(panel.name(), panel.date(), values).with_gaps_of(panel)
}
