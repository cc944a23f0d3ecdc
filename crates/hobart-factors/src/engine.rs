//! Factor computation engine.
//!
//! Pulls the trailing sessions for every asset in the universe mask out of
//! an [`ObservationProvider`], lays them out as a long polars frame and runs
//! each factor's lazy computation, keeping the row for the rebalance date.

use chrono::NaiveDate;
use hobart_data::{Asset, ObservationProvider, UniverseMask};
use polars::prelude::*;
use std::collections::BTreeMap;

use crate::momentum::{TrailingReturnConfig, TrailingReturnFactor};
use crate::panel::{DataGap, FactorPanel};
use crate::sentiment::{SmoothedSentimentConfig, SmoothedSentimentFactor};
use crate::traits::{ConfigurableFactor, Factor, FactorError};

/// Compute one factor's panel for `date` over `universe`.
///
/// Assets with fewer than `factor.window()` finite observations in the
/// trailing sessions (or a non-finite score) are excluded and recorded as
/// [`DataGap`]s. A calendar shorter than the window yields an empty panel.
pub fn compute_panel<F, P>(
    factor: &F,
    date: NaiveDate,
    universe: &UniverseMask,
    provider: &P,
) -> Result<FactorPanel, FactorError>
where
    F: Factor + ?Sized,
    P: ObservationProvider + ?Sized,
{
    let window = factor.window();
    let field = factor.field();
    let mut panel = FactorPanel::new(factor.name(), date);

    if universe.is_empty() {
        return Ok(panel);
    }

    let sessions = provider.sessions_ending(date, window);

    let capacity = universe.len() * sessions.len();
    let mut symbols: Vec<&str> = Vec::with_capacity(capacity);
    let mut days: Vec<i32> = Vec::with_capacity(capacity);
    let mut values: Vec<Option<f64>> = Vec::with_capacity(capacity);
    let mut available: BTreeMap<&Asset, usize> = BTreeMap::new();

    for asset in universe {
        let mut count = 0;
        for (day, session) in sessions.iter().enumerate() {
            let value = provider
                .observation(asset, field, *session)
                .filter(|v| v.is_finite());
            count += usize::from(value.is_some());
            symbols.push(asset.symbol());
            days.push(day as i32);
            values.push(value);
        }
        available.insert(asset, count);
    }

    if sessions.len() == window {
        let data = DataFrame::new(vec![
            Column::new("symbol".into(), symbols),
            Column::new("day".into(), days),
            Column::new("value".into(), values),
        ])?;

        let last_day = (window - 1) as i32;
        let scores = factor
            .compute_scores(data.lazy())?
            .filter(col("day").eq(lit(last_day)))
            .collect()?;

        let score_symbols = scores.column("symbol")?.str()?;
        let score_values = scores.column("score")?.f64()?;
        for (symbol, score) in score_symbols.into_iter().zip(score_values.into_iter()) {
            if let (Some(symbol), Some(score)) = (symbol, score)
                && score.is_finite()
            {
                panel.insert(Asset::new(symbol), score);
            }
        }
    } else {
        tracing::debug!(
            factor = factor.name(),
            %date,
            sessions = sessions.len(),
            window,
            "calendar shorter than factor window"
        );
    }

    for (asset, count) in available {
        if !panel.contains(asset) {
            let gap = DataGap {
                asset: asset.clone(),
                factor: factor.name().to_string(),
                available: count,
                required: window,
            };
            tracing::debug!(%gap, "excluding asset from panel");
            panel.push_gap(gap);
        }
    }

    tracing::debug!(
        factor = factor.name(),
        %date,
        assets = panel.len(),
        gaps = panel.gaps().len(),
        "computed factor panel"
    );

    Ok(panel)
}

/// Both factor panels for one rebalance date.
#[derive(Debug, Clone)]
pub struct FactorPanels {
    /// Smoothed sentiment panel
    pub sentiment: FactorPanel,
    /// Trailing return panel
    pub returns: FactorPanel,
}

/// Engine computing the sentiment and reversal factors.
///
/// - Smoothed sentiment (trailing mean of `bull_minus_bear`, 3 sessions)
/// - Trailing return (5-session total return)
#[derive(Debug, Default)]
pub struct FactorEngine {
    sentiment: SmoothedSentimentFactor,
    returns: TrailingReturnFactor,
}

impl FactorEngine {
    /// Create an engine with the given windows.
    pub fn new(sentiment_window: usize, returns_window: usize) -> Result<Self, FactorError> {
        Ok(Self {
            sentiment: SmoothedSentimentFactor::with_config(SmoothedSentimentConfig {
                window: sentiment_window,
            })?,
            returns: TrailingReturnFactor::with_config(TrailingReturnConfig {
                window: returns_window,
            })?,
        })
    }

    /// Names of the factors this engine computes.
    pub fn available_factors(&self) -> Vec<&str> {
        vec![self.sentiment.name(), self.returns.name()]
    }

    /// The sentiment factor.
    pub const fn sentiment(&self) -> &SmoothedSentimentFactor {
        &self.sentiment
    }

    /// The returns factor.
    pub const fn returns(&self) -> &TrailingReturnFactor {
        &self.returns
    }

    /// Compute both panels for `date`.
    pub fn compute_all<P>(
        &self,
        date: NaiveDate,
        universe: &UniverseMask,
        provider: &P,
    ) -> Result<FactorPanels, FactorError>
    where
        P: ObservationProvider + ?Sized,
    {
        Ok(FactorPanels {
            sentiment: compute_panel(&self.sentiment, date, universe, provider)?,
            returns: compute_panel(&self.returns, date, universe, provider)?,
        })
    }
}
