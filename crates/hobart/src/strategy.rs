//! The daily rebalance pipeline.

use chrono::NaiveDate;
use hobart_data::{CurrentPortfolio, ObservationProvider, PortfolioProvider, UniverseProvider};
use hobart_factors::{FactorEngine, FactorPanels};
use hobart_optimize::{ConstraintSet, Optimizer, TargetPortfolio};
use hobart_output::{RebalanceExport, RebalanceReport, ReportBuilder, TradeList};
use hobart_signal::{Signal, SignalCombiner};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::StrategyConfig;
use crate::error::{ConfigError, RebalanceError};

/// How a successful rebalance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebalanceStatus {
    /// Certified optimal target over a non-empty selection
    Optimal,
    /// Nothing was selected; every holding is liquidated
    NoSignal,
}

impl fmt::Display for RebalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Optimal => "optimal",
            Self::NoSignal => "no_signal",
        })
    }
}

/// Result of one rebalance.
#[derive(Debug, Clone)]
pub struct Rebalance {
    /// Rebalance date
    pub date: NaiveDate,
    /// Outcome
    pub status: RebalanceStatus,
    /// Assets in the universe on `date`
    pub universe_size: usize,
    /// Raw factor panels
    pub panels: FactorPanels,
    /// Combined score and selection
    pub signal: Signal,
    /// Holdings before the rebalance
    pub current: CurrentPortfolio,
    /// Certified target
    pub target: TargetPortfolio,
    /// `target - current` per asset
    pub trades: TradeList,
    /// `Σ α w` at the target
    pub expected_alpha: f64,
    /// Solver iterations
    pub iterations: u32,
}

impl Rebalance {
    /// Assets dropped for incomplete history, across both factors.
    pub fn data_gaps(&self) -> usize {
        self.panels.sentiment.gaps().len() + self.panels.returns.gaps().len()
    }

    /// Summary report.
    pub fn report(&self) -> RebalanceReport {
        ReportBuilder::new(self.date)
            .status(self.status.to_string())
            .universe_size(self.universe_size)
            .signal(
                self.signal.combined.len(),
                self.signal.selection.len(),
                self.data_gaps(),
            )
            .solver(self.expected_alpha, self.iterations)
            .target(&self.target, &self.current)
            .build()
    }

    /// Target and trades for export.
    pub fn export(&self) -> RebalanceExport {
        RebalanceExport::new(
            self.date,
            self.status.to_string(),
            self.expected_alpha,
            &self.target,
            &self.current,
        )
    }
}

/// Sentiment / reversal long-short strategy.
#[derive(Debug)]
pub struct Strategy {
    config: StrategyConfig,
    engine: FactorEngine,
    combiner: SignalCombiner,
    constraints: ConstraintSet,
    optimizer: Optimizer,
}

impl Strategy {
    /// Build the strategy, validating the whole configuration.
    pub fn new(config: StrategyConfig) -> Result<Self, ConfigError> {
        let engine = config.factor_engine()?;
        let combiner = SignalCombiner::new(config.combiner_config())?;
        let constraints = config.constraint_set()?;
        let optimizer = Optimizer::new(config.solver.clone())?;
        Ok(Self {
            config,
            engine,
            combiner,
            constraints,
            optimizer,
        })
    }

    /// The active configuration.
    pub const fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// The constraint set applied at every rebalance.
    pub const fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Raw factor panels for `date`.
    pub fn compute_panels<U, O>(
        &self,
        date: NaiveDate,
        universe: &U,
        observations: &O,
    ) -> Result<FactorPanels, RebalanceError>
    where
        U: UniverseProvider + ?Sized,
        O: ObservationProvider + ?Sized,
    {
        let mask = universe.universe_mask(date);
        Ok(self.engine.compute_all(date, &mask, observations)?)
    }

    /// Combined score and selection for `date`, without optimizing.
    pub fn compute_signal<U, O>(
        &self,
        date: NaiveDate,
        universe: &U,
        observations: &O,
    ) -> Result<Signal, RebalanceError>
    where
        U: UniverseProvider + ?Sized,
        O: ObservationProvider + ?Sized,
    {
        let panels = self.compute_panels(date, universe, observations)?;
        Ok(self.combiner.build(&panels)?)
    }

    /// Run factors, signal and optimizer for `date`.
    ///
    /// The current portfolio is read once and never modified.
    pub fn rebalance<U, O, P>(
        &self,
        date: NaiveDate,
        universe: &U,
        observations: &O,
        portfolio: &P,
    ) -> Result<Rebalance, RebalanceError>
    where
        U: UniverseProvider + ?Sized,
        O: ObservationProvider + ?Sized,
        P: PortfolioProvider + ?Sized,
    {
        let _span = tracing::info_span!("rebalance", %date).entered();

        let mask = universe.universe_mask(date);
        let panels = self.engine.compute_all(date, &mask, observations)?;
        tracing::info!(
            universe = mask.len(),
            sentiment = panels.sentiment.len(),
            returns = panels.returns.len(),
            "computed factors"
        );

        let signal = self.combiner.build(&panels)?;
        tracing::info!(
            scored = signal.combined.len(),
            selected = signal.selection.len(),
            "built signal"
        );

        let current = portfolio.current_weights();
        let alpha = signal.alpha();
        let optimization = self
            .optimizer
            .optimize(alpha.as_map(), &current, &self.constraints)
            .inspect_err(|e| {
                tracing::warn!(error = %e, retryable = e.is_retryable(), "optimization failed");
            })?;

        let status = if signal.is_empty() {
            RebalanceStatus::NoSignal
        } else {
            RebalanceStatus::Optimal
        };
        let trades = TradeList::between(&optimization.target, &current);
        tracing::info!(
            %status,
            positions = optimization.target.len(),
            orders = trades.orders().count(),
            turnover = trades.turnover(),
            "rebalanced"
        );

        Ok(Rebalance {
            date,
            status,
            universe_size: mask.len(),
            panels,
            signal,
            current,
            target: optimization.target,
            trades,
            expected_alpha: optimization.expected_alpha,
            iterations: optimization.iterations,
        })
    }
}
