//! Summary report for a single rebalance.

use chrono::{DateTime, NaiveDate, Utc};
use hobart_data::CurrentPortfolio;
use hobart_optimize::TargetPortfolio;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What happened in one rebalance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceReport {
    /// Rebalance date.
    pub date: NaiveDate,

    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Rebalance outcome.
    pub status: String,

    /// Assets in the universe.
    pub universe_size: usize,

    /// Assets with a combined score.
    pub scored: usize,

    /// Assets selected from the score tails.
    pub selected: usize,

    /// Assets dropped for incomplete history, across factors.
    pub data_gaps: usize,

    /// Long positions in the target.
    pub long_count: usize,

    /// Short positions in the target.
    pub short_count: usize,

    /// `Σ|w|` of the target.
    pub gross_exposure: f64,

    /// `Σw` of the target.
    pub net_exposure: f64,

    /// `Σ|w - current|`.
    pub turnover: f64,

    /// `Σ α w` at the target.
    pub expected_alpha: f64,

    /// Solver iterations.
    pub iterations: u32,
}

impl RebalanceReport {
    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render as a plain-text table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nRebalance: {} ({})\n", self.date, self.status));
        output.push_str(&"=".repeat(48));
        output.push('\n');

        let counts = [
            ("Universe", self.universe_size),
            ("Scored", self.scored),
            ("Selected", self.selected),
            ("Data gaps", self.data_gaps),
            ("Long", self.long_count),
            ("Short", self.short_count),
            ("Iterations", self.iterations as usize),
        ];
        for (label, value) in counts {
            output.push_str(&format!("{label:<20} {value:>12}\n"));
        }

        output.push_str(&"-".repeat(48));
        output.push('\n');

        let exposures = [
            ("Gross exposure", self.gross_exposure),
            ("Net exposure", self.net_exposure),
            ("Turnover", self.turnover),
            ("Expected alpha", self.expected_alpha),
        ];
        for (label, value) in exposures {
            output.push_str(&format!("{label:<20} {value:>12.6}\n"));
        }

        output
    }
}

impl fmt::Display for RebalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii_table())
    }
}

/// Builder for creating reports.
#[derive(Debug)]
pub struct ReportBuilder {
    report: RebalanceReport,
}

impl ReportBuilder {
    /// Start a report for `date` with every count at 0.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            report: RebalanceReport {
                date,
                generated_at: Utc::now(),
                status: String::new(),
                universe_size: 0,
                scored: 0,
                selected: 0,
                data_gaps: 0,
                long_count: 0,
                short_count: 0,
                gross_exposure: 0.0,
                net_exposure: 0.0,
                turnover: 0.0,
                expected_alpha: 0.0,
                iterations: 0,
            },
        }
    }

    /// Set the outcome.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.report.status = status.into();
        self
    }

    /// Set the universe size.
    pub const fn universe_size(mut self, size: usize) -> Self {
        self.report.universe_size = size;
        self
    }

    /// Set the signal counts.
    pub const fn signal(mut self, scored: usize, selected: usize, data_gaps: usize) -> Self {
        self.report.scored = scored;
        self.report.selected = selected;
        self.report.data_gaps = data_gaps;
        self
    }

    /// Set the solver results.
    pub const fn solver(mut self, expected_alpha: f64, iterations: u32) -> Self {
        self.report.expected_alpha = expected_alpha;
        self.report.iterations = iterations;
        self
    }

    /// Fill exposures and turnover from the target.
    pub fn target(mut self, target: &TargetPortfolio, current: &CurrentPortfolio) -> Self {
        self.report.long_count = target.long_count();
        self.report.short_count = target.short_count();
        self.report.gross_exposure = target.gross_exposure();
        self.report.net_exposure = target.net_exposure();
        self.report.turnover = target.turnover_from(current);
        self
    }

    /// Build the report.
    pub fn build(self) -> RebalanceReport {
        self.report
    }
}
