//! Error types for constraint construction and optimization.

use hobart_data::Asset;
use thiserror::Error;

/// Invalid constraint or solver parameters, raised before any solve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    /// A bound is negative or not finite
    #[error("Invalid bound for {constraint}: {value}")]
    InvalidBound {
        /// Constraint name
        constraint: &'static str,
        /// Rejected bound
        value: f64,
    },

    /// The same constraint kind was added more than once
    #[error("Constraint {0} given more than once")]
    Duplicate(&'static str),

    /// Neither a position bound nor a gross exposure bound was given
    #[error("Constraint set needs a position bound or a gross exposure bound")]
    Unbounded,

    /// A solver setting is out of range
    #[error("Invalid solver setting {name}: {value}")]
    InvalidSolverSetting {
        /// Setting name
        name: &'static str,
        /// Rejected value
        value: f64,
    },
}

/// Outcomes of an optimization other than a certified optimum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    /// No portfolio satisfies every constraint
    #[error("Problem is infeasible: {0}")]
    Infeasible(String),

    /// The iteration or time budget ran out before convergence
    #[error("Solver did not converge ({status}) after {iterations} iterations")]
    DidNotConverge {
        /// Solver status
        status: String,
        /// Iterations performed
        iterations: u32,
    },

    /// The objective is unbounded over the feasible set
    #[error("Problem is unbounded")]
    Unbounded,

    /// The solver stopped on a numerical error
    #[error("Solver numerical failure: {0}")]
    NumericalFailure(String),

    /// The solver reported success but the weights break a constraint
    #[error("Solution violates {constraint} by {excess:e}")]
    Uncertified {
        /// Violated constraint
        constraint: &'static str,
        /// Amount beyond the bound
        excess: f64,
    },

    /// An alpha value is not finite
    #[error("Invalid alpha for {asset}: {value}")]
    InvalidAlpha {
        /// Asset with the bad score
        asset: Asset,
        /// Rejected value
        value: f64,
    },

    /// A current holding weight is not finite
    #[error("Invalid current weight for {asset}: {value}")]
    InvalidHolding {
        /// Asset with the bad weight
        asset: Asset,
        /// Rejected value
        value: f64,
    },

    /// The solver rejected the problem data or settings
    #[error("Solver setup failed: {0}")]
    Setup(String),
}

impl OptimizeError {
    /// Whether running again next cycle may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::DidNotConverge { .. })
    }
}
