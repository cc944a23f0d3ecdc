//! Error types for signal construction.

use thiserror::Error;

/// Errors raised while configuring or running the signal combiner.
#[derive(Debug, Error)]
pub enum SignalError {
    /// A factor weight is negative or not finite
    #[error("Invalid weight for {name}: {value}")]
    InvalidWeight {
        /// Weight name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Factor weights do not sum to one
    #[error("Factor weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    /// Percentile bounds outside [0, 100] or inverted
    #[error("Invalid selection percentiles: low {low}, high {high}")]
    InvalidPercentiles {
        /// Lower percentile
        low: f64,
        /// Upper percentile
        high: f64,
    },

    /// Nothing to combine
    #[error("No factor panels to combine")]
    NoFactors,
}
