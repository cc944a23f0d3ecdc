//! Factor traits and errors.

use hobart_data::ObservationField;
use polars::prelude::*;
use thiserror::Error;

/// Errors that can occur while computing factor scores.
#[derive(Debug, Error)]
pub enum FactorError {
    /// Polars computation error
    #[error("Computation error: {0}")]
    Computation(#[from] PolarsError),

    /// Window length rejected for a factor
    #[error("Invalid window for {factor}: {reason}")]
    InvalidWindow {
        /// Factor name
        factor: String,
        /// Why the window was rejected
        reason: String,
    },
}

/// A rolling-window factor over a single observation field.
///
/// `compute_scores` receives a long frame with columns `symbol` (str),
/// `day` (i32 session index, ascending) and `value` (f64, null when
/// missing), and returns `symbol`, `day`, `score` rows. A row whose window
/// is incomplete must either be dropped or carry a null score.
pub trait Factor {
    /// Unique factor name.
    fn name(&self) -> &str;

    /// Observation field the factor reads.
    fn field(&self) -> ObservationField;

    /// Number of trailing sessions needed for one score.
    fn window(&self) -> usize;

    /// Build the lazy score computation.
    fn compute_scores(&self, data: LazyFrame) -> Result<LazyFrame, FactorError>;

    /// Columns expected in the input frame.
    fn required_columns(&self) -> &[&str] {
        &["symbol", "day", "value"]
    }
}

/// A factor constructed from a configuration struct.
pub trait ConfigurableFactor: Factor + Sized {
    /// Configuration type.
    type Config;

    /// Build the factor, validating the configuration.
    fn with_config(config: Self::Config) -> Result<Self, FactorError>;

    /// The active configuration.
    fn config(&self) -> &Self::Config;
}
