//! Momentum factors - measures of recent price trend
//!
//! Over a one-week horizon the trailing return tends to reverse, so Hobart
//! uses it with a negative weight in the combined signal.

pub mod trailing_return;

pub use trailing_return::{RETURNS_LOOKBACK_DAYS, TrailingReturnConfig, TrailingReturnFactor};
