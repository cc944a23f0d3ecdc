//! Factor Registry
//!
//! Central registry for all available factors. Allows factor lookup by name
//! for the CLI and for reports.

use hobart_data::ObservationField;
use std::collections::HashMap;

/// Available factor categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorCategory {
    /// Message sentiment factors
    Sentiment,
    /// Price trend and reversal factors
    Momentum,
}

/// Factor metadata
#[derive(Debug, Clone)]
pub struct FactorInfo {
    /// Factor name (unique identifier)
    pub name: &'static str,
    /// Factor category
    pub category: FactorCategory,
    /// Brief description of what the factor measures
    pub description: &'static str,
    /// Observation field the factor reads
    pub field: ObservationField,
    /// Default window in sessions
    pub default_window: usize,
}

/// Get all available factor info
pub fn available_factors() -> Vec<FactorInfo> {
    vec![
        FactorInfo {
            name: "smoothed_sentiment",
            category: FactorCategory::Sentiment,
            description: "Trailing mean of the daily bullish-minus-bearish score",
            field: ObservationField::BullMinusBear,
            default_window: 3,
        },
        FactorInfo {
            name: "trailing_return",
            category: FactorCategory::Momentum,
            description: "Total price return over the trailing window",
            field: ObservationField::Close,
            default_window: crate::momentum::RETURNS_LOOKBACK_DAYS,
        },
    ]
}

/// Get factors by category
pub fn factors_by_category(category: FactorCategory) -> Vec<FactorInfo> {
    available_factors()
        .into_iter()
        .filter(|f| f.category == category)
        .collect()
}

/// Get factor info by name
pub fn get_factor_info(name: &str) -> Option<FactorInfo> {
    available_factors().into_iter().find(|f| f.name == name)
}

/// Get a map of all factors indexed by name
pub fn factor_map() -> HashMap<&'static str, FactorInfo> {
    available_factors()
        .into_iter()
        .map(|f| (f.name, f))
        .collect()
}
