//! Sentiment factors - crowd-sourced message sentiment
//!
//! Sentiment factors summarize the balance of bullish and bearish messages
//! about a security over a short trailing window.

pub mod smoothed;

pub use smoothed::{SmoothedSentimentConfig, SmoothedSentimentFactor};
