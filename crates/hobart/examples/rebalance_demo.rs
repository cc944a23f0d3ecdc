//! Demonstration of a Hobart rebalance.
//!
//! This example shows how to:
//! - Build in-memory market data
//! - Run one rebalance from an existing book
//! - Print the report and the resulting orders
//!
//! Run with: cargo run --example rebalance_demo -p hobart

use chrono::NaiveDate;
use hobart::data::{Asset, CurrentPortfolio, MarketData, ObservationField};
use hobart::{Strategy, StrategyConfig};

const SYMBOLS: [&str; 12] = [
    "AAPL", "AMZN", "BAC", "CSCO", "GOOG", "INTC", "JPM", "META", "MSFT", "NVDA", "ORCL", "XOM",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Hobart Rebalance Demo");
    println!("=====================\n");

    let sessions: Vec<NaiveDate> = (4..=8)
        .filter_map(|day| NaiveDate::from_ymd_opt(2024, 3, day))
        .collect();

    let mut data = MarketData::new();
    for (i, symbol) in SYMBOLS.iter().enumerate() {
        let asset = Asset::from(*symbol);
        for (k, day) in sessions.iter().enumerate() {
            let sentiment = ((i * 5 + k * 3) % 11) as f64 / 10.0 - 0.5;
            let close = 100.0 * (1.0 + 0.01 * ((i + 2 * k) % 7) as f64);
            data.insert(*day, asset.clone(), ObservationField::BullMinusBear, Some(sentiment));
            data.insert(*day, asset.clone(), ObservationField::Close, Some(close));
        }
        data.add_to_universe(sessions[0], asset);
    }

    let current: CurrentPortfolio = [(Asset::from("AAPL"), 0.1), (Asset::from("XOM"), -0.1)]
        .into_iter()
        .collect();

    let strategy = Strategy::new(StrategyConfig {
        max_position_size: 0.15,
        ..Default::default()
    })?;
    let date = sessions[sessions.len() - 1];
    let rebalance = strategy.rebalance(date, &data, &data, &current)?;

    println!("{}", rebalance.report());

    println!("Orders:");
    println!("-------");
    for trade in rebalance.trades.orders() {
        println!(
            "  {:<6} {:>8.4} -> {:>8.4}  ({:+.4})",
            trade.asset,
            trade.current,
            trade.target,
            trade.delta()
        );
    }

    Ok(())
}
