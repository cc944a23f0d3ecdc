//! In-memory storage and file loading for market data.

pub mod loader;
pub mod memory;

pub use loader::{
    HoldingRecord, ObservationRecord, UniverseRecord, read_holdings, read_holdings_path,
};
pub use memory::MarketData;
