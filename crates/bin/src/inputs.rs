//! Loading of data files and configuration for the CLI commands.

use chrono::NaiveDate;
use hobart::data::store::read_holdings_path;
use hobart::data::{CurrentPortfolio, DataError, MarketData};
use hobart::{ConfigError, StrategyConfig};
use std::io::Write;
use std::path::Path;

/// Load observations and universe membership.
///
/// Without a universe file every observed asset is in the universe from the
/// first session on.
pub(crate) fn load_market(
    observations: &Path,
    universe: Option<&Path>,
) -> Result<MarketData, DataError> {
    let mut data = MarketData::from_paths(observations, universe)?;
    let first_session = data.sessions().next();
    if !data.has_universe()
        && let Some(first) = first_session
    {
        let mask = data.all_assets_mask();
        tracing::info!(assets = mask.len(), "no universe file, using every observed asset");
        data.set_universe(first, mask);
    }
    tracing::info!(
        observations = data.observation_count(),
        sessions = data.sessions().count(),
        "loaded market data"
    );
    Ok(data)
}

/// The requested date, or the last session in the data.
pub(crate) fn resolve_date(
    date: Option<NaiveDate>,
    data: &MarketData,
) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match date.or_else(|| data.last_session()) {
        Some(date) => Ok(date),
        None => Err("observations file has no sessions".into()),
    }
}

/// Load and validate the strategy config, or use the defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<StrategyConfig, ConfigError> {
    let config = match path {
        Some(path) => StrategyConfig::from_json_file(path)?,
        None => StrategyConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Current holdings, empty when no file is given.
pub(crate) fn load_holdings(path: Option<&Path>) -> Result<CurrentPortfolio, DataError> {
    path.map_or_else(|| Ok(CurrentPortfolio::default()), read_holdings_path)
}

/// Write to `path`, or to stdout.
pub(crate) fn emit(content: &str, path: Option<&Path>) -> std::io::Result<()> {
    match path {
        Some(path) => std::fs::write(path, content),
        None => std::io::stdout().lock().write_all(content.as_bytes()),
    }
}
