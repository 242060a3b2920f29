// Handler for support/resistance requests
use super::helpers::fetch_window;
use crate::config::EngineSettings;
use crate::data::MarketDataSource;
use crate::error::EngineError;
use crate::signals::locate_levels;
use shared::models::LevelReport;

pub async fn handle_get_levels(
    coin: &str,
    source: &dyn MarketDataSource,
    settings: &EngineSettings,
) -> Result<LevelReport, EngineError> {
    let symbol = settings.symbol_for(coin);
    tracing::debug!(%symbol, "Handling levels request in dedicated handler");

    let market = fetch_window(source, &symbol, settings.levels).await?;
    locate_levels(&market)
}
