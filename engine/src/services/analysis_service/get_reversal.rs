// Handler for trend-reversal requests
use super::helpers::fetch_window;
use crate::config::EngineSettings;
use crate::data::MarketDataSource;
use crate::error::EngineError;
use crate::signals::evaluate_reversal;
use shared::models::ReversalSignal;

pub async fn handle_get_reversal(
    coin: &str,
    source: &dyn MarketDataSource,
    settings: &EngineSettings,
) -> Result<ReversalSignal, EngineError> {
    let symbol = settings.symbol_for(coin);
    tracing::debug!(%symbol, "Handling reversal request in dedicated handler");

    let market = fetch_window(source, &symbol, settings.reversal).await?;
    evaluate_reversal(&market)
}
