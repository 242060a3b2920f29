// Handler for signal requests
use super::helpers::fetch_window;
use crate::config::EngineSettings;
use crate::data::MarketDataSource;
use crate::error::EngineError;
use crate::signals::evaluate_signal;
use shared::models::{RiskMode, SignalDecision};

pub async fn handle_get_signal(
    coin: &str,
    mode: RiskMode,
    source: &dyn MarketDataSource,
    settings: &EngineSettings,
) -> Result<SignalDecision, EngineError> {
    let symbol = settings.symbol_for(coin);
    tracing::debug!(%symbol, %mode, "Handling signal request in dedicated handler");

    let market = fetch_window(source, &symbol, settings.signal).await?;
    evaluate_signal(mode, &market)
}
