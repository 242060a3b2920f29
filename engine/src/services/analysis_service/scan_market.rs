// Handler for the market scan: fan out over the volume universe, keep the best entries
use super::helpers::fetch_window;
use crate::config::EngineSettings;
use crate::data::MarketDataSource;
use crate::error::EngineError;
use crate::signals::scanner::{coin_of, rank_top, score_candidate, select_universe};
use futures::stream::{self, StreamExt};
use shared::models::ScanCandidate;

/// Only the ticker list is fatal; a symbol that fails to fetch or score is skipped.
pub async fn handle_scan_market(
    source: &dyn MarketDataSource,
    settings: &EngineSettings,
) -> Result<Vec<ScanCandidate>, EngineError> {
    let tickers = source.fetch_tickers().await?;
    let universe = select_universe(&tickers, &settings.quote_asset, settings.scan_universe_size);
    tracing::debug!(tickers = tickers.len(), universe = universe.len(), "Scanning market");

    let quote_asset = settings.quote_asset.as_str();
    let profile = settings.scan;

    let scored: Vec<(usize, ScanCandidate)> = stream::iter(universe.into_iter().enumerate().map(|(rank, symbol)| {
        async move {
            let coin = coin_of(&symbol, quote_asset);
            let outcome = match fetch_window(source, &symbol, profile).await {
                Ok(market) => score_candidate(coin, &market),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(candidate) => Some((rank, candidate)),
                Err(e) => {
                    tracing::warn!(%symbol, error = %e, kind = e.kind(), "Excluding symbol from scan");
                    None
                }
            }
        }
    }))
    .buffer_unordered(settings.scan_concurrency.max(1))
    .filter_map(|entry| async move { entry })
    .collect()
    .await;

    let mut in_universe_order = scored;
    in_universe_order.sort_by_key(|(rank, _)| *rank);
    let candidates: Vec<ScanCandidate> = in_universe_order.into_iter().map(|(_, c)| c).collect();
    tracing::debug!(scored = candidates.len(), "Scan scoring finished");

    Ok(rank_top(candidates, settings.scan_top_n))
}
