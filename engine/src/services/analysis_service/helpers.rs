// Helpers shared by the analysis handlers
use crate::config::FetchProfile;
use crate::data::MarketDataSource;
use crate::error::EngineError;
use shared::models::MarketData;

pub const MAX_COIN_LEN: usize = 10;

/// Trims and uppercases a coin ticker; 1..=10 ASCII letters.
pub fn normalize_coin(raw: &str) -> Result<String, EngineError> {
    let coin = raw.trim().to_ascii_uppercase();
    if coin.is_empty() || coin.len() > MAX_COIN_LEN || !coin.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(EngineError::InvalidInput(format!(
            "'{}' is not a valid coin ticker (1-{} letters, e.g. BTC)",
            raw.trim(),
            MAX_COIN_LEN
        )));
    }
    Ok(coin)
}

pub async fn fetch_window(
    source: &dyn MarketDataSource,
    symbol: &str,
    profile: FetchProfile,
) -> Result<MarketData, EngineError> {
    let market = source.fetch_candles(symbol, profile.interval, profile.limit).await?;
    tracing::debug!(%symbol, interval = %profile.interval, candles = market.len(), "Fetched candle window");
    Ok(market)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_coin_uppercases_and_trims() {
        assert_eq!(normalize_coin(" btc ").unwrap(), "BTC");
        assert_eq!(normalize_coin("Pepe").unwrap(), "PEPE");
    }

    #[test]
    fn normalize_coin_rejects_bad_tickers() {
        for raw in ["", "   ", "BTC1", "BTC-USDT", "ABCDEFGHIJK"] {
            assert!(
                matches!(normalize_coin(raw), Err(EngineError::InvalidInput(_))),
                "accepted {:?}",
                raw
            );
        }
        assert!(normalize_coin("ABCDEFGHIJ").is_ok());
    }
}
