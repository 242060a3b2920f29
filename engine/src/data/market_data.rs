// Market data sources: the fetch contract and an in-memory implementation
use crate::error::EngineError;
use async_trait::async_trait;
use shared::models::{Candle, Interval, MarketData, Ticker24h};
use std::collections::HashMap;

/// Where candles and 24h tickers come from.
///
/// Every failure (unknown symbol, network, timeout, rejected request) is
/// reported as [`EngineError::DataUnavailable`]. Implementations never retry.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// The most recent `limit` candles for `symbol`, oldest first.
    async fn fetch_candles(&self, symbol: &str, interval: Interval, limit: u32) -> Result<MarketData, EngineError>;

    /// 24h statistics for every listed symbol.
    async fn fetch_tickers(&self) -> Result<Vec<Ticker24h>, EngineError>;
}

/// Candles held in memory, keyed by symbol and interval.
///
/// Used for replaying captured data and as a deterministic source in tests.
pub struct MarketDataStore {
    data: HashMap<String, HashMap<Interval, Vec<Candle>>>,
    tickers: Vec<Ticker24h>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        MarketDataStore {
            data: HashMap::new(),
            tickers: Vec::new(),
        }
    }

    pub fn add_candles(&mut self, symbol: &str, interval: Interval, new_candles: Vec<Candle>) {
        let symbol_data = self.data.entry(symbol.to_string()).or_default();
        let interval_data = symbol_data.entry(interval).or_default();

        interval_data.extend(new_candles);
        interval_data.sort_by_key(|c| c.open_time);
        interval_data.dedup_by_key(|c| c.open_time);
    }

    pub fn set_tickers(&mut self, tickers: Vec<Ticker24h>) {
        self.tickers = tickers;
    }

    pub fn get_candles(&self, symbol: &str, interval: Interval, limit: usize) -> Option<Vec<Candle>> {
        self.data
            .get(symbol)
            .and_then(|symbol_data| symbol_data.get(&interval))
            .map(|candles| {
                let start = candles.len().saturating_sub(limit);
                candles[start..].to_vec()
            })
    }
}

impl Default for MarketDataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataSource for MarketDataStore {
    async fn fetch_candles(&self, symbol: &str, interval: Interval, limit: u32) -> Result<MarketData, EngineError> {
        match self.get_candles(symbol, interval, limit as usize) {
            Some(candles) if !candles.is_empty() => Ok(MarketData::new(symbol, interval, candles)),
            _ => {
                tracing::debug!(%symbol, %interval, "No candles held for symbol");
                Err(EngineError::DataUnavailable(format!(
                    "no {} candles for symbol '{}'",
                    interval, symbol
                )))
            }
        }
    }

    async fn fetch_tickers(&self) -> Result<Vec<Ticker24h>, EngineError> {
        Ok(self.tickers.clone())
    }
}
