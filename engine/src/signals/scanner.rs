// Entry-opportunity scoring for the market scan
use super::divergence::detect_divergence;
use crate::error::EngineError;
use crate::indicators::{latest_defined, IndicatorCalculator, Macd, Rsi};
use shared::models::{Divergence, MarketData, ScanCandidate, Ticker24h};

pub const DIVERGENCE_POINTS: u8 = 50;
pub const MACD_POINTS: u8 = 30;
pub const OVERSOLD_POINTS: u8 = 20;
pub const OVERSOLD_RSI: f64 = 40.0;

/// Symbols quoted in `quote_asset`, highest 24h quote volume first, at most `size`.
///
/// The sort is stable so equal volumes keep exchange order.
pub fn select_universe(tickers: &[Ticker24h], quote_asset: &str, size: usize) -> Vec<String> {
    let mut quoted: Vec<&Ticker24h> = tickers
        .iter()
        .filter(|t| t.symbol.len() > quote_asset.len() && t.symbol.ends_with(quote_asset))
        .collect();
    quoted.sort_by(|a, b| b.quote_volume.total_cmp(&a.quote_volume));
    quoted.into_iter().take(size).map(|t| t.symbol.clone()).collect()
}

/// `BTCUSDT` -> `BTC`.
pub fn coin_of<'a>(symbol: &'a str, quote_asset: &str) -> &'a str {
    symbol.strip_suffix(quote_asset).unwrap_or(symbol)
}

pub fn score_candidate(coin: &str, market: &MarketData) -> Result<ScanCandidate, EngineError> {
    let closes = market.closes();
    let price = market
        .last_close()
        .ok_or_else(|| EngineError::InsufficientData(format!("no candles for {}", market.symbol)))?;

    let rsi_calc = Rsi::default();
    let rsi_series = rsi_calc.calculate(&closes);
    let rsi = latest_defined(rsi_calc.name(), &rsi_series)?.value;

    let macd = Macd::new();
    let lines = macd.lines(&closes);
    let line = latest_defined(macd.name(), &lines.line)?.value;
    let signal = latest_defined(&macd.signal_name(), &lines.signal)?.value;

    let mut score = 0;
    if detect_divergence(&closes, &rsi_series) == Some(Divergence::Bullish) {
        score += DIVERGENCE_POINTS;
    }
    if line > signal {
        score += MACD_POINTS;
    }
    if rsi < OVERSOLD_RSI {
        score += OVERSOLD_POINTS;
    }

    let support = market.candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let resistance = market.candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);

    Ok(ScanCandidate {
        coin: coin.to_string(),
        symbol: market.symbol.clone(),
        price,
        rsi,
        macd: line,
        macd_signal: signal,
        support,
        resistance,
        score,
    })
}

/// Best `n` by score. Candidates must arrive in universe order; ties keep it.
pub fn rank_top(mut candidates: Vec<ScanCandidate>, n: usize) -> Vec<ScanCandidate> {
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(n);
    candidates
}
