// Decoding of exchange kline rows and 24h ticker objects
use anyhow::{anyhow, Result};
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use shared::models::{Candle, Ticker24h};
use shared::utils::parse_decimal;

use crate::error::EngineError;

// Kline row layout:
// [open_time, open, high, low, close, volume, close_time, quote_volume, trades, ...]
const OPEN_TIME: usize = 0;
const OPEN: usize = 1;
const HIGH: usize = 2;
const LOW: usize = 3;
const CLOSE: usize = 4;
const VOLUME: usize = 5;
const TRADES: usize = 8;
const MIN_FIELDS: usize = 6;

/// Decodes a kline response. One malformed row fails the whole window.
pub fn parse_klines(symbol: &str, rows: &[Value]) -> Result<Vec<Candle>, EngineError> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            parse_kline_row(symbol, row)
                .map_err(|e| EngineError::DataUnavailable(format!("malformed kline #{} for {}: {}", idx, symbol, e)))
        })
        .collect()
}

fn parse_kline_row(symbol: &str, row: &Value) -> Result<Candle> {
    let fields = row.as_array().ok_or_else(|| anyhow!("row is not an array"))?;
    if fields.len() < MIN_FIELDS {
        return Err(anyhow!("expected at least {} fields, got {}", MIN_FIELDS, fields.len()));
    }

    let open_time_ms = fields[OPEN_TIME]
        .as_i64()
        .ok_or_else(|| anyhow!("open time is not an integer"))?;
    let open_time =
        DateTime::from_timestamp_millis(open_time_ms).ok_or_else(|| anyhow!("open time {} out of range", open_time_ms))?;

    let trades = fields.get(TRADES).and_then(Value::as_u64).unwrap_or(0);

    Ok(Candle {
        symbol: symbol.to_string(),
        open_time,
        open: decimal_field(&fields[OPEN], "open")?,
        high: decimal_field(&fields[HIGH], "high")?,
        low: decimal_field(&fields[LOW], "low")?,
        close: decimal_field(&fields[CLOSE], "close")?,
        volume: decimal_field(&fields[VOLUME], "volume")?,
        trades: u32::try_from(trades).unwrap_or(u32::MAX),
    })
}

/// Exchange decimals arrive as strings; plain JSON numbers are accepted too.
fn decimal_field(value: &Value, name: &str) -> Result<f64> {
    match value {
        Value::String(s) => parse_decimal(s).map_err(|e| anyhow!("{}: {}", name, e)),
        Value::Number(n) => n.as_f64().ok_or_else(|| anyhow!("{}: not representable as f64", name)),
        other => Err(anyhow!("{}: unexpected value {}", name, other)),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTicker {
    pub symbol: String,
    pub last_price: String,
    pub quote_volume: String,
}

/// Converts raw tickers, dropping entries whose numbers don't parse.
pub fn parse_tickers(raw: Vec<RawTicker>) -> Vec<Ticker24h> {
    raw.into_iter()
        .filter_map(|t| {
            let last_price = parse_decimal(&t.last_price).ok()?;
            let quote_volume = parse_decimal(&t.quote_volume).ok()?;
            Some(Ticker24h {
                symbol: t.symbol,
                last_price,
                quote_volume,
            })
        })
        .collect()
}

/// Error payload returned by the exchange on rejected requests.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_klines_valid_rows() {
        let rows = vec![
            json!([1700000000000i64, "100.5", "101.0", "99.5", "100.8", "1234.5", 1700003599999i64, "124000.0", 321, "0", "0", "0"]),
            json!([1700003600000i64, "100.8", "102.0", "100.1", "101.9", "987.0", 1700007199999i64, "99000.0", 210, "0", "0", "0"]),
        ];
        let candles = parse_klines("BTCUSDT", &rows).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].symbol, "BTCUSDT");
        assert_eq!(candles[0].open_time.timestamp_millis(), 1700000000000);
        assert_eq!(candles[0].high, 101.0);
        assert_eq!(candles[1].close, 101.9);
        assert_eq!(candles[1].trades, 210);
    }

    #[test]
    fn test_parse_klines_accepts_numeric_fields_without_trades() {
        let rows = vec![json!([1700000000000i64, 1.5, 2.0, 1.0, 1.75, 10])];
        let candles = parse_klines("XUSDT", &rows).unwrap();
        assert_eq!(candles[0].close, 1.75);
        assert_eq!(candles[0].trades, 0);
    }

    #[test]
    fn test_parse_klines_malformed_row_fails_window() {
        let rows = vec![
            json!([1700000000000i64, "1", "1", "1", "1", "1"]),
            json!([1700003600000i64, "1", "oops", "1", "1", "1"]),
        ];
        let err = parse_klines("BTCUSDT", &rows).unwrap_err();
        match err {
            EngineError::DataUnavailable(msg) => {
                assert!(msg.contains("malformed kline #1"), "{}", msg);
                assert!(msg.contains("high"), "{}", msg);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_klines_short_row() {
        assert!(parse_klines("BTCUSDT", &[json!([1, "2"])]).is_err());
        assert!(parse_klines("BTCUSDT", &[json!({"open": "1"})]).is_err());
    }

    #[test]
    fn test_parse_tickers_skips_unparsable() {
        let raw: Vec<RawTicker> = serde_json::from_value(json!([
            {"symbol": "BTCUSDT", "lastPrice": "64000.1", "quoteVolume": "1500000000.5", "volume": "1"},
            {"symbol": "BADUSDT", "lastPrice": "n/a", "quoteVolume": "1"}
        ]))
        .unwrap();
        let tickers = parse_tickers(raw);
        assert_eq!(tickers.len(), 1);
        assert_eq!(tickers[0].symbol, "BTCUSDT");
        assert_eq!(tickers[0].quote_volume, 1500000000.5);
    }
}
