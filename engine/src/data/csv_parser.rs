// Offline candle source backed by exported kline CSV files
use async_trait::async_trait;
use chrono::{DateTime, Duration};
use csv::{ReaderBuilder, StringRecord};
use shared::models::{Candle, Interval, MarketData, Ticker24h};
use shared::utils::parse_decimal;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::market_data::MarketDataSource;
use crate::error::EngineError;

/// Reads `<dir>/<SYMBOL>_<interval>.csv`, e.g. `BTCUSDT_4h.csv`.
///
/// Header: `open_time,open,high,low,close,volume[,trades]`, `open_time` in epoch milliseconds.
pub struct CsvMarketData {
    dir: PathBuf,
}

impl CsvMarketData {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn file_path(&self, symbol: &str, interval: Interval) -> PathBuf {
        self.dir.join(format!("{}_{}.csv", symbol, interval.code()))
    }

    pub fn load_candles_from_csv(file_path: &Path, symbol: &str) -> Result<Vec<Candle>, EngineError> {
        let file = File::open(file_path).map_err(|e| {
            EngineError::DataUnavailable(format!("Failed to open CSV file '{}': {}", file_path.display(), e))
        })?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let headers = rdr.headers()?.clone();
        let mut candles = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result?;
            candles.push(Self::parse_record(&record, &headers, symbol, line)?);
        }
        candles.sort_by_key(|c| c.open_time);
        Ok(candles)
    }

    fn parse_record(record: &StringRecord, headers: &StringRecord, symbol: &str, line: usize) -> Result<Candle, EngineError> {
        let field = |name: &str| {
            Self::get_field(record, headers, name).ok_or_else(|| {
                EngineError::DataUnavailable(format!("Missing '{}' field in CSV record at line {}", name, line))
            })
        };
        let decimal = |name: &str| -> Result<f64, EngineError> {
            parse_decimal(field(name)?).map_err(|e| {
                EngineError::DataUnavailable(format!("Error parsing '{}' at line {}: {}", name, line, e))
            })
        };

        let open_time_ms: i64 = field("open_time")?.parse().map_err(|e| {
            EngineError::DataUnavailable(format!("Error parsing 'open_time' at line {}: {}", line, e))
        })?;
        let open_time = DateTime::from_timestamp_millis(open_time_ms).ok_or_else(|| {
            EngineError::DataUnavailable(format!("'open_time' out of range at line {}", line))
        })?;

        let trades = match Self::get_field(record, headers, "trades") {
            Some(raw) if !raw.is_empty() => raw.parse::<u32>().map_err(|e| {
                EngineError::DataUnavailable(format!("Error parsing 'trades' at line {}: {}", line, e))
            })?,
            _ => 0,
        };

        Ok(Candle {
            symbol: symbol.to_string(),
            open_time,
            open: decimal("open")?,
            high: decimal("high")?,
            low: decimal("low")?,
            close: decimal("close")?,
            volume: decimal("volume")?,
            trades,
        })
    }

    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header == name)
            .and_then(|pos| record.get(pos))
    }

    /// Symbol and interval encoded in a file name, if it follows the naming scheme.
    fn split_file_name(path: &Path) -> Option<(String, Interval)> {
        if path.extension()? != "csv" {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let (symbol, interval) = stem.rsplit_once('_')?;
        Some((symbol.to_string(), interval.parse().ok()?))
    }

    /// Last close and the close*volume sum of the trailing 24 hours.
    fn ticker_from_candles(symbol: String, candles: &[Candle]) -> Option<Ticker24h> {
        let last = candles.last()?;
        let window_start = last.open_time - Duration::hours(24);
        let quote_volume = candles
            .iter()
            .filter(|c| c.open_time > window_start)
            .map(|c| c.close * c.volume)
            .sum();
        Some(Ticker24h {
            symbol,
            last_price: last.close,
            quote_volume,
        })
    }
}

#[async_trait]
impl MarketDataSource for CsvMarketData {
    async fn fetch_candles(&self, symbol: &str, interval: Interval, limit: u32) -> Result<MarketData, EngineError> {
        let path = self.file_path(symbol, interval);
        tracing::debug!(%symbol, path = %path.display(), "Loading candles from CSV");

        let mut candles = Self::load_candles_from_csv(&path, symbol)?;
        if candles.is_empty() {
            return Err(EngineError::DataUnavailable(format!("CSV file '{}' has no candles", path.display())));
        }
        let start = candles.len().saturating_sub(limit as usize);
        candles.drain(..start);
        Ok(MarketData::new(symbol, interval, candles))
    }

    async fn fetch_tickers(&self) -> Result<Vec<Ticker24h>, EngineError> {
        let mut files: Vec<(String, Interval, PathBuf)> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                let (symbol, interval) = Self::split_file_name(&path)?;
                Some((symbol, interval, path))
            })
            .collect();
        // One ticker per symbol, taken from its finest-grained file.
        files.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.minutes().cmp(&b.1.minutes())));
        files.dedup_by(|a, b| a.0 == b.0);

        let mut tickers = Vec::with_capacity(files.len());
        for (symbol, _, path) in files {
            match Self::load_candles_from_csv(&path, &symbol) {
                Ok(candles) => tickers.extend(Self::ticker_from_candles(symbol, &candles)),
                Err(e) => tracing::warn!(%symbol, error = %e, "Skipping unreadable CSV file"),
            }
        }
        Ok(tickers)
    }
}
