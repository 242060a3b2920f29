use signal_engine::config::EngineSettings;
use signal_engine::data::{CsvMarketData, MarketDataSource, MarketDataStore};
use signal_engine::services::{AnalysisEngine, Command, ParseMode};
use signal_engine::EngineError;
use shared::models::{Action, Candle, Interval, RiskMode};
use chrono::{Duration, TimeZone, Utc};
use std::fmt::Write as _;
use std::sync::Arc;
use tempfile::TempDir;

const START_MS: i64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z

fn csv_rows(closes: &[f64], interval: Interval) -> String {
    let step_ms = interval.minutes() * 60_000;
    let mut out = String::from("open_time,open,high,low,close,volume,trades\n");
    for (i, close) in closes.iter().enumerate() {
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            START_MS + i as i64 * step_ms,
            close,
            close + 1.0,
            close - 1.0,
            close,
            10.0,
            4
        )
        .unwrap();
    }
    out
}

fn selloff(len: usize) -> Vec<f64> {
    (0..len).map(|i| 1000.0 - 0.05 * (i * i) as f64).collect()
}

fn rally(len: usize) -> Vec<f64> {
    (0..len).map(|i| 20.0 + 0.01 * (i * i) as f64).collect()
}

fn csv_engine(dir: &TempDir) -> AnalysisEngine {
    let source: Arc<dyn MarketDataSource> = Arc::new(CsvMarketData::new(dir.path()));
    AnalysisEngine::new(source, Arc::new(EngineSettings::default()))
}

#[tokio::test]
async fn signal_from_csv_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("ADAUSDT_1h.csv"), csv_rows(&selloff(120), Interval::Hour1)).unwrap();
    let engine = csv_engine(&dir);

    let decision = engine.signal("ada", RiskMode::Aggressive).await.unwrap();
    assert_eq!(decision.symbol, "ADAUSDT");
    assert_eq!(decision.action, Action::Sell);
    assert!(decision.trend.is_some());

    let reply = engine.respond_to_text("/signal ADA aggressive").await;
    assert_eq!(reply.parse_mode, ParseMode::Markdown);
    assert!(reply.text.contains("*Signal for ADA*"), "{}", reply.text);
    assert!(reply.text.ends_with("SELL"), "{}", reply.text);
}

#[tokio::test]
async fn scan_over_csv_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("AAAUSDT_4h.csv"), csv_rows(&rally(100), Interval::Hour4)).unwrap();
    std::fs::write(dir.path().join("BBBUSDT_4h.csv"), csv_rows(&selloff(100), Interval::Hour4)).unwrap();
    // Too short to score; must be skipped, not fail the scan.
    std::fs::write(dir.path().join("CCCUSDT_4h.csv"), csv_rows(&rally(10), Interval::Hour4)).unwrap();
    let engine = csv_engine(&dir);

    let top = engine.scan().await.unwrap();
    let coins: Vec<&str> = top.iter().map(|c| c.coin.as_str()).collect();
    assert_eq!(coins.len(), 2);
    assert!(coins.contains(&"AAA") && coins.contains(&"BBB"), "{:?}", coins);
    assert!(top[0].score >= top[1].score);

    let reply = engine.respond(&Command::Scan).await;
    assert!(reply.text.contains("Top 2 coins"), "{}", reply.text);
}

#[tokio::test]
async fn missing_coin_renders_error_reply() {
    let dir = TempDir::new().unwrap();
    let engine = csv_engine(&dir);

    let err = engine.levels("XRP").await.unwrap_err();
    assert!(matches!(err, EngineError::DataUnavailable(_)));

    let reply = engine.respond_to_text("/resistance xrp").await;
    assert_eq!(reply.parse_mode, ParseMode::Plain);
    assert!(reply.text.starts_with("⚠️ Error fetching data for XRP:"), "{}", reply.text);
}

#[tokio::test]
async fn compare_through_in_memory_store() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = |symbol: &str, closes: Vec<f64>| -> Vec<Candle> {
        closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| Candle {
                symbol: symbol.to_string(),
                open_time: start + Duration::hours(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 5.0,
                trades: 1,
            })
            .collect()
    };

    let mut store = MarketDataStore::new();
    store.add_candles("BTCUSDT", Interval::Hour1, candles("BTCUSDT", rally(100)));
    store.add_candles("ETHUSDT", Interval::Hour1, candles("ETHUSDT", vec![2000.0; 100]));
    let engine = AnalysisEngine::new(Arc::new(store), Arc::new(EngineSettings::default()));

    let reply = engine.respond_to_text("compare btc eth").await;
    assert_eq!(reply.parse_mode, ParseMode::Markdown);
    assert!(reply.text.contains("📊 *Comparison Analysis*"), "{}", reply.text);
    assert!(reply.text.ends_with("BTC is stronger."), "{}", reply.text);
}
