// Binance public REST client (no API key needed for klines and tickers)
use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use shared::models::{Interval, MarketData, Ticker24h};
use std::num::NonZeroU32;

use super::kline_parser::{parse_klines, parse_tickers, ApiErrorBody, RawTicker};
use super::market_data::MarketDataSource;
use crate::config::EngineSettings;
use crate::error::EngineError;

const KLINES_PATH: &str = "/api/v3/klines";
const TICKER_24H_PATH: &str = "/api/v3/ticker/24hr";

pub struct BinanceClient {
    http: Client,
    base_url: String,
    /// Client-side GCRA limiter; the exchange's own limit is otherwise only visible as 429s.
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl BinanceClient {
    pub fn new(settings: &EngineSettings) -> Result<Self, EngineError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| EngineError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let rate = NonZeroU32::new(settings.max_requests_per_second)
            .ok_or_else(|| EngineError::ConfigError("max_requests_per_second must be greater than 0".into()))?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::direct(Quota::per_second(rate)),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Maps non-success responses to `DataUnavailable`, pulling the exchange message out of the body when present.
    async fn ensure_success(response: Response, context: &str) -> Result<Response, EngineError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // 418 is the exchange's IP ban after ignoring 429s.
        if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() == 418 {
            tracing::warn!(%context, status = status.as_u16(), "Exchange rate limit hit");
            return Err(EngineError::DataUnavailable(format!(
                "rate limited by exchange (HTTP {}) while fetching {}",
                status.as_u16(),
                context
            )));
        }

        let body = response.text().await.unwrap_or_else(|_| "Unknown API error".to_string());
        let message = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(api_error) => format!("{} (code {})", api_error.msg, api_error.code),
            Err(_) => body,
        };
        tracing::warn!(%context, status = status.as_u16(), %message, "Exchange rejected request");
        Err(EngineError::DataUnavailable(format!(
            "exchange rejected request for {} (HTTP {}): {}",
            context,
            status.as_u16(),
            message
        )))
    }
}

#[async_trait]
impl MarketDataSource for BinanceClient {
    async fn fetch_candles(&self, symbol: &str, interval: Interval, limit: u32) -> Result<MarketData, EngineError> {
        self.limiter.until_ready().await;
        tracing::debug!(%symbol, %interval, limit, "Fetching klines");

        let limit_param = limit.to_string();
        let response = self
            .http
            .get(self.url(KLINES_PATH))
            .query(&[("symbol", symbol), ("interval", interval.code()), ("limit", limit_param.as_str())])
            .send()
            .await?;
        let response = Self::ensure_success(response, symbol).await?;

        let rows: Vec<Value> = response.json().await?;
        if rows.is_empty() {
            return Err(EngineError::DataUnavailable(format!("no candles returned for {}", symbol)));
        }
        let candles = parse_klines(symbol, &rows)?;
        Ok(MarketData::new(symbol, interval, candles))
    }

    async fn fetch_tickers(&self) -> Result<Vec<Ticker24h>, EngineError> {
        self.limiter.until_ready().await;
        tracing::debug!("Fetching 24h tickers");

        let response = self.http.get(self.url(TICKER_24H_PATH)).send().await?;
        let response = Self::ensure_success(response, "24h tickers").await?;

        let raw: Vec<RawTicker> = response.json().await?;
        Ok(parse_tickers(raw))
    }
}
