// Engine settings, loaded from an optional JSON file plus environment overrides
use crate::error::EngineError;
use serde::Deserialize;
use shared::models::Interval;
use std::path::Path;
use std::time::Duration;

pub const ENV_API_URL: &str = "SIGNAL_ENGINE_API_URL";
pub const ENV_QUOTE_ASSET: &str = "SIGNAL_ENGINE_QUOTE_ASSET";
pub const ENV_TIMEOUT_SECS: &str = "SIGNAL_ENGINE_TIMEOUT_SECS";

/// Most candles the exchange returns for one klines request.
pub const MAX_KLINE_LIMIT: u32 = 1000;

/// Candle window fetched for one kind of analysis.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct FetchProfile {
    pub interval: Interval,
    pub limit: u32,
}

impl FetchProfile {
    pub const fn new(interval: Interval, limit: u32) -> Self {
        Self { interval, limit }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub api_base_url: String,
    pub quote_asset: String,
    pub request_timeout_secs: u64,
    pub max_requests_per_second: u32,
    pub scan_universe_size: usize,
    pub scan_top_n: usize,
    pub scan_concurrency: usize,
    pub signal: FetchProfile,
    pub reversal: FetchProfile,
    pub levels: FetchProfile,
    pub scan: FetchProfile,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            api_base_url: "https://api.binance.com".to_string(),
            quote_asset: "USDT".to_string(),
            request_timeout_secs: 10,
            max_requests_per_second: 10,
            scan_universe_size: 50,
            scan_top_n: 3,
            scan_concurrency: 4,
            signal: FetchProfile::new(Interval::Hour1, 100),
            reversal: FetchProfile::new(Interval::Hour4, 200),
            levels: FetchProfile::new(Interval::Hour4, 200),
            scan: FetchProfile::new(Interval::Hour4, 100),
        }
    }
}

impl EngineSettings {
    /// Defaults, overlaid with `path` when given, then with environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let settings = match path {
            Some(p) => Self::from_json_file(p)?,
            None => Self::default(),
        };
        let settings = settings.with_env_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
        serde_json::from_str(raw).map_err(|e| EngineError::ConfigError(format!("Invalid config JSON: {}", e)))
    }

    /// `lookup` is injected so tests don't have to mutate the process environment.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(quote) = lookup(ENV_QUOTE_ASSET) {
            self.quote_asset = quote.trim().to_uppercase();
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = timeout.trim().parse().map_err(|_| {
                EngineError::ConfigError(format!("{} must be an integer, got '{}'", ENV_TIMEOUT_SECS, timeout))
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.api_base_url.trim().is_empty() {
            return Err(EngineError::ConfigError("api_base_url must not be empty".into()));
        }
        if self.quote_asset.trim().is_empty() {
            return Err(EngineError::ConfigError("quote_asset must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(EngineError::ConfigError("request_timeout_secs must be greater than 0".into()));
        }
        if self.max_requests_per_second == 0 {
            return Err(EngineError::ConfigError("max_requests_per_second must be greater than 0".into()));
        }
        if self.scan_concurrency == 0 {
            return Err(EngineError::ConfigError("scan_concurrency must be greater than 0".into()));
        }
        for (name, profile) in [
            ("signal", &self.signal),
            ("reversal", &self.reversal),
            ("levels", &self.levels),
            ("scan", &self.scan),
        ] {
            if profile.limit == 0 {
                return Err(EngineError::ConfigError(format!("{}.limit must be greater than 0", name)));
            }
            if profile.limit > MAX_KLINE_LIMIT {
                return Err(EngineError::ConfigError(format!(
                    "{}.limit must be at most {}, got {}",
                    name, MAX_KLINE_LIMIT, profile.limit
                )));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Exchange symbol for a coin ticker, e.g. `BTC` -> `BTCUSDT`.
    pub fn symbol_for(&self, coin: &str) -> String {
        format!("{}{}", coin, self.quote_asset)
    }
}
