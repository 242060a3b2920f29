use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Fetch, network, timeout, rate-limit and unknown-symbol failures.
    #[error("Market data unavailable: {0}")]
    DataUnavailable(String),

    /// An indicator has no value at the index the engine needs.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    /// Short tag used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::ConfigError(_) => "config",
            EngineError::DataUnavailable(_) => "data_unavailable",
            EngineError::InsufficientData(_) => "insufficient_data",
            EngineError::InvalidInput(_) => "invalid_input",
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EngineError::DataUnavailable(format!("request timed out: {}", err))
        } else {
            EngineError::DataUnavailable(format!("request failed: {}", err))
        }
    }
}

impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        EngineError::DataUnavailable(format!("CSV parsing error: {}", err))
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::DataUnavailable(format!("I/O error: {}", err))
    }
}
