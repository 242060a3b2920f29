// Technical indicators module
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod slope;
pub mod sma;

pub use ema::Ema;
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;
pub use slope::Slope;
pub use sma::Sma;

use crate::error::EngineError;
use shared::models::IndicatorReading;

/// Common trait for all indicators over a price series.
///
/// Output is aligned with the input: one slot per price, `None` where the
/// indicator is not defined yet (lookback not filled, zero period, ...).
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>>;
}

/// Value at the last index of `values`, or `InsufficientData` if that slot is undefined.
pub fn latest_defined(name: &str, values: &[Option<f64>]) -> Result<IndicatorReading, EngineError> {
    match values.last() {
        Some(Some(value)) => Ok(IndicatorReading {
            name: name.to_string(),
            value: *value,
            index: values.len() - 1,
        }),
        _ => Err(EngineError::InsufficientData(format!(
            "{} has no value at the latest candle ({} points available)",
            name,
            values.len()
        ))),
    }
}

pub fn latest_reading(calculator: &dyn IndicatorCalculator, data: &[f64]) -> Result<IndicatorReading, EngineError> {
    latest_defined(calculator.name(), &calculator.calculate(data))
}
