// Moving Average Convergence Divergence (MACD) indicator implementation
use super::ema::ema_over;
use super::IndicatorCalculator;

pub const FAST_PERIOD: usize = 12;
pub const SLOW_PERIOD: usize = 26;
pub const SIGNAL_PERIOD: usize = 9;

/// MACD line and signal line, both aligned with the input prices.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

/// MACD(12, 26, 9). `calculate` yields the MACD line; use `lines` for the signal line too.
pub struct Macd {
    name: String,
}

impl Macd {
    pub fn new() -> Self {
        Self {
            name: format!("MACD({},{},{})", FAST_PERIOD, SLOW_PERIOD, SIGNAL_PERIOD),
        }
    }

    pub fn signal_name(&self) -> String {
        format!("MACD signal({})", SIGNAL_PERIOD)
    }

    pub fn lines(&self, data: &[f64]) -> MacdSeries {
        let prices: Vec<Option<f64>> = data.iter().copied().map(Some).collect();
        let fast = ema_over(&prices, FAST_PERIOD);
        let slow = ema_over(&prices, SLOW_PERIOD);

        let line: Vec<Option<f64>> = fast
            .iter()
            .zip(slow.iter())
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();
        let signal = ema_over(&line, SIGNAL_PERIOD);

        MacdSeries { line, signal }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorCalculator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        self.lines(data).line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::assert_close;

    #[test]
    fn test_macd_first_defined_indices() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let series = Macd::new().lines(&prices);
        assert_eq!(series.line.len(), 40);
        assert!(series.line[24].is_none());
        assert!(series.line[25].is_some());
        assert!(series.signal[32].is_none());
        assert!(series.signal[33].is_some());
    }

    #[test]
    fn test_macd_insufficient_data() {
        let series = Macd::new().lines(&[1.0; 30]);
        assert!(series.signal.iter().all(Option::is_none));
    }

    #[test]
    fn test_macd_flat_prices_is_zero() {
        let series = Macd::new().lines(&[50.0; 60]);
        assert_close(series.line[59].unwrap(), 0.0, 1e-12);
        assert_close(series.signal[59].unwrap(), 0.0, 1e-12);
    }

    #[test]
    fn test_macd_rising_prices_line_above_signal() {
        // Accelerating rise keeps the fast EMA pulling away from the slow one.
        let prices: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64).powi(2) * 0.05).collect();
        let series = Macd::new().lines(&prices);
        let line = series.line[79].unwrap();
        let signal = series.signal[79].unwrap();
        assert!(line > 0.0);
        assert!(line > signal, "line {} should be above signal {}", line, signal);
    }
}
