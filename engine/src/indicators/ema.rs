// Exponential Moving Average (EMA) indicator implementation
use super::IndicatorCalculator;

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let values: Vec<Option<f64>> = data.iter().copied().map(Some).collect();
        ema_over(&values, self.period)
    }
}

/// EMA over a partially defined series.
///
/// Seeded with the SMA of the first `period` defined values. An undefined
/// value restarts the seeding, so leading `None`s (e.g. a MACD line before
/// the slow EMA exists) simply shift the first output.
pub(crate) fn ema_over(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut results = vec![None; values.len()];
    if period == 0 {
        return results;
    }
    let multiplier = 2.0 / (period as f64 + 1.0);

    let mut seed_sum = 0.0;
    let mut seed_count = 0;
    let mut previous: Option<f64> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(v) = *value else {
            seed_sum = 0.0;
            seed_count = 0;
            previous = None;
            continue;
        };
        match previous {
            Some(prev) => {
                let ema = (v - prev) * multiplier + prev;
                results[i] = Some(ema);
                previous = Some(ema);
            }
            None => {
                seed_sum += v;
                seed_count += 1;
                if seed_count == period {
                    let sma = seed_sum / period as f64;
                    results[i] = Some(sma);
                    previous = Some(sma);
                }
            }
        }
    }
    results
}
