// Relative Strength Index (RSI) indicator implementation
use super::IndicatorCalculator;

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        if data.len() <= self.period || self.period == 0 {
            return vec![None; data.len()];
        }

        let mut results = vec![None; self.period]; // RSI needs 'period' initial changes

        let mut gains = 0.0;
        let mut losses = 0.0;
        for i in 1..=self.period {
            let change = data[i] - data[i - 1];
            if change > 0.0 {
                gains += change;
            } else {
                losses -= change;
            }
        }

        let mut avg_gain = gains / self.period as f64;
        let mut avg_loss = losses / self.period as f64;
        results.push(Some(rsi_from_averages(avg_gain, avg_loss)));

        // Wilder smoothing
        for i in (self.period + 1)..data.len() {
            let change = data[i] - data[i - 1];
            let (current_gain, current_loss) = if change > 0.0 { (change, 0.0) } else { (0.0, -change) };

            avg_gain = (avg_gain * (self.period - 1) as f64 + current_gain) / self.period as f64;
            avg_loss = (avg_loss * (self.period - 1) as f64 + current_loss) / self.period as f64;
            results.push(Some(rsi_from_averages(avg_gain, avg_loss)));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_calculation() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03, 45.61, 46.28,
            46.28, 46.00, 46.03, 46.41, 46.22, 45.64, 46.25,
        ];

        let results = Rsi::new(14).calculate(&closes);
        assert_eq!(results.len(), closes.len());
        for (i, value) in results.iter().enumerate().take(14) {
            assert_eq!(*value, None, "Expected None at index {}", i);
        }

        // Stockcharts reference values with SMA-seeded Wilder smoothing.
        let rsi_14 = results[14].unwrap();
        assert!(rsi_14 > 65.0 && rsi_14 < 75.0, "RSI[14] out of expected range: {}", rsi_14);
        let rsi_15 = results[15].unwrap();
        assert!(rsi_15 > 60.0 && rsi_15 < 70.0, "RSI[15] out of expected range: {}", rsi_15);
        let rsi_17 = results[17].unwrap();
        assert!(rsi_17 > rsi_15, "RSI should rise with the 46.41 close");
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let results = Rsi::new(14).calculate(&[1.0; 10]);
        assert_eq!(results, vec![None; 10]);
    }

    #[test]
    fn test_rsi_exactly_period_points_is_undefined() {
        // 14 points only hold 13 changes.
        let results = Rsi::new(14).calculate(&[1.0; 14]);
        assert_eq!(results, vec![None; 14]);
    }

    #[test]
    fn test_rsi_all_gains() {
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let results = Rsi::new(14).calculate(&closes);
        assert!(results[..14].iter().all(Option::is_none));
        assert!(results[14..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn test_rsi_all_losses() {
        let closes: Vec<f64> = (1..=20).map(|i| 20.0 - i as f64).collect();
        let results = Rsi::new(14).calculate(&closes);
        assert!(results[..14].iter().all(Option::is_none));
        assert!(results[14..].iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_rsi_recovery_after_dip_is_above_55() {
        let mut closes = vec![100.0; 20];
        closes.extend_from_slice(&[99.0, 98.0, 97.0, 96.0, 95.0, 97.0, 99.0, 101.0, 102.0]);
        let results = Rsi::new(14).calculate(&closes);
        let peak = results.last().unwrap().unwrap();
        assert!(peak > 55.0, "RSI at the recovered peak was {}", peak);
        assert!(peak < 80.0, "RSI at the recovered peak was {}", peak);
    }

    #[test]
    fn test_rsi_zero_period() {
        assert_eq!(Rsi::new(0).calculate(&[1.0, 2.0]), vec![None, None]);
    }
}
