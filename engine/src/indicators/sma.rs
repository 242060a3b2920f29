// Simple Moving Average (SMA) indicator implementation
use super::IndicatorCalculator;

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        if self.period == 0 || data.len() < self.period {
            return vec![None; data.len()];
        }

        let mut results = vec![None; self.period - 1];

        let mut sum: f64 = data.iter().take(self.period).sum();
        results.push(Some(sum / self.period as f64));

        // Slide the window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            results.push(Some(sum / self.period as f64));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::assert_option_vec_close;

    #[test]
    fn test_sma_calculation() {
        let results = Sma::new(3).calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_option_vec_close(&results, &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let results = Sma::new(3).calculate(&[1.0, 2.0]);
        assert_option_vec_close(&results, &[None, None]);
    }

    #[test]
    fn test_sma_period_one() {
        let results = Sma::new(1).calculate(&[1.0, 2.0, 3.0]);
        assert_option_vec_close(&results, &[Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_sma_empty_data() {
        assert!(Sma::new(3).calculate(&[]).is_empty());
    }

    #[test]
    fn test_sma_period_zero_yields_no_values() {
        assert_eq!(Sma::new(0).calculate(&[1.0, 2.0]), vec![None, None]);
    }
}
