// Least-squares slope over a trailing window
use super::IndicatorCalculator;

pub struct Slope {
    name: String,
    window: usize,
}

impl Slope {
    pub fn new(window: usize) -> Self {
        Self {
            name: format!("Slope({})", window),
            window,
        }
    }
}

/// Slope of the ordinary least-squares line through `(0, y0), (1, y1), ...`.
fn least_squares_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let (mut numerator, mut denominator) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        numerator += dx * (y - mean_y);
        denominator += dx * dx;
    }
    numerator / denominator
}

impl IndicatorCalculator for Slope {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        // A line needs two points.
        if self.window < 2 || data.len() < self.window {
            return vec![None; data.len()];
        }

        let mut results = vec![None; self.window - 1];
        for end in self.window..=data.len() {
            results.push(Some(least_squares_slope(&data[end - self.window..end])));
        }
        results
    }
}
