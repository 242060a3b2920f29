// Price/oscillator divergence from the two most recent pivots
use super::pivots::{local_highs, local_lows, most_recent};
use shared::models::{Divergence, Pivot};

/// Compares the last two pivots of price and oscillator (aligned by index).
///
/// Bullish: price makes a lower low while the oscillator makes a higher low.
/// Bearish: price makes a higher high while the oscillator makes a lower high.
/// Bullish wins when both hold. `None` whenever either series has fewer than
/// two pivots of the needed kind.
pub fn detect_divergence(prices: &[f64], oscillator: &[Option<f64>]) -> Option<Divergence> {
    let prices: Vec<Option<f64>> = prices.iter().copied().map(Some).collect();

    let price_lows = local_lows(&prices);
    let oscillator_lows = local_lows(oscillator);
    if let (Some((prev_price, last_price)), Some((prev_osc, last_osc))) =
        (last_two(&price_lows), last_two(&oscillator_lows))
    {
        if last_price.value < prev_price.value && last_osc.value > prev_osc.value {
            return Some(Divergence::Bullish);
        }
    }

    let price_highs = local_highs(&prices);
    let oscillator_highs = local_highs(oscillator);
    if let (Some((prev_price, last_price)), Some((prev_osc, last_osc))) =
        (last_two(&price_highs), last_two(&oscillator_highs))
    {
        if last_price.value > prev_price.value && last_osc.value < prev_osc.value {
            return Some(Divergence::Bearish);
        }
    }

    None
}

fn last_two(pivots: &[Pivot]) -> Option<(Pivot, Pivot)> {
    match most_recent(pivots, 2) {
        [previous, latest] => Some((*previous, *latest)),
        _ => None,
    }
}
