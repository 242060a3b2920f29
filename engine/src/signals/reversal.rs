// Trend-reversal signal: close/RSI divergence confirmed by MACD direction
use super::divergence::detect_divergence;
use crate::error::EngineError;
use crate::indicators::{latest_defined, IndicatorCalculator, Macd, Rsi};
use shared::models::{Action, Divergence, MarketData, ReversalSignal};

pub const CONFIRMED_CONFIDENCE: u8 = 85;
pub const LEANING_CONFIDENCE: u8 = 40;
pub const NEUTRAL_CONFIDENCE: u8 = 10;

/// A divergence only turns into BUY/SELL when MACD points the same way.
pub fn classify_reversal(divergence: Option<Divergence>, macd: f64, signal: f64) -> (Action, u8) {
    match divergence {
        Some(Divergence::Bullish) if macd > signal => (Action::Buy, CONFIRMED_CONFIDENCE),
        Some(Divergence::Bearish) if macd < signal => (Action::Sell, CONFIRMED_CONFIDENCE),
        _ if macd > signal => (Action::HoldSlightlyBullish, LEANING_CONFIDENCE),
        _ if macd < signal => (Action::HoldSlightlyBearish, LEANING_CONFIDENCE),
        _ => (Action::Hold, NEUTRAL_CONFIDENCE),
    }
}

pub fn evaluate_reversal(market: &MarketData) -> Result<ReversalSignal, EngineError> {
    let closes = market.closes();
    let price = market
        .last_close()
        .ok_or_else(|| EngineError::InsufficientData(format!("no candles for {}", market.symbol)))?;

    let rsi_calc = Rsi::default();
    let rsi_series = rsi_calc.calculate(&closes);
    let rsi = latest_defined(rsi_calc.name(), &rsi_series)?;

    let macd = Macd::new();
    let lines = macd.lines(&closes);
    let line = latest_defined(macd.name(), &lines.line)?;
    let signal = latest_defined(&macd.signal_name(), &lines.signal)?;

    let divergence = detect_divergence(&closes, &rsi_series);
    let (action, confidence) = classify_reversal(divergence, line.value, signal.value);
    tracing::debug!(symbol = %market.symbol, ?divergence, %action, "Reversal evaluated");

    Ok(ReversalSignal {
        symbol: market.symbol.clone(),
        price,
        rsi: rsi.value,
        macd: line.value,
        macd_signal: signal.value,
        divergence,
        macd_bullish: line.value > signal.value,
        confidence,
        action,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::pivots::local_lows_of;
    use crate::signals::test_support::{bullish_divergence_closes, market_from_closes};

    #[test]
    fn confirmed_divergences() {
        assert_eq!(classify_reversal(Some(Divergence::Bullish), 1.0, 0.5), (Action::Buy, 85));
        assert_eq!(classify_reversal(Some(Divergence::Bearish), -1.0, 0.5), (Action::Sell, 85));
    }

    #[test]
    fn unconfirmed_divergence_falls_back_to_macd_direction() {
        assert_eq!(
            classify_reversal(Some(Divergence::Bullish), -1.0, 0.5),
            (Action::HoldSlightlyBearish, 40)
        );
        assert_eq!(
            classify_reversal(Some(Divergence::Bearish), 1.0, 0.5),
            (Action::HoldSlightlyBullish, 40)
        );
        assert_eq!(classify_reversal(None, 1.0, 0.5), (Action::HoldSlightlyBullish, 40));
        assert_eq!(classify_reversal(None, 0.5, 0.5), (Action::Hold, 10));
    }

    #[test]
    fn steady_rally_has_no_divergence() {
        let closes: Vec<f64> = (0..200).map(|i| 50.0 + 0.01 * (i * i) as f64).collect();
        let signal = evaluate_reversal(&market_from_closes("BNBUSDT", &closes)).unwrap();

        assert_eq!(signal.divergence, None);
        assert!(signal.macd_bullish);
        assert_eq!(signal.action, Action::HoldSlightlyBullish);
        assert_eq!(signal.confidence, LEANING_CONFIDENCE);
        assert_eq!(signal.price, *closes.last().unwrap());
    }

    #[test]
    fn bullish_divergence_confirmed_by_macd_is_a_buy() {
        let closes = bullish_divergence_closes();
        let lows: Vec<(usize, f64)> = local_lows_of(&closes).iter().map(|p| (p.index, p.value)).collect();
        assert_eq!(lows, vec![(42, 110.0), (89, 109.0)]);

        let signal = evaluate_reversal(&market_from_closes("DOTUSDT", &closes)).unwrap();
        assert_eq!(signal.divergence, Some(Divergence::Bullish));
        assert!(signal.macd_bullish);
        assert_eq!(signal.action, Action::Buy);
        assert_eq!(signal.confidence, CONFIRMED_CONFIDENCE);

        // Same divergence before MACD turns up only leans bearish.
        let early = evaluate_reversal(&market_from_closes("DOTUSDT", &closes[..closes.len() - 2])).unwrap();
        assert_eq!(early.divergence, Some(Divergence::Bullish));
        assert_eq!(early.action, Action::HoldSlightlyBearish);
        assert_eq!(early.confidence, LEANING_CONFIDENCE);
    }

    #[test]
    fn short_series_is_insufficient_data() {
        let err = evaluate_reversal(&market_from_closes("BNBUSDT", &[1.0, 2.0, 3.0])).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData(_)));
    }
}
