// Support/resistance from the most recent low/high pivots
use super::pivots::{local_highs_of, local_lows_of};
use crate::error::EngineError;
use shared::models::{Level, LevelReport, MarketData, Pivot, Proximity};

/// Relative distance below which a level counts as imminent (strict).
pub const PROXIMITY_THRESHOLD: f64 = 0.01;

pub fn classify_proximity(price: f64, level: f64) -> Proximity {
    if price > 0.0 && (price - level).abs() / price < PROXIMITY_THRESHOLD {
        Proximity::Imminent
    } else {
        Proximity::Distant
    }
}

/// Support is the latest pivot low of the low series, resistance the latest
/// pivot high of the high series. A missing pivot is reported as `None`.
pub fn locate_levels(market: &MarketData) -> Result<LevelReport, EngineError> {
    let price = market
        .last_close()
        .ok_or_else(|| EngineError::InsufficientData(format!("no candles for {}", market.symbol)))?;

    let support = local_lows_of(&market.lows()).last().map(|pivot| to_level(pivot, price, price - pivot.value));
    let resistance = local_highs_of(&market.highs())
        .last()
        .map(|pivot| to_level(pivot, price, pivot.value - price));

    Ok(LevelReport {
        symbol: market.symbol.clone(),
        price,
        support,
        resistance,
    })
}

fn to_level(pivot: &Pivot, price: f64, distance: f64) -> Level {
    Level {
        value: pivot.value,
        index: pivot.index,
        distance,
        proximity: classify_proximity(price, pivot.value),
    }
}
