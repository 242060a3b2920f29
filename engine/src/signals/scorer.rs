// Indicator votes, risk-mode thresholds, confidence and trend label
use crate::error::EngineError;
use crate::indicators::{latest_defined, latest_reading, IndicatorCalculator, Macd, Rsi, Slope, Sma};
use shared::models::{Action, MarketData, RiskMode, SignalDecision, TrendLabel};

pub const RSI_BULLISH_BELOW: f64 = 45.0;
pub const RSI_BEARISH_ABOVE: f64 = 55.0;
pub const TREND_WINDOW: usize = 10;

const RSI_WEIGHT: f64 = 0.4;
const MACD_WEIGHT: f64 = 0.4;
const PRICE_WEIGHT: f64 = 0.2;
/// Price/SMA20 gap at which the price component saturates.
const PRICE_GAP_SATURATION: f64 = 0.05;

/// Latest indicator values the scorer works from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub price: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub sma20: f64,
    pub sma50: Option<f64>,
    pub slope: Option<f64>,
}

impl IndicatorSnapshot {
    /// Fails with `InsufficientData` when RSI, MACD, its signal or SMA20 is undefined at the latest candle.
    pub fn from_market(market: &MarketData) -> Result<Self, EngineError> {
        let closes = market.closes();
        let price = market
            .last_close()
            .ok_or_else(|| EngineError::InsufficientData(format!("no candles for {}", market.symbol)))?;

        let rsi = latest_reading(&Rsi::default(), &closes)?;
        let macd = Macd::new();
        let lines = macd.lines(&closes);
        let line = latest_defined(macd.name(), &lines.line)?;
        let signal = latest_defined(&macd.signal_name(), &lines.signal)?;
        let sma20 = latest_reading(&Sma::new(20), &closes)?;

        Ok(Self {
            price,
            rsi: rsi.value,
            macd: line.value,
            macd_signal: signal.value,
            sma20: sma20.value,
            sma50: latest_reading(&Sma::new(50), &closes).ok().map(|r| r.value),
            slope: latest_reading(&Slope::new(TREND_WINDOW), &closes).ok().map(|r| r.value),
        })
    }

    pub fn score(&self) -> i8 {
        rsi_vote(self.rsi) + macd_vote(self.macd, self.macd_signal) + sma_vote(self.price, self.sma20)
    }
}

pub fn rsi_vote(rsi: f64) -> i8 {
    if rsi < RSI_BULLISH_BELOW {
        1
    } else if rsi > RSI_BEARISH_ABOVE {
        -1
    } else {
        0
    }
}

pub fn macd_vote(macd: f64, signal: f64) -> i8 {
    sign_vote(macd, signal)
}

pub fn sma_vote(price: f64, sma20: f64) -> i8 {
    sign_vote(price, sma20)
}

fn sign_vote(value: f64, reference: f64) -> i8 {
    if value > reference {
        1
    } else if value < reference {
        -1
    } else {
        0
    }
}

/// Threshold table: safe needs all three votes, balanced two, aggressive any net vote.
pub fn decide(mode: RiskMode, score: i8) -> Action {
    let threshold = match mode {
        RiskMode::Safe => 3,
        RiskMode::Balanced => 2,
        RiskMode::Aggressive => 1,
    };
    if score >= threshold {
        Action::Buy
    } else if score <= -threshold {
        Action::Sell
    } else {
        Action::Hold
    }
}

/// Weighted strength of the three inputs, 0..=100.
pub fn confidence(snapshot: &IndicatorSnapshot) -> u8 {
    let r = ((snapshot.rsi - 50.0).abs() / 50.0).min(1.0);

    let spread = snapshot.macd.abs() + snapshot.macd_signal.abs();
    let m = if spread == 0.0 {
        0.0
    } else {
        (snapshot.macd - snapshot.macd_signal).abs() / spread
    };

    let p = if snapshot.sma20 == 0.0 {
        0.0
    } else {
        ((snapshot.price - snapshot.sma20).abs() / snapshot.sma20.abs() / PRICE_GAP_SATURATION).min(1.0)
    };

    let raw = (100.0 * (RSI_WEIGHT * r + MACD_WEIGHT * m + PRICE_WEIGHT * p)).round();
    raw.clamp(0.0, 100.0) as u8
}

pub fn trend_label(slope: Option<f64>, sma20: f64, sma50: Option<f64>) -> Option<TrendLabel> {
    let slope = slope?;
    let sma50 = sma50?;
    Some(if slope > 0.0 && sma20 > sma50 {
        TrendLabel::Uptrend
    } else if slope < 0.0 && sma20 < sma50 {
        TrendLabel::Downtrend
    } else {
        TrendLabel::Sideways
    })
}

pub fn evaluate_signal(mode: RiskMode, market: &MarketData) -> Result<SignalDecision, EngineError> {
    let snapshot = IndicatorSnapshot::from_market(market)?;
    let score = snapshot.score();
    let action = decide(mode, score);

    tracing::debug!(
        symbol = %market.symbol,
        %mode,
        rsi = snapshot.rsi,
        macd = snapshot.macd,
        macd_signal = snapshot.macd_signal,
        score,
        %action,
        "Signal scored"
    );

    Ok(SignalDecision {
        symbol: market.symbol.clone(),
        mode,
        price: snapshot.price,
        rsi: snapshot.rsi,
        macd: snapshot.macd,
        macd_signal: snapshot.macd_signal,
        sma20: snapshot.sma20,
        score,
        confidence: confidence(&snapshot),
        trend: trend_label(snapshot.slope, snapshot.sma20, snapshot.sma50),
        action,
    })
}
