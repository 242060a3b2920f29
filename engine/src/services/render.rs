// Chat-ready text for engine results
use super::command::Command;
use crate::error::EngineError;
use shared::models::{Comparison, Level, LevelReport, Proximity, ReversalSignal, ScanCandidate, SignalDecision};
use shared::utils::format_price;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// `*bold*` and `` `code` `` markup.
    Markdown,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReply {
    pub text: String,
    pub parse_mode: ParseMode,
}

impl RenderedReply {
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: ParseMode::Markdown,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: ParseMode::Plain,
        }
    }
}

/// Quote asset of `symbol` given its coin, e.g. `USDT` for (`BTC`, `BTCUSDT`).
fn quote_of<'a>(coin: &str, symbol: &'a str) -> &'a str {
    symbol.strip_prefix(coin).unwrap_or(symbol)
}

pub fn signal(coin: &str, decision: &SignalDecision) -> RenderedReply {
    let mut text = format!(
        "📈 *Signal for {}* ({} mode)\n\n\
         💰 Price: `{} {}`\n\
         📊 RSI: `{:.2}`\n\
         📉 MACD: `{:.4}` | Signal: `{:.4}`\n\
         📏 SMA20: `{}`\n\
         🎯 Confidence: `{}%`\n",
        coin,
        decision.mode,
        format_price(decision.price),
        quote_of(coin, &decision.symbol),
        decision.rsi,
        decision.macd,
        decision.macd_signal,
        format_price(decision.sma20),
        decision.confidence,
    );
    if let Some(trend) = decision.trend {
        text.push_str(&format!("📈 Trend: `{}`\n", trend));
    }
    text.push_str(&format!("\n➡️ *Recommendation:* {}", decision.action));
    RenderedReply::markdown(text)
}

pub fn reversal(coin: &str, signal: &ReversalSignal) -> RenderedReply {
    let divergence = signal
        .divergence
        .map(|d| d.to_string())
        .unwrap_or_else(|| "none".to_string());
    let macd_trend = if signal.macd_bullish { "Bullish" } else { "Bearish" };

    RenderedReply::markdown(format!(
        "📈 *Trend Reversal Signal for {}*\n\n\
         💰 Price: `{} {}`\n\
         📊 RSI: `{:.2}`\n\
         📉 MACD: `{:.4}` | Signal: `{:.4}`\n\
         🔍 Divergence: `{}`\n\
         📉 MACD Trend: `{}`\n\
         🎯 Confidence: `{}%`\n\n\
         ➡️ *Recommendation: {}*",
        coin,
        format_price(signal.price),
        quote_of(coin, &signal.symbol),
        signal.rsi,
        signal.macd,
        signal.macd_signal,
        divergence,
        macd_trend,
        signal.confidence,
        signal.action,
    ))
}

pub fn levels(coin: &str, report: &LevelReport) -> RenderedReply {
    let quote = quote_of(coin, &report.symbol);
    let level_value = |level: &Option<Level>| {
        level
            .as_ref()
            .map(|l| format_price(l.value))
            .unwrap_or_else(|| "none found".to_string())
    };

    let support_note = match &report.support {
        Some(level) if level.proximity == Proximity::Imminent => "Price very close to support → possible bounce".to_string(),
        Some(level) => format!("Distance to support: {} {}", format_price(level.distance), quote),
        None => "No support found".to_string(),
    };
    let resistance_note = match &report.resistance {
        Some(level) if level.proximity == Proximity::Imminent => {
            "Price very close to resistance → possible end of the up-move".to_string()
        }
        Some(level) => format!("Distance to resistance: {} {}", format_price(level.distance), quote),
        None => "No resistance found".to_string(),
    };

    RenderedReply::markdown(format!(
        "📈 *Support/Resistance for {}*\n\n\
         💰 Current price: `{} {}`\n\
         📏 Support: `{}`\n\
         📏 Resistance: `{}`\n\
         📝 Assessment:\n\
         {}\n\
         {}",
        coin,
        format_price(report.price),
        quote,
        level_value(&report.support),
        level_value(&report.resistance),
        support_note,
        resistance_note,
    ))
}

pub fn scan(candidates: &[ScanCandidate]) -> RenderedReply {
    if candidates.is_empty() {
        return RenderedReply::plain("🔍 No coin qualified in this scan. Try again later.");
    }

    let mut text = format!("🔥 *Top {} coins for a bullish reversal:*\n\n", candidates.len());
    for (i, c) in candidates.iter().enumerate() {
        let suggestion = if c.is_strong_entry() { "strong entry" } else { "possible entry" };
        let quote = quote_of(&c.coin, &c.symbol);
        text.push_str(&format!(
            "{}. {}\n\
             💰 Price: {} {}\n\
             📊 RSI: {:.2}\n\
             📉 MACD: {:.4} | Signal: {:.4}\n\
             📏 Support: {} | Resistance: {}\n\
             🎯 Score: {}/100\n\
             📝 Suggestion: {}, possible exit: {} {}\n\n",
            i + 1,
            c.coin,
            format_price(c.price),
            quote,
            c.rsi,
            c.macd,
            c.macd_signal,
            format_price(c.support),
            format_price(c.resistance),
            c.score,
            suggestion,
            format_price(c.resistance),
            quote,
        ));
    }
    RenderedReply::markdown(text.trim_end().to_string())
}

pub fn comparison(first: &str, second: &str, comparison: &Comparison) -> RenderedReply {
    let verdict = match &comparison.stronger {
        Some(coin) => format!("{} is stronger.", coin),
        None => "Both equally strong.".to_string(),
    };
    RenderedReply::markdown(format!(
        "📊 *Comparison Analysis*\n\n\
         {}: *{}* ({}%)\n\
         {}: *{}* ({}%)\n\n\
         ➡️ *Recommendation:* {}",
        first,
        comparison.first.action,
        comparison.first.confidence,
        second,
        comparison.second.action,
        comparison.second.confidence,
        verdict,
    ))
}

pub fn help() -> RenderedReply {
    RenderedReply::markdown(
        "ℹ️ *Commands*\n\n\
         /signal BTC [safe|balanced|aggressive] - BUY/SELL/HOLD from RSI, MACD and SMA20\n\
         /reversal BTC - RSI divergence confirmed by MACD\n\
         /resistance BTC - latest support and resistance\n\
         /scan - top coins for a bullish reversal\n\
         /compare BTC ETH - which of two coins looks stronger\n\n\
         📊 *RSI* - overbought above 70, oversold below 30.\n\
         📉 *MACD* - a line above its signal is a bullish crossover.\n\
         📏 *SMA* - price above the average points to an uptrend.\n\
         📈 *Trend* - whether the market is rising, falling or moving sideways.\n\
         🎯 *Confidence* - how strongly the indicators agree (0-100%).",
    )
}

pub fn error(command: &Command, err: &EngineError) -> RenderedReply {
    if let EngineError::InvalidInput(msg) = err {
        return RenderedReply::plain(format!("❌ {}", msg));
    }
    match command.subject() {
        Some(subject) => RenderedReply::plain(format!("⚠️ Error fetching data for {}: {}", subject, err)),
        None => RenderedReply::plain(format!("⚠️ Market scan failed: {}", err)),
    }
}

pub fn invalid_command(err: &EngineError) -> RenderedReply {
    match err {
        EngineError::InvalidInput(msg) => RenderedReply::plain(format!("❌ {}", msg)),
        other => RenderedReply::plain(format!("❌ {}", other)),
    }
}
