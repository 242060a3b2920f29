// Handler for comparing two coins
use super::get_signal::handle_get_signal;
use crate::config::EngineSettings;
use crate::data::MarketDataSource;
use crate::error::EngineError;
use shared::models::{Comparison, RiskMode};
use std::cmp::Ordering;

pub const COMPARE_MODE: RiskMode = RiskMode::Balanced;

/// Both signals are fetched concurrently; either failing fails the comparison.
pub async fn handle_compare(
    first: &str,
    second: &str,
    source: &dyn MarketDataSource,
    settings: &EngineSettings,
) -> Result<Comparison, EngineError> {
    tracing::debug!(%first, %second, "Handling compare request in dedicated handler");

    let (first_result, second_result) = tokio::join!(
        handle_get_signal(first, COMPARE_MODE, source, settings),
        handle_get_signal(second, COMPARE_MODE, source, settings),
    );
    let first_decision = first_result?;
    let second_decision = second_result?;

    let stronger = match first_decision.confidence.cmp(&second_decision.confidence) {
        Ordering::Greater => Some(first.to_string()),
        Ordering::Less => Some(second.to_string()),
        Ordering::Equal => None,
    };

    Ok(Comparison {
        first: first_decision,
        second: second_decision,
        stronger,
    })
}
