// Engine facade: validates requests, dispatches to the handler modules and renders replies.
use crate::config::EngineSettings;
use crate::data::MarketDataSource;
use crate::error::EngineError;
use crate::services::command::Command;
use crate::services::render::{self, RenderedReply};
use shared::models::{Comparison, LevelReport, ReversalSignal, RiskMode, ScanCandidate, SignalDecision};
use std::sync::Arc;

pub mod compare;
pub mod get_levels;
pub mod get_reversal;
pub mod get_signal;
pub mod helpers;
pub mod scan_market;

use helpers::normalize_coin;

pub struct AnalysisEngine {
    source: Arc<dyn MarketDataSource>,
    settings: Arc<EngineSettings>,
}

impl AnalysisEngine {
    pub fn new(source: Arc<dyn MarketDataSource>, settings: Arc<EngineSettings>) -> Self {
        AnalysisEngine { source, settings }
    }

    pub async fn signal(&self, coin: &str, mode: RiskMode) -> Result<SignalDecision, EngineError> {
        let coin = normalize_coin(coin)?;
        tracing::info!(%coin, %mode, "Received signal request, dispatching to handler.");
        get_signal::handle_get_signal(&coin, mode, self.source.as_ref(), &self.settings).await
    }

    pub async fn reversal(&self, coin: &str) -> Result<ReversalSignal, EngineError> {
        let coin = normalize_coin(coin)?;
        tracing::info!(%coin, "Received reversal request, dispatching to handler.");
        get_reversal::handle_get_reversal(&coin, self.source.as_ref(), &self.settings).await
    }

    pub async fn levels(&self, coin: &str) -> Result<LevelReport, EngineError> {
        let coin = normalize_coin(coin)?;
        tracing::info!(%coin, "Received levels request, dispatching to handler.");
        get_levels::handle_get_levels(&coin, self.source.as_ref(), &self.settings).await
    }

    pub async fn scan(&self) -> Result<Vec<ScanCandidate>, EngineError> {
        tracing::info!(
            universe = self.settings.scan_universe_size,
            top = self.settings.scan_top_n,
            "Received scan request, dispatching to handler."
        );
        scan_market::handle_scan_market(self.source.as_ref(), &self.settings).await
    }

    pub async fn compare(&self, first: &str, second: &str) -> Result<Comparison, EngineError> {
        let first = normalize_coin(first)?;
        let second = normalize_coin(second)?;
        tracing::info!(%first, %second, "Received compare request, dispatching to handler.");
        compare::handle_compare(&first, &second, self.source.as_ref(), &self.settings).await
    }

    /// Runs a parsed command and renders the outcome. Errors become user-facing text.
    pub async fn respond(&self, command: &Command) -> RenderedReply {
        let result = match command {
            Command::Signal { coin, mode } => self.signal(coin, *mode).await.map(|d| render::signal(coin, &d)),
            Command::Reversal { coin } => self.reversal(coin).await.map(|r| render::reversal(coin, &r)),
            Command::Levels { coin } => self.levels(coin).await.map(|l| render::levels(coin, &l)),
            Command::Scan => self.scan().await.map(|c| render::scan(&c)),
            Command::Compare { first, second } => {
                self.compare(first, second).await.map(|c| render::comparison(first, second, &c))
            }
            Command::Help => Ok(render::help()),
        };

        result.unwrap_or_else(|e| {
            tracing::error!(command = %command, error = %e, kind = e.kind(), "Request failed");
            render::error(command, &e)
        })
    }

    /// Parses raw chat text and responds; unparsable text gets a usage hint.
    pub async fn respond_to_text(&self, text: &str) -> RenderedReply {
        match Command::parse(text) {
            Ok(command) => self.respond(&command).await,
            Err(e) => {
                tracing::debug!(%text, error = %e, "Rejected command text");
                render::invalid_command(&e)
            }
        }
    }
}
