// Signal engine entry point: answers chat-style commands on stdout
use anyhow::{Context, Result};
use clap::Parser;
use signal_engine::config::EngineSettings;
use signal_engine::data::{BinanceClient, CsvMarketData, MarketDataSource};
use signal_engine::services::{AnalysisEngine, RenderedReply};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Crypto signal engine: /signal, /reversal, /resistance, /scan, /compare")]
struct Cli {
    /// JSON settings file; defaults apply to anything it leaves out.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read candles from `<SYMBOL>_<interval>.csv` files here instead of the exchange.
    #[arg(long, value_name = "DIR")]
    csv_dir: Option<PathBuf>,

    /// One-shot command, e.g. `signal BTC balanced`. Without it commands are read from stdin.
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

fn print_reply(reply: &RenderedReply) {
    println!("{}\n", reply.text);
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Arc::new(EngineSettings::load(cli.config.as_deref()).context("Failed to load settings")?);

    let source: Arc<dyn MarketDataSource> = match &cli.csv_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Using offline CSV candles");
            Arc::new(CsvMarketData::new(dir.clone()))
        }
        None => {
            info!(api = %settings.api_base_url, "Using exchange market data");
            Arc::new(BinanceClient::new(&settings).context("Failed to build exchange client")?)
        }
    };
    let engine = AnalysisEngine::new(source, settings);

    if !cli.command.is_empty() {
        let reply = engine.respond_to_text(&cli.command.join(" ")).await;
        print_reply(&reply);
        return Ok(());
    }

    info!("Reading commands from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = engine.respond_to_text(&line).await;
        print_reply(&reply);
    }
    Ok(())
}
