// Market data: fetch contract, exchange client, offline and in-memory sources
pub mod binance;
pub mod csv_parser;
pub mod kline_parser;
pub mod market_data;

pub use binance::BinanceClient;
pub use csv_parser::CsvMarketData;
pub use market_data::{MarketDataSource, MarketDataStore};
