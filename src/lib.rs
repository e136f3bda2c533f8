//! stockchart - stock charting server with moving-average and Fibonacci overlays

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use config::Config;
use services::{ChartCache, StockRepository};
use sources::YahooFinanceClient;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repository: Arc<dyn StockRepository>,
    pub yahoo: Arc<YahooFinanceClient>,
    pub chart_cache: Arc<ChartCache>,
}

impl AppState {
    /// Build the state around an already opened repository.
    pub fn new(config: Config, repository: Arc<dyn StockRepository>) -> error::Result<Self> {
        let yahoo = YahooFinanceClient::new(&config.yahoo_base_url, config.request_timeout())?;
        let chart_cache = ChartCache::new(config.chart_cache_ttl());

        Ok(Self {
            config: Arc::new(config),
            repository,
            yahoo: Arc::new(yahoo),
            chart_cache: Arc::new(chart_cache),
        })
    }
}

// Re-export commonly used types
pub use services::indicators::{align, align_sma, compute_fibonacci_levels, compute_sma, price_range};
pub use types::*;
