use crate::services::chart::DEFAULT_SMA_PERIODS;
use crate::sources::yahoo::DEFAULT_BASE_URL;
use std::env;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// SQLite database file. `None` keeps everything in memory.
    pub database_path: Option<String>,
    /// Base URL of the Yahoo Finance API.
    pub yahoo_base_url: String,
    /// Upstream request timeout (seconds).
    pub request_timeout_secs: u64,
    /// How long parsed chart responses are reused (seconds, 0 = off).
    pub chart_cache_ttl_secs: u64,
    /// Moving-average windows used when a request names none.
    pub default_sma_periods: Vec<usize>,
}

/// Parse a comma-separated list of window lengths, e.g. `25,50,200`.
/// Returns `None` if any entry is not a positive integer.
pub fn parse_periods(s: &str) -> Option<Vec<usize>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<usize>().ok().filter(|&n| n > 0))
        .collect()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            database_path: env::var("DATABASE_PATH").ok().filter(|p| !p.is_empty()),
            yahoo_base_url: env::var("YAHOO_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            chart_cache_ttl_secs: env::var("CHART_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            default_sma_periods: env::var("DEFAULT_SMA_PERIODS")
                .ok()
                .and_then(|v| parse_periods(&v))
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_SMA_PERIODS.to_vec()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn chart_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.chart_cache_ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_path: None,
            yahoo_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            chart_cache_ttl_secs: 60,
            default_sma_periods: DEFAULT_SMA_PERIODS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // parse_periods Tests
    // =========================================================================

    #[test]
    fn test_parse_periods() {
        assert_eq!(parse_periods("25,50,75,200"), Some(vec![25, 50, 75, 200]));
        assert_eq!(parse_periods(" 50 , 100,200 "), Some(vec![50, 100, 200]));
        assert_eq!(parse_periods(""), Some(vec![]));
    }

    #[test]
    fn test_parse_periods_rejects_invalid() {
        assert_eq!(parse_periods("25,abc"), None);
        assert_eq!(parse_periods("0,50"), None);
        assert_eq!(parse_periods("-5"), None);
    }

    // =========================================================================
    // Config Tests
    // =========================================================================

    #[test]
    fn test_config_default_values() {
        let config = Config::default();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert!(config.database_path.is_none());
        assert_eq!(config.default_sma_periods, vec![25, 50, 75, 200]);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.chart_cache_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_config_clone() {
        let config = Config {
            database_path: Some("/tmp/stocks.db".to_string()),
            default_sma_periods: vec![50, 100, 200],
            ..Config::default()
        };

        let cloned = config.clone();
        assert_eq!(cloned.database_path, config.database_path);
        assert_eq!(cloned.default_sma_periods, vec![50, 100, 200]);
    }
}
