//! Yahoo Finance API client for chart and symbol search data.
//!
//! Uses the unofficial Yahoo Finance endpoints. Parsed chart series keep
//! timestamps in epoch seconds, as returned upstream.

use crate::error::{AppError, Result};
use crate::types::{ChartRange, PricePoint, SearchResult};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

#[derive(Debug, Deserialize)]
struct YahooSearchResponse {
    #[serde(default)]
    quotes: Vec<YahooSearchQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooSearchQuote {
    symbol: String,
    longname: Option<String>,
    shortname: Option<String>,
}

/// Normalize symbol for Yahoo Finance API.
/// Exchange suffixes (e.g. `7203.T`, `VOD.L`) are part of the symbol and kept as-is.
pub fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Turn a chart response into price points.
///
/// Rows without a close are dropped. Missing open/high/low fall back to the
/// close and missing volume to zero.
fn parse_chart(data: YahooChartResponse) -> Result<Vec<PricePoint>> {
    if let Some(error) = data.chart.error {
        return Err(AppError::ExternalApi(format!(
            "Yahoo API error: {} - {}",
            error.code, error.description
        )));
    }

    let result = data
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| AppError::ExternalApi("No results in response".to_string()))?;

    // Symbols with no trades in the range come back without timestamps.
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| AppError::ExternalApi("No quote data in response".to_string()))?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    fn at(values: &[Option<f64>], i: usize) -> Option<f64> {
        values.get(i).copied().flatten()
    }

    let points = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &timestamp)| {
            let close = at(&closes, i)?;
            Some(PricePoint {
                timestamp,
                open: at(&opens, i).unwrap_or(close),
                high: at(&highs, i).unwrap_or(close),
                low: at(&lows, i).unwrap_or(close),
                close,
                volume: volumes.get(i).copied().flatten().unwrap_or(0),
            })
        })
        .collect();

    Ok(points)
}

fn parse_search(data: YahooSearchResponse) -> Vec<SearchResult> {
    data.quotes
        .into_iter()
        .map(|quote| {
            let name = quote
                .longname
                .or(quote.shortname)
                .unwrap_or_else(|| quote.symbol.clone());
            SearchResult {
                symbol: quote.symbol,
                name,
            }
        })
        .collect()
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str, range: ChartRange, interval: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval={}&includePrePost=false",
            self.base_url,
            normalize_yahoo_symbol(symbol),
            range.as_str(),
            interval
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!("API error: {}", response.status())));
        }
        Ok(response.json().await?)
    }

    /// Fetch the upstream chart document unchanged.
    pub async fn get_chart_raw(&self, symbol: &str, range: ChartRange, interval: &str) -> Result<serde_json::Value> {
        let url = self.chart_url(symbol, range, interval);
        debug!("Fetching Yahoo Finance data: {}", url);
        self.get_json(self.client.get(&url)).await
    }

    /// Fetch and parse OHLCV data for a symbol.
    ///
    /// Arguments:
    /// - symbol: Stock/ETF symbol (e.g., "AAPL", "SPY")
    /// - range: Time range
    /// - interval: Data interval ("1m", "5m", "15m", "1h", "1d", "1wk", "1mo")
    pub async fn get_chart(&self, symbol: &str, range: ChartRange, interval: &str) -> Result<Vec<PricePoint>> {
        let url = self.chart_url(symbol, range, interval);
        debug!("Fetching Yahoo Finance data: {}", url);
        let data: YahooChartResponse = self.get_json(self.client.get(&url)).await?;
        parse_chart(data)
    }

    /// Fetch the upstream search document unchanged.
    pub async fn search_raw(&self, query: &str) -> Result<serde_json::Value> {
        let url = format!("{}/v1/finance/search", self.base_url);
        debug!("Searching Yahoo Finance: {}", query);
        self.get_json(self.client.get(&url).query(&[("q", query)])).await
    }

    /// Search symbols by free text.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = format!("{}/v1/finance/search", self.base_url);
        debug!("Searching Yahoo Finance: {}", query);
        let data: YahooSearchResponse = self.get_json(self.client.get(&url).query(&[("q", query)])).await?;
        Ok(parse_search(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(json: &str) -> YahooChartResponse {
        serde_json::from_str(json).unwrap()
    }

    // =========================================================================
    // normalize_yahoo_symbol Tests
    // =========================================================================

    #[test]
    fn test_normalize_yahoo_symbol() {
        assert_eq!(normalize_yahoo_symbol("aapl"), "AAPL");
        assert_eq!(normalize_yahoo_symbol("BRK-B"), "BRK-B");
        assert_eq!(normalize_yahoo_symbol(" 7203.t "), "7203.T");
        assert_eq!(normalize_yahoo_symbol("vod.l"), "VOD.L");
    }

    // =========================================================================
    // parse_chart Tests
    // =========================================================================

    #[test]
    fn test_parse_chart() {
        let data = chart(
            r#"{"chart": {"result": [{
                "meta": {"symbol": "AAPL"},
                "timestamp": [1700000000, 1700086400],
                "indicators": {"quote": [{
                    "open": [150.0, 151.0],
                    "high": [155.0, 156.0],
                    "low": [148.0, 149.0],
                    "close": [153.0, 154.0],
                    "volume": [50000000, 51000000]
                }]}
            }], "error": null}}"#,
        );

        let points = parse_chart(data).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].timestamp, 1_700_000_000);
        assert_eq!(points[1].high, 156.0);
        assert_eq!(points[1].volume, 51_000_000);
    }

    #[test]
    fn test_parse_chart_with_nulls() {
        let data = chart(
            r#"{"chart": {"result": [{
                "timestamp": [1, 2, 3],
                "indicators": {"quote": [{
                    "open": [10.0, null, null],
                    "high": [11.0, null, 13.0],
                    "low": [9.0, null, null],
                    "close": [10.5, null, 12.0],
                    "volume": [100, null, null]
                }]}
            }]}}"#,
        );

        let points = parse_chart(data).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].timestamp, 3);
        assert_eq!(points[1].open, 12.0);
        assert_eq!(points[1].high, 13.0);
        assert_eq!(points[1].low, 12.0);
        assert_eq!(points[1].volume, 0);
    }

    #[test]
    fn test_parse_chart_error() {
        let data = chart(
            r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#,
        );
        match parse_chart(data) {
            Err(AppError::ExternalApi(msg)) => assert!(msg.contains("Not Found")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_chart_without_timestamps() {
        let data = chart(r#"{"chart": {"result": [{"indicators": {"quote": [{}]}}]}}"#);
        assert!(parse_chart(data).unwrap().is_empty());
    }

    // =========================================================================
    // parse_search Tests
    // =========================================================================

    #[test]
    fn test_parse_search_name_fallback() {
        let data: YahooSearchResponse = serde_json::from_str(
            r#"{"quotes": [
                {"symbol": "AAPL", "longname": "Apple Inc.", "shortname": "Apple"},
                {"symbol": "APLE", "shortname": "Apple Hospitality"},
                {"symbol": "XYZ"}
            ]}"#,
        )
        .unwrap();

        let results = parse_search(data);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].name, "Apple Inc.");
        assert_eq!(results[1].name, "Apple Hospitality");
        assert_eq!(results[2].name, "XYZ");
    }

    #[test]
    fn test_parse_search_missing_quotes() {
        let data: YahooSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parse_search(data).is_empty());
    }

    // =========================================================================
    // YahooFinanceClient Tests
    // =========================================================================

    #[test]
    fn test_chart_url() {
        let client = YahooFinanceClient::new("http://localhost:9000/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.chart_url("brk-b", ChartRange::OneYear, "1d"),
            "http://localhost:9000/v8/finance/chart/BRK-B?range=1y&interval=1d&includePrePost=false"
        );
        assert_eq!(
            client.chart_url(" vod.l", ChartRange::FiveDays, "1d"),
            "http://localhost:9000/v8/finance/chart/VOD.L?range=5d&interval=1d&includePrePost=false"
        );
    }
}
