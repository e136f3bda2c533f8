//! Pass-through proxy to Yahoo Finance, plus a typed symbol search.

use crate::error::{AppError, Result};
use crate::types::{ChartRange, SearchResult};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
pub struct ProxyChartQuery {
    pub range: Option<String>,
    pub interval: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/yahoo/chart/:symbol", get(proxy_chart))
        .route("/api/yahoo/search", get(proxy_search))
        .route("/api/search", get(search))
}

/// Parse an optional `range` query value, defaulting to one month.
pub fn parse_range(range: Option<&str>) -> Result<ChartRange> {
    match range {
        None => Ok(ChartRange::default()),
        Some(r) => ChartRange::from_str(r)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown range: {}", r))),
    }
}

fn require_query(query: SearchQuery) -> Result<String> {
    query
        .q
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing search query".to_string()))
}

/// GET /api/yahoo/chart/:symbol
async fn proxy_chart(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ProxyChartQuery>,
) -> Result<Json<serde_json::Value>> {
    let range = parse_range(query.range.as_deref())?;
    let interval = query
        .interval
        .unwrap_or_else(|| range.default_interval().to_string());
    debug!(
        "Yahoo chart requested: {}, range: {}, interval: {}",
        symbol,
        range.as_str(),
        interval
    );

    let data = state
        .yahoo
        .get_chart_raw(&symbol, range, &interval)
        .await
        .map_err(|e| {
            warn!("Yahoo Finance API error: {}", e);
            AppError::ExternalApi("Failed to fetch stock data".to_string())
        })?;
    Ok(Json(data))
}

/// GET /api/yahoo/search
async fn proxy_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>> {
    let q = require_query(query)?;
    debug!("Yahoo search requested: {}", q);

    let data = state.yahoo.search_raw(&q).await.map_err(|e| {
        warn!("Yahoo Finance Search API error: {}", e);
        AppError::ExternalApi("Failed to search stocks".to_string())
    })?;
    Ok(Json(data))
}

/// GET /api/search
async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Result<Json<Vec<SearchResult>>> {
    let q = require_query(query)?;
    let results = state.yahoo.search(&q).await?;
    debug!("Search '{}' returned {} symbols", q, results.len());
    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range(None).unwrap(), ChartRange::OneMonth);
        assert_eq!(parse_range(Some("5y")).unwrap(), ChartRange::FiveYears);
        assert!(matches!(parse_range(Some("7w")), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_require_query() {
        assert_eq!(require_query(SearchQuery { q: Some(" apple ".into()) }).unwrap(), "apple");
        assert!(require_query(SearchQuery { q: Some("  ".into()) }).is_err());
        assert!(require_query(SearchQuery { q: None }).is_err());
    }
}
