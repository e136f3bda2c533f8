//! Chart endpoints: price data enriched with SMA lines and Fibonacci levels.

use crate::api::yahoo::parse_range;
use crate::api::ApiResponse;
use crate::config::parse_periods;
use crate::error::{AppError, Result};
use crate::services::cache::ChartKey;
use crate::services::chart::{analyze, ChartOptions};
use crate::sources::yahoo::normalize_yahoo_symbol;
use crate::types::{ChartAnalysis, ChartRange, PricePoint};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Query parameters for the chart endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub range: Option<String>,
    pub interval: Option<String>,
    /// Comma-separated SMA windows, e.g. `25,50,200`. Empty disables SMA.
    pub sma: Option<String>,
    pub fibonacci: Option<bool>,
    /// Start of the visible window used for Fibonacci levels (epoch seconds).
    pub from: Option<i64>,
    /// End of the visible window used for Fibonacci levels (epoch seconds).
    pub to: Option<i64>,
}

impl ChartQuery {
    fn options(&self, default_periods: &[usize]) -> Result<ChartOptions> {
        let sma_periods = match self.sma.as_deref() {
            None => default_periods.to_vec(),
            Some(list) => parse_periods(list)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid SMA periods: {}", list)))?,
        };

        let fibonacci_window = match (self.from, self.to) {
            (None, None) => None,
            (from, to) => Some((from.unwrap_or(i64::MIN), to.unwrap_or(i64::MAX))),
        };

        Ok(ChartOptions {
            sma_periods,
            fibonacci: self.fibonacci.unwrap_or(true),
            fibonacci_window,
        })
    }
}

/// Chart for one symbol.
#[derive(Debug, Serialize)]
pub struct SymbolChart {
    pub symbol: String,
    pub range: ChartRange,
    pub interval: String,
    #[serde(flatten)]
    pub analysis: ChartAnalysis,
}

/// Body of `POST /api/indicators`.
#[derive(Debug, Deserialize)]
pub struct IndicatorsRequest {
    pub points: Vec<PricePoint>,
    #[serde(flatten)]
    pub options: ChartOptions,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/chart/:symbol", get(get_chart))
        .route("/api/indicators", post(compute_indicators))
}

/// GET /api/chart/:symbol
async fn get_chart(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ApiResponse<SymbolChart>>> {
    let range = parse_range(query.range.as_deref())?;
    let interval = query
        .interval
        .clone()
        .unwrap_or_else(|| range.default_interval().to_string());
    let options = query.options(&state.config.default_sma_periods)?;
    let symbol = normalize_yahoo_symbol(&symbol);
    debug!("Chart requested: {}, range: {}, interval: {}", symbol, range.as_str(), interval);

    let key = ChartKey::new(&symbol, range, &interval);
    let (series, cached) = match state.chart_cache.get(&key) {
        Some(series) => (series, true),
        None => {
            let points = state.yahoo.get_chart(&symbol, range, &interval).await?;
            // Only daily bars map onto the (symbol, date) price table.
            if interval == "1d" {
                if let Err(e) = state.repository.save_prices(&symbol, &points) {
                    warn!("Failed to store prices for {}: {}", symbol, e);
                }
            }
            (state.chart_cache.insert(key, points), false)
        }
    };

    let analysis = analyze(&series, &options)?;
    Ok(Json(ApiResponse::with_cached(
        SymbolChart {
            symbol,
            range,
            interval,
            analysis,
        },
        cached,
    )))
}

/// POST /api/indicators
async fn compute_indicators(
    payload: std::result::Result<Json<IndicatorsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ChartAnalysis>>> {
    let Json(request) = payload.map_err(|e| {
        debug!("Invalid indicators request: {}", e);
        AppError::BadRequest("Invalid indicators request".to_string())
    })?;
    debug!(
        "Indicators requested for {} points, periods {:?}",
        request.points.len(),
        request.options.sma_periods
    );
    let analysis = analyze(&request.points, &request.options)?;
    Ok(Json(ApiResponse::new(analysis)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_query_defaults() {
        let options = ChartQuery::default().options(&[50, 100, 200]).unwrap();
        assert_eq!(options.sma_periods, vec![50, 100, 200]);
        assert!(options.fibonacci);
        assert_eq!(options.fibonacci_window, None);
    }

    #[test]
    fn test_chart_query_explicit() {
        let query = ChartQuery {
            sma: Some("5,20".to_string()),
            fibonacci: Some(false),
            from: Some(100),
            ..ChartQuery::default()
        };
        let options = query.options(&[25]).unwrap();
        assert_eq!(options.sma_periods, vec![5, 20]);
        assert!(!options.fibonacci);
        assert_eq!(options.fibonacci_window, Some((100, i64::MAX)));
    }

    #[test]
    fn test_chart_query_rejects_zero_period() {
        let query = ChartQuery {
            sma: Some("0,20".to_string()),
            ..ChartQuery::default()
        };
        assert!(matches!(query.options(&[25]), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_indicators_request_deserialize() {
        let request: IndicatorsRequest = serde_json::from_str(
            r#"{"points": [{"timestamp": 1, "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0, "volume": 0}],
                "smaPeriods": [3]}"#,
        )
        .unwrap();
        assert_eq!(request.points.len(), 1);
        assert_eq!(request.options.sma_periods, vec![3]);
        assert!(request.options.fibonacci);
    }
}
