//! Stored daily price endpoints.

use crate::api::ApiResponse;
use crate::error::{AppError, Result};
use crate::sources::yahoo::normalize_yahoo_symbol;
use crate::types::PricePoint;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct PricesQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct StoredPrices {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub prices: Vec<PricePoint>,
}

#[derive(Debug, Serialize)]
pub struct StoredStatus {
    pub symbol: String,
    pub date: NaiveDate,
    pub stored: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol", get(get_prices))
        .route("/:symbol/:date", get(get_stored_status))
}

/// GET /api/prices/:symbol?start=YYYY-MM-DD&end=YYYY-MM-DD
///
/// Defaults to the year ending today.
async fn get_prices(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<PricesQuery>,
) -> Result<Json<ApiResponse<StoredPrices>>> {
    let symbol = normalize_yahoo_symbol(&symbol);
    let end = query.end.unwrap_or_else(|| Utc::now().date_naive());
    let start = match query.start {
        Some(start) => start,
        None => end
            .checked_sub_signed(Duration::days(365))
            .unwrap_or(NaiveDate::MIN),
    };
    if start > end {
        return Err(AppError::BadRequest(format!("start {} is after end {}", start, end)));
    }

    let prices = state.repository.get_prices(&symbol, start, end)?;
    debug!("Returning {} stored prices for {}", prices.len(), symbol);
    Ok(Json(ApiResponse::new(StoredPrices {
        symbol,
        start,
        end,
        prices,
    })))
}

/// GET /api/prices/:symbol/:date
async fn get_stored_status(
    State(state): State<AppState>,
    Path((symbol, date)): Path<(String, NaiveDate)>,
) -> Result<Json<StoredStatus>> {
    let symbol = normalize_yahoo_symbol(&symbol);
    let stored = state.repository.has_stored_data(&symbol, date)?;
    Ok(Json(StoredStatus { symbol, date, stored }))
}
