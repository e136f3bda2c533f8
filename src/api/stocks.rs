//! Stock quote endpoints.

use crate::error::{AppError, Result};
use crate::types::{NewStock, Stock};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::debug;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_stock))
        .route("/:symbol", get(get_stock))
}

/// GET /api/stocks/:symbol
async fn get_stock(State(state): State<AppState>, Path(symbol): Path<String>) -> Result<Json<Stock>> {
    debug!("GET /api/stocks/{} requested", symbol);
    let stock = state
        .repository
        .get_stock(&symbol)?
        .ok_or_else(|| AppError::NotFound("Stock not found".to_string()))?;
    Ok(Json(stock))
}

/// POST /api/stocks
async fn create_stock(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewStock>, JsonRejection>,
) -> Result<Json<Stock>> {
    let Json(stock) = payload.map_err(|e| {
        debug!("Invalid stock data: {}", e);
        AppError::BadRequest("Invalid stock data".to_string())
    })?;
    stock.validate().map_err(AppError::BadRequest)?;

    let saved = state.repository.upsert_stock(stock)?;
    debug!("Stock saved: {} ({})", saved.symbol, saved.id);
    Ok(Json(saved))
}
