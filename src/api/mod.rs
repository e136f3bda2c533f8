pub mod chart;
pub mod favorites;
pub mod health;
pub mod prices;
pub mod stocks;
pub mod yahoo;

use crate::AppState;
use axum::Router;
use serde::Serialize;

/// API response wrapper for computed data.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Debug, Serialize)]
pub struct ApiMeta {
    pub cached: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self::with_cached(data, false)
    }

    pub fn with_cached(data: T, cached: bool) -> Self {
        Self {
            data,
            meta: ApiMeta { cached },
        }
    }
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(chart::router())
        .merge(yahoo::router())
        .nest("/api/stocks", stocks::router())
        .nest("/api/favorites", favorites::router())
        .nest("/api/prices", prices::router())
}
