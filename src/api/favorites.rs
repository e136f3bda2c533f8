//! Favorite symbol endpoints.

use crate::error::{AppError, Result};
use crate::types::{Favorite, NewFavorite};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::debug;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites).post(add_favorite))
        .route("/:symbol", delete(remove_favorite))
}

/// GET /api/favorites
async fn list_favorites(State(state): State<AppState>) -> Result<Json<Vec<Favorite>>> {
    let favorites = state.repository.get_favorites()?;
    debug!("Returning {} favorites", favorites.len());
    Ok(Json(favorites))
}

/// POST /api/favorites
async fn add_favorite(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewFavorite>, JsonRejection>,
) -> Result<Json<Favorite>> {
    let Json(favorite) = payload.map_err(|e| {
        debug!("Invalid favorite data: {}", e);
        AppError::BadRequest("Invalid favorite data".to_string())
    })?;
    favorite.validate().map_err(AppError::BadRequest)?;

    let saved = state.repository.add_favorite(favorite)?;
    debug!("Favorite added: {}", saved.symbol);
    Ok(Json(saved))
}

/// DELETE /api/favorites/:symbol
async fn remove_favorite(State(state): State<AppState>, Path(symbol): Path<String>) -> Result<StatusCode> {
    state.repository.remove_favorite(&symbol)?;
    debug!("Favorite removed: {}", symbol);
    Ok(StatusCode::NO_CONTENT)
}
