//! `GET /stats` (spec.md §6).

use crate::models::responses::StatsResponse;
use crate::AppState;
use axum::extract::State;
use axum::response::Json;
use common::AppError;
use std::sync::Arc;

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, AppError> {
    let total_books = state.cluster.metadata.size().await?;
    let unique_words = state.cluster.inverted_index.key_set().await?.len();
    Ok(Json(StatsResponse { total_books, unique_words }))
}
