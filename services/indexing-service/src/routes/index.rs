//! Indexing endpoints (spec.md §6): `POST /index/update/{id}`,
//! `POST /index/rebuild`, `GET /index/status`, `GET /stats`.

use crate::models::responses::{IndexStatusResponse, IndexUpdateResponse, RebuildResponse, StatsResponse};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use common::AppError;
use gutenberg::BookId;
use serde::Serialize;
use std::sync::Arc;

fn parse_book_id(raw: &str) -> Result<BookId, AppError> {
    let n: u32 = raw.parse().map_err(|_| AppError::InvalidInput(format!("'{raw}' is not a valid book id")))?;
    BookId::new(n).ok_or_else(|| AppError::InvalidInput("book id must be positive".to_string()))
}

#[derive(Debug, Serialize)]
struct IndexUpdateFailure {
    status: String,
    error: String,
}

/// Per spec.md §6, `POST /index/update/{id}` only documents two shapes:
/// `200 {bookId, status:"updated"}` or `500 {status:"failed", error}`. Input
/// validation (non-integer id) still gets its own 400; every other error
/// kind collapses to the documented 500 body instead of the generic
/// `AppError` status mapping.
pub async fn index_book(
    Path(id_raw): Path<String>,
    State(state): State<Arc<AppState>>,
) -> axum::response::Response {
    let id = match parse_book_id(&id_raw) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match state.indexer.index_book(id).await {
        Ok(_) => {
            state.touch_last_update().await;
            Json(IndexUpdateResponse { book_id: id.value(), status: "updated".to_string() }).into_response()
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(IndexUpdateFailure { status: "failed".to_string(), error: err.to_string() }),
        )
            .into_response(),
    }
}

pub async fn rebuild_index(State(state): State<Arc<AppState>>) -> Result<Json<RebuildResponse>, AppError> {
    let books_indexed = state.indexer.rebuild_from_tracking().await?;
    state.touch_last_update().await;
    Ok(Json(RebuildResponse { status: "completed".to_string(), books_indexed }))
}

pub async fn get_index_status(State(state): State<Arc<AppState>>) -> Result<Json<IndexStatusResponse>, AppError> {
    let books_indexed = state.cluster.metadata.size().await?;
    let unique_words = state.cluster.inverted_index.key_set().await?.len();
    let last_update = state.last_update().await;
    Ok(Json(IndexStatusResponse { books_indexed, unique_words, last_update }))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, AppError> {
    let total_books = state.cluster.metadata.size().await?;
    let unique_words = state.cluster.inverted_index.key_set().await?.len();
    Ok(Json(StatsResponse { total_books, unique_words }))
}
