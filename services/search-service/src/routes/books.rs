//! `GET /books` (spec.md §4.4, §6): unfiltered, unscored listing of every
//! indexed book, capped to `min(limit, maxResults)`.

use crate::models::responses::{BookListResponse, BookSummary};
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::Json;
use common::AppError;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

pub async fn list_books(
    Query(params): Query<ListParams>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookListResponse>, AppError> {
    let limit = params.limit.unwrap_or(state.default_limit);
    let books = state.searcher.list_all(limit).await?;

    let summaries: Vec<BookSummary> = books
        .iter()
        .map(|m| BookSummary {
            book_id: m.book_id.value(),
            title: m.title.clone(),
            author: m.author.clone(),
            language: m.language.clone(),
            year: m.year,
        })
        .collect();

    let total_results = state.cluster.metadata.size().await?;

    Ok(Json(BookListResponse {
        total_results,
        returned_results: summaries.len(),
        books: summaries,
    }))
}
