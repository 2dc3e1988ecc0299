//! `GET /search` (spec.md §4.4, §6): tokenize, OR the postings, filter,
//! score, rank, and cap to `min(limit, maxResults)`.

use crate::models::responses::SearchResponse;
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::Json;
use common::AppError;
use search_core::SearchFilters;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub year: Option<String>,
    pub limit: Option<String>,
}

fn parse_optional_u32(raw: Option<String>, field: &str) -> Result<Option<u32>, AppError> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s
            .parse::<u32>()
            .map(Some)
            .map_err(|_| AppError::InvalidInput(format!("'{field}' must be an integer, got '{s}'"))),
    }
}

pub async fn search(
    Query(params): Query<SearchParams>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params.q.filter(|q| !q.is_empty()).ok_or_else(|| AppError::InvalidInput("missing 'q' parameter".to_string()))?;

    let year = parse_optional_u32(params.year, "year")?;
    let limit = parse_optional_u32(params.limit, "limit")?.map(|v| v as usize);

    let filters = SearchFilters { author: params.author, language: params.language, year };

    let results = state.searcher.search(&query, filters, limit).await?;

    Ok(Json(SearchResponse {
        query,
        total_results: results.total_results,
        returned_results: results.hits.len(),
        results: results.hits,
    }))
}
