//! Search Service — Response Models (spec.md §6).

use search_core::SearchHit;
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_results: usize,
    pub returned_results: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub total_results: usize,
    pub returned_results: usize,
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub book_id: u32,
    pub title: String,
    pub author: String,
    pub language: String,
    pub year: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_books: usize,
    pub unique_words: usize,
}
