//! Indexing Service — Response Models (spec.md §6).

use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexUpdateResponse {
    pub book_id: u32,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    pub status: String,
    pub books_indexed: usize,
}

#[derive(Debug, Serialize)]
pub struct IndexStatusResponse {
    pub books_indexed: usize,
    pub unique_words: usize,
    pub last_update: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_books: usize,
    pub unique_words: usize,
}
