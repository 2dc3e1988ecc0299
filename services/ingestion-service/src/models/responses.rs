//! Ingestion Service — Response Models
//!
//! JSON shapes for the ingestion HTTP surface (spec.md §6). Field names are
//! camelCase on the wire; Rust structs stay snake_case.

use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub book_id: u32,
    pub status: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStatusResponse {
    pub book_id: u32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub count: usize,
    pub books: Vec<u32>,
}
