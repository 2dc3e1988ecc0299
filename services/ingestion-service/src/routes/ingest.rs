//! Ingestion endpoints (spec.md §6): `POST /ingest/{id}`,
//! `GET /ingest/status/{id}`, `GET /ingest/list`, `POST /api/datalake/store`.

use crate::models::responses::{IngestResponse, IngestStatusResponse, ListResponse};
use crate::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use common::AppError;
use gutenberg::BookId;
use std::sync::Arc;
use tracing::info;

fn parse_book_id(raw: &str) -> Result<BookId, AppError> {
    let n: u32 = raw.parse().map_err(|_| AppError::InvalidInput(format!("'{raw}' is not a valid book id")))?;
    BookId::new(n).ok_or_else(|| AppError::InvalidInput("book id must be positive".to_string()))
}

pub async fn ingest_book(
    Path(id_raw): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_book_id(&id_raw)?;

    if let Some(path) = state.datalake.path_of(id) {
        if state.datalake.is_present(id) {
            return Ok((
                StatusCode::OK,
                Json(IngestResponse { book_id: id.value(), status: "already_exists".to_string(), path }),
            ));
        }
    }

    let raw = state.downloader.download(id).await?;
    let (header, body) = gutenberg::split_header_body(&raw)?;
    let path = state.datalake.save(id, &header, &body)?;

    if let Some(replication) = &state.replication {
        let metadata = gutenberg::extract_metadata(&header, id, path.clone());
        let candidates = replication::candidate_targets(&state.config.cluster_members, &state.config.cluster_current_node_ip);
        replication.client.replicate(&candidates, id.value(), Some(&metadata.title), raw).await?;
    }

    if let Some(producer) = &state.queue_producer {
        producer.publish_index_job(id).await?;
    }

    info!(book_id = %id, %path, "ingested book");
    Ok((StatusCode::CREATED, Json(IngestResponse { book_id: id.value(), status: "downloaded".to_string(), path })))
}

pub async fn check_status(Path(id_raw): Path<String>, State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let id = parse_book_id(&id_raw)?;

    if state.datalake.is_present(id) {
        let path = state.datalake.path_of(id);
        Ok((
            StatusCode::OK,
            Json(IngestStatusResponse { book_id: id.value(), status: "available".to_string(), path }),
        ))
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            Json(IngestStatusResponse { book_id: id.value(), status: "not_found".to_string(), path: None }),
        ))
    }
}

pub async fn list_books(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let ids: Vec<u32> = state.datalake.list_ids()?.into_iter().map(BookId::value).collect();
    Ok(Json(ListResponse { count: ids.len(), books: ids }))
}

/// Receiver side of peer replication (spec.md §4.5): rehydrates a book from
/// a multipart upload and saves it to the local datalake. Replicated books
/// are never themselves re-replicated or re-queued.
pub async fn store_from_datalake(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut book_id: Option<BookId> = None;
    let mut raw_content: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| AppError::InvalidInput(e.to_string()))? {
        match field.name() {
            Some("bookId") => {
                let text = field.text().await.map_err(|e| AppError::InvalidInput(e.to_string()))?;
                book_id = Some(parse_book_id(&text)?);
            }
            Some("file") => {
                let bytes = field.bytes().await.map_err(|e| AppError::InvalidInput(e.to_string()))?;
                raw_content = Some(String::from_utf8(bytes.to_vec()).map_err(|e| AppError::InvalidInput(e.to_string()))?);
            }
            _ => {}
        }
    }

    let id = book_id.ok_or_else(|| AppError::InvalidInput("missing bookId field".to_string()))?;
    let raw = raw_content.ok_or_else(|| AppError::InvalidInput("missing file field".to_string()))?;

    let path = replication::rehydrate(&state.datalake, id, &raw)?;
    info!(book_id = %id, "received replicated book");
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "bookId": id.value(), "path": path }))))
}
