//! Error kinds shared by every service and library crate in the workspace.
//!
//! Mirrors the error taxonomy in spec.md §7: each HTTP-facing service maps
//! an `AppError` to a status code via `IntoResponse`; library crates return
//! `AppError` from fallible operations so callers can match on the kind
//! without string-sniffing.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error kinds spanning the ingestion/indexing/search pipeline.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required configuration option absent. Fatal at startup.
    #[error("missing configuration: {0}")]
    ConfigMissing(String),

    /// Configuration option present but not parseable. Fatal at startup.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// Malformed request input (non-integer id, missing query, etc). Never fatal.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Non-2xx HTTP response (other than 404/410), connect/read timeout, or DNS failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Remote source returned 404/410, or the requested identifier is absent locally.
    #[error("not found: {0}")]
    NotFound(String),

    /// Validated content is missing the required START/END markers or has an empty section.
    #[error("book format error: {0}")]
    BookFormat(String),

    /// Disk failure. Generally fatal for the request, not for the service.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Attempted to index an identifier already present. Swallowed silently by callers (I3).
    #[error("indexing conflict: book {0} already indexed")]
    IndexingConflict(u64),

    /// Cluster-state operation failed (member lost, lock contention timeout).
    #[error("cluster error: {0}")]
    Cluster(String),

    /// Broker unreachable or session dropped.
    #[error("queue error: {0}")]
    Queue(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    /// Status code per the propagation policy in spec.md §6/§7. Each HTTP
    /// surface narrows this further (the searcher collapses everything but
    /// `InvalidInput` to 500); this is the common baseline.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ConfigMissing(_) | AppError::ConfigInvalid(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BookFormat(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::IndexingConflict(_) => StatusCode::OK,
            AppError::Cluster(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Queue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!(%status, error = %self, "request failed");
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
