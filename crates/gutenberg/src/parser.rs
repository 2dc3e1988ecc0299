//! Validates raw Gutenberg text and splits it into header/body (spec.md §3, §4.2).

use common::AppError;
use regex::Regex;
use std::sync::OnceLock;

fn start_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)^\*\*\*\s*START\s+OF.*$").unwrap())
}

fn end_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)^\*\*\*\s*END\s+OF.*$").unwrap())
}

/// Splits raw book content into `(header, body)`. The header is everything
/// before the START marker; the body is everything strictly between the
/// START line (removed) and the END marker. Both are trimmed and must be
/// non-empty, or this returns `AppError::BookFormat`.
pub fn split_header_body(raw: &str) -> Result<(String, String), AppError> {
    let start = start_marker_re()
        .find(raw)
        .ok_or_else(|| AppError::BookFormat("missing START marker".to_string()))?;

    let after_start = &raw[start.end()..];
    let end = end_marker_re()
        .find(after_start)
        .ok_or_else(|| AppError::BookFormat("missing END marker after START".to_string()))?;

    let header = raw[..start.start()].trim();
    let body = after_start[..end.start()].trim();

    if header.is_empty() {
        return Err(AppError::BookFormat("empty header section".to_string()));
    }
    if body.is_empty() {
        return Err(AppError::BookFormat("empty body section".to_string()));
    }

    Ok((header.to_string(), body.to_string()))
}
