//! Downloads raw book content from Project Gutenberg (spec.md §4.2).
//!
//! Tries a deterministic ordered list of URL templates and returns the
//! first HTTP-200 body. The list is intentionally explicit and never
//! reordered — spec.md §9 calls out that the order is semantically
//! significant and must stay testable.

use crate::book_id::BookId;
use common::AppError;
use std::time::Duration;

const USER_AGENT: &str = "big-data-search-engine/1.0 (+gutenberg-downloader)";

/// Builds the ordered candidate URLs for `id` against `base_url`, mirroring
/// the handful of path layouts Gutenberg has used for this title over time.
pub fn candidate_urls(id: BookId, base_url: &str) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    let n = id.value();
    vec![
        format!("{base}/files/{n}/{n}-0.txt"),
        format!("{base}/files/{n}/{n}.txt"),
        format!("{base}/cache/epub/{n}/pg{n}.txt"),
        format!("{base}/ebooks/{n}.txt.utf-8"),
    ]
}

pub struct Downloader {
    client: reqwest::Client,
    base_url: String,
}

impl Downloader {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigInvalid(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// Attempts each candidate URL in order and returns the first 200 body.
    /// 404/410 responses are remembered as "not found" and the next
    /// candidate is tried; any other failure is remembered as a transport
    /// error. If every candidate fails, the most specific error observed
    /// wins: a transport error outranks a plain not-found.
    pub async fn download(&self, id: BookId) -> Result<String, AppError> {
        let mut saw_transport_error: Option<AppError> = None;

        for url in candidate_urls(id, &self.base_url) {
            tracing::debug!(%url, "attempting download");
            match self.client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    return resp
                        .text()
                        .await
                        .map_err(|e| AppError::Transport(format!("failed to read body: {e}")));
                }
                Ok(resp) if resp.status().as_u16() == 404 || resp.status().as_u16() == 410 => {
                    continue;
                }
                Ok(resp) => {
                    saw_transport_error = Some(AppError::Transport(format!(
                        "unexpected status {} from {url}",
                        resp.status()
                    )));
                }
                Err(e) => {
                    saw_transport_error = Some(AppError::Transport(format!(
                        "request to {url} failed: {e}"
                    )));
                }
            }
        }

        Err(saw_transport_error
            .unwrap_or_else(|| AppError::NotFound(format!("book {id} not found on Gutenberg"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> BookId {
        BookId::new(n).unwrap()
    }

    #[test]
    fn candidate_list_is_deterministic_and_ordered() {
        let urls = candidate_urls(id(1342), "https://www.gutenberg.org");
        assert_eq!(
            urls,
            vec![
                "https://www.gutenberg.org/files/1342/1342-0.txt",
                "https://www.gutenberg.org/files/1342/1342.txt",
                "https://www.gutenberg.org/cache/epub/1342/pg1342.txt",
                "https://www.gutenberg.org/ebooks/1342.txt.utf-8",
            ]
        );
    }

    #[test]
    fn strips_trailing_slash_from_base_url() {
        let urls = candidate_urls(id(11), "https://www.gutenberg.org/");
        assert!(urls[0].starts_with("https://www.gutenberg.org/files/"));
        assert!(!urls[0].contains("//files"));
    }
}
