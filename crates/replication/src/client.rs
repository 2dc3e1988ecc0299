//! Replication client (spec.md §4.5): copies a freshly ingested book to
//! exactly one other cluster member before the indexing job is published.

use common::AppError;
use rand::seq::SliceRandom;
use rand::thread_rng;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::warn;

/// `clusterNodes \ {self}`, shuffled with a pseudo-random permutation so
/// repeated replications don't all land on the same peer first.
pub fn candidate_targets(cluster_members: &[String], self_addr: &str) -> Vec<String> {
    let mut candidates: Vec<String> =
        cluster_members.iter().filter(|m| m.as_str() != self_addr).cloned().collect();
    candidates.shuffle(&mut thread_rng());
    candidates
}

pub struct ReplicationClient {
    client: reqwest::Client,
    port: u16,
    endpoint: String,
}

impl ReplicationClient {
    pub fn new(port: u16, endpoint: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Transport(e.to_string()))?;
        Ok(Self { client, port, endpoint: endpoint.to_string() })
    }

    /// Attempts delivery to each candidate in order; the first 2xx response
    /// completes replication (I4). Fails with `no-targets` when `candidates`
    /// is empty, or `replication-failed` once every candidate has failed.
    pub async fn replicate(
        &self,
        candidates: &[String],
        book_id: u32,
        title: Option<&str>,
        raw_content: String,
    ) -> Result<(), AppError> {
        if candidates.is_empty() {
            return Err(AppError::Transport("replication: no targets available".to_string()));
        }

        let mut last_error = None;
        for host in candidates {
            let url = format!("http://{host}:{}{}", self.port, self.endpoint);
            let form = Form::new()
                .text("bookId", book_id.to_string())
                .text("title", title.unwrap_or_default().to_string())
                .part("file", Part::bytes(raw_content.clone().into_bytes()).file_name(format!("{book_id}.txt")));

            match self.client.post(&url).multipart(form).send().await {
                Ok(resp) if resp.status().is_success() => return Ok(()),
                Ok(resp) => {
                    warn!(target = %host, status = %resp.status(), "replication attempt rejected");
                    last_error = Some(format!("{host} responded {}", resp.status()));
                }
                Err(e) => {
                    warn!(target = %host, error = %e, "replication attempt failed");
                    last_error = Some(format!("{host}: {e}"));
                }
            }
        }

        Err(AppError::Transport(format!(
            "replication failed against all {} candidate(s): {}",
            candidates.len(),
            last_error.unwrap_or_default()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excludes_self_from_candidates() {
        let members = vec!["10.0.0.1".to_string(), "10.0.0.2".to_string(), "10.0.0.3".to_string()];
        let candidates = candidate_targets(&members, "10.0.0.2");
        assert_eq!(candidates.len(), 2);
        assert!(!candidates.contains(&"10.0.0.2".to_string()));
    }

    #[test]
    fn single_member_cluster_has_no_candidates() {
        let members = vec!["10.0.0.1".to_string()];
        let candidates = candidate_targets(&members, "10.0.0.1");
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn replicate_with_no_candidates_is_a_no_targets_error() {
        let client = ReplicationClient::new(9999, "/api/datalake/store", Duration::from_millis(50)).unwrap();
        let result = client.replicate(&[], 1, None, "raw".to_string()).await;
        assert!(result.is_err());
    }
}
