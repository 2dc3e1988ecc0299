//! `search` and `listAll` (spec.md §4.4).

use crate::query::tokenize_query;
use crate::scoring::{score, SearchFilters};
use cluster_state::ClusterState;
use common::AppError;
use gutenberg::BookMetadata;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub book_id: u32,
    pub title: String,
    pub author: String,
    pub language: String,
    pub year: Option<u32>,
    pub score: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub total_results: usize,
    pub hits: Vec<SearchHit>,
}

pub struct Searcher {
    cluster: ClusterState,
    max_results: usize,
    default_limit: usize,
}

impl Searcher {
    pub fn new(cluster: ClusterState, max_results: usize, default_limit: usize) -> Self {
        Self { cluster, max_results, default_limit }
    }

    /// Runs the full keyword search algorithm: tokenize, OR the postings,
    /// bulk-load metadata, filter, score, sort, and cap to
    /// `min(limit, maxResults)`.
    pub async fn search(
        &self,
        q: &str,
        filters: SearchFilters,
        limit: Option<usize>,
    ) -> Result<SearchResults, AppError> {
        let effective_limit = limit.unwrap_or(self.default_limit).min(self.max_results);
        if effective_limit == 0 {
            return Ok(SearchResults::default());
        }

        let tokens = tokenize_query(q);
        if tokens.is_empty() {
            return Ok(SearchResults::default());
        }

        let mut postings_by_token = Vec::with_capacity(tokens.len());
        let mut union_ids: HashSet<u32> = HashSet::new();
        for token in &tokens {
            let postings = self.cluster.inverted_index.get(token).await?;
            union_ids.extend(postings.iter().copied());
            postings_by_token.push(postings);
        }

        if union_ids.is_empty() {
            return Ok(SearchResults::default());
        }

        let ids: Vec<u32> = union_ids.into_iter().collect();
        let metadata_by_id = self.cluster.metadata.get_all(&ids).await?;

        let mut scored: Vec<SearchHit> = metadata_by_id
            .values()
            .filter(|m| filters.matches(m))
            .map(|m| SearchHit {
                book_id: m.book_id.value(),
                title: m.title.clone(),
                author: m.author.clone(),
                language: m.language.clone(),
                year: m.year,
                score: score(m, &tokens, &postings_by_token),
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score).then(a.book_id.cmp(&b.book_id)));

        let total_results = scored.len();
        scored.truncate(effective_limit);

        Ok(SearchResults { total_results, hits: scored })
    }

    /// Unfiltered, unscored listing of every indexed book, capped to
    /// `min(limit, maxResults)`, in the metadata store's own order.
    pub async fn list_all(&self, limit: usize) -> Result<Vec<BookMetadata>, AppError> {
        let cap = limit.min(self.max_results);
        if cap == 0 {
            return Ok(Vec::new());
        }
        let mut values = self.cluster.metadata.values().await?;
        values.truncate(cap);
        Ok(values)
    }
}
