//! `indexBook` and the two rebuild paths (spec.md §4.3).

use crate::tokenizer::tokenize;
use cluster_state::ClusterState;
use common::AppError;
use datalake::Datalake;
use gutenberg::BookId;
use tracing::{info, warn};

/// Outcome of indexing a single book, reported back up to the caller so
/// `/index/update/{id}` and the queue consumer can both use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    Indexed { terms: usize },
    AlreadyIndexed,
}

pub struct Indexer {
    datalake: Datalake,
    cluster: ClusterState,
}

impl Indexer {
    pub fn new(datalake: Datalake, cluster: ClusterState) -> Self {
        Self { datalake, cluster }
    }

    /// Indexes `id`: idempotent if metadata is already present (spec.md §4.3
    /// step 1), otherwise reads the stored header/body, extracts metadata,
    /// tokenizes the body, and writes one posting per term under the term's
    /// shard lock.
    pub async fn index_book(&self, id: BookId) -> Result<IndexOutcome, AppError> {
        if self.cluster.metadata.contains_key(id.value()).await? {
            return Ok(IndexOutcome::AlreadyIndexed);
        }

        let header = self.datalake.read_header(id)?;
        let body = self.datalake.read_body(id)?;
        let path = self
            .datalake
            .path_of(id)
            .unwrap_or_else(|| self.datalake.root().to_string_lossy().into_owned());

        let metadata = gutenberg::extract_metadata(&header, id, path);
        self.cluster.metadata.put(id.value(), metadata).await?;

        let terms = tokenize(&body);
        for term in &terms {
            self.cluster.add_posting(term, id.value()).await?;
        }

        info!(book_id = %id, terms = terms.len(), "indexed book");
        Ok(IndexOutcome::Indexed { terms: terms.len() })
    }

    /// Reindexes every identifier the datalake's tracking file knows about.
    /// Used by `/index/rebuild` and by the startup consistency check.
    pub async fn rebuild_from_tracking(&self) -> Result<usize, AppError> {
        self.rebuild_ids(self.datalake.list_ids()?).await
    }

    /// Disaster recovery: the tracking file is missing or untrustworthy, so
    /// identifiers are recovered by walking the datalake tree directly
    /// (spec.md §4.3, "disaster recovery").
    pub async fn rebuild_from_scan(&self) -> Result<usize, AppError> {
        warn!("rebuilding index from filesystem scan (disaster recovery path)");
        self.rebuild_ids(self.datalake.scan_ids()).await
    }

    async fn rebuild_ids(&self, ids: Vec<BookId>) -> Result<usize, AppError> {
        self.cluster.metadata.clear().await?;
        self.cluster.inverted_index.clear().await?;

        let mut indexed = 0;
        for id in ids {
            match self.index_book(id).await {
                Ok(IndexOutcome::Indexed { .. }) => indexed += 1,
                Ok(IndexOutcome::AlreadyIndexed) => {}
                Err(err) => warn!(book_id = %id, error = %err, "skipping book during rebuild"),
            }
        }
        Ok(indexed)
    }

    /// Startup consistency check (spec.md §4.3): if the inverted index is
    /// empty but the datalake holds books, the node has lost its cluster
    /// state (or is joining fresh) and must rebuild before serving search.
    pub async fn ensure_consistent_on_startup(&self) -> Result<(), AppError> {
        if !self.cluster.inverted_index.key_set().await?.is_empty() {
            return Ok(());
        }
        let tracked = self.datalake.list_ids()?;
        if tracked.is_empty() {
            return Ok(());
        }
        info!("inverted index empty at startup with books on disk, rebuilding from scan");
        self.rebuild_from_scan().await?;
        Ok(())
    }
}
