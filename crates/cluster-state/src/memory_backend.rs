//! In-memory `ClusterState` implementation: a single-process stand-in for
//! the Redis backend, used in unit tests and as the per-shard lock table
//! spec.md §9 describes ("a fixed shard count S and a lock table of S
//! mutexes").

use crate::traits::{InvertedIndex, LockService, MetadataMap};
use async_trait::async_trait;
use common::AppError;
use dashmap::DashMap;
use gutenberg::BookMetadata;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct InMemoryMetadataMap {
    entries: DashMap<u32, BookMetadata>,
}

impl InMemoryMetadataMap {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataMap for InMemoryMetadataMap {
    async fn get(&self, id: u32) -> Result<Option<BookMetadata>, AppError> {
        Ok(self.entries.get(&id).map(|e| e.clone()))
    }

    async fn get_all(&self, ids: &[u32]) -> Result<HashMap<u32, BookMetadata>, AppError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.entries.get(id).map(|e| (*id, e.clone())))
            .collect())
    }

    async fn put(&self, id: u32, metadata: BookMetadata) -> Result<(), AppError> {
        self.entries.insert(id, metadata);
        Ok(())
    }

    async fn contains_key(&self, id: u32) -> Result<bool, AppError> {
        Ok(self.entries.contains_key(&id))
    }

    async fn size(&self) -> Result<usize, AppError> {
        Ok(self.entries.len())
    }

    async fn values(&self) -> Result<Vec<BookMetadata>, AppError> {
        Ok(self.entries.iter().map(|e| e.value().clone()).collect())
    }

    async fn clear(&self) -> Result<(), AppError> {
        self.entries.clear();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryInvertedIndex {
    postings: DashMap<String, HashSet<u32>>,
}

impl InMemoryInvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvertedIndex for InMemoryInvertedIndex {
    async fn get(&self, term: &str) -> Result<HashSet<u32>, AppError> {
        Ok(self.postings.get(term).map(|e| e.clone()).unwrap_or_default())
    }

    async fn put(&self, term: &str, book_id: u32) -> Result<(), AppError> {
        self.postings.entry(term.to_string()).or_default().insert(book_id);
        Ok(())
    }

    async fn contains_entry(&self, term: &str, book_id: u32) -> Result<bool, AppError> {
        Ok(self.postings.get(term).map(|e| e.contains(&book_id)).unwrap_or(false))
    }

    async fn key_set(&self) -> Result<HashSet<String>, AppError> {
        Ok(self.postings.iter().map(|e| e.key().clone()).collect())
    }

    async fn clear(&self) -> Result<(), AppError> {
        self.postings.clear();
        Ok(())
    }
}

/// Holds each named lock's mutex plus, once acquired, the guard keeping it
/// locked until `release` is called. `acquire`/`release` are separate async
/// calls (per the `LockService` contract), so the guard has to outlive the
/// stack frame that created it — it lives here instead.
#[derive(Default)]
pub struct InMemoryLockService {
    mutexes: DashMap<String, Arc<Mutex<()>>>,
    held: DashMap<String, tokio::sync::OwnedMutexGuard<()>>,
}

impl InMemoryLockService {
    pub fn new() -> Self {
        Self::default()
    }

    fn mutex_for(&self, name: &str) -> Arc<Mutex<()>> {
        self.mutexes.entry(name.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }
}

#[async_trait]
impl LockService for InMemoryLockService {
    async fn acquire(&self, name: &str) -> Result<(), AppError> {
        let mutex = self.mutex_for(name);
        let guard = mutex.lock_owned().await;
        self.held.insert(name.to_string(), guard);
        Ok(())
    }

    async fn release(&self, name: &str) -> Result<(), AppError> {
        self.held.remove(name);
        Ok(())
    }
}
