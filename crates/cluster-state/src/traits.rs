//! The two distributed collections plus the named mutex that every service
//! builds on (spec.md §4.7).

use async_trait::async_trait;
use common::AppError;
use gutenberg::BookMetadata;
use std::collections::{HashMap, HashSet};

/// `metadata`: keyed map, `BookId -> BookMetadata`, at most one entry per
/// identifier.
#[async_trait]
pub trait MetadataMap: Send + Sync {
    async fn get(&self, id: u32) -> Result<Option<BookMetadata>, AppError>;
    async fn get_all(&self, ids: &[u32]) -> Result<HashMap<u32, BookMetadata>, AppError>;
    async fn put(&self, id: u32, metadata: BookMetadata) -> Result<(), AppError>;
    async fn contains_key(&self, id: u32) -> Result<bool, AppError>;
    async fn size(&self) -> Result<usize, AppError>;
    async fn values(&self) -> Result<Vec<BookMetadata>, AppError>;
    async fn clear(&self) -> Result<(), AppError>;
}

/// `invertedIndex`: keyed multi-valued map, `term -> set<BookId>`. Values
/// are stored as plain integers per the resolution of the open question in
/// spec.md §9 ("Set<Integer> is recommended for compactness").
#[async_trait]
pub trait InvertedIndex: Send + Sync {
    async fn get(&self, term: &str) -> Result<HashSet<u32>, AppError>;
    async fn put(&self, term: &str, book_id: u32) -> Result<(), AppError>;
    async fn contains_entry(&self, term: &str, book_id: u32) -> Result<bool, AppError>;
    async fn key_set(&self) -> Result<HashSet<String>, AppError>;
    async fn clear(&self) -> Result<(), AppError>;
}

/// A globally visible mutex identified by a UTF-8 name.
#[async_trait]
pub trait LockService: Send + Sync {
    /// Blocks (subject to the implementation's own contention timeout)
    /// until `name` is held exclusively by this caller.
    async fn acquire(&self, name: &str) -> Result<(), AppError>;

    /// Releases a lock this caller previously acquired.
    async fn release(&self, name: &str) -> Result<(), AppError>;
}

/// Runs `f` while holding the named lock, always releasing it afterward —
/// the `lock(name).lock()/.unlock()` pairing from spec.md §4.7 collapsed
/// into a single call so callers can't forget to unlock.
pub async fn with_lock<'a, F, Fut, T>(
    locks: &'a dyn LockService,
    name: &str,
    f: F,
) -> Result<T, AppError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>,
{
    locks.acquire(name).await?;
    let result = f().await;
    locks.release(name).await?;
    result
}
