//! The cluster-state abstraction (spec.md §4.7): a distributed metadata
//! map, a distributed inverted-index multimap, and a named lock service,
//! each with a Redis-backed implementation and an in-memory test double.

pub mod memory_backend;
pub mod redis_backend;
pub mod sharding;
pub mod traits;

pub use memory_backend::{InMemoryInvertedIndex, InMemoryLockService, InMemoryMetadataMap};
pub use redis_backend::{RedisInvertedIndex, RedisLockService, RedisMetadataMap};
pub use sharding::{shard_for_term, shard_lock_name};
pub use traits::{with_lock, InvertedIndex, LockService, MetadataMap};

use std::sync::Arc;

/// A node's full view of the cluster state: everything `indexBook` and
/// `search` need, bundled for convenient dependency injection.
#[derive(Clone)]
pub struct ClusterState {
    pub metadata: Arc<dyn MetadataMap>,
    pub inverted_index: Arc<dyn InvertedIndex>,
    pub locks: Arc<dyn LockService>,
    pub shard_count: u32,
}

impl ClusterState {
    pub fn new(
        metadata: Arc<dyn MetadataMap>,
        inverted_index: Arc<dyn InvertedIndex>,
        locks: Arc<dyn LockService>,
        shard_count: u32,
    ) -> Self {
        Self { metadata, inverted_index, locks, shard_count }
    }

    pub fn in_memory(shard_count: u32) -> Self {
        Self::new(
            Arc::new(InMemoryMetadataMap::new()),
            Arc::new(InMemoryInvertedIndex::new()),
            Arc::new(InMemoryLockService::new()),
            shard_count,
        )
    }

    /// Adds `book_id` to `term`'s postings under the sharded lock that
    /// guards term `t`'s writers (spec.md §5): `hash(t) mod S`.
    pub async fn add_posting(&self, term: &str, book_id: u32) -> Result<(), common::AppError> {
        let shard = shard_for_term(term, self.shard_count);
        let lock_name = shard_lock_name(shard);
        with_lock(self.locks.as_ref(), &lock_name, || async {
            self.inverted_index.put(term, book_id).await
        })
        .await
    }
}
