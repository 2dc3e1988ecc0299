//! Peer replication of freshly ingested books (spec.md §4.5).

pub mod client;
pub mod receiver;

pub use client::{candidate_targets, ReplicationClient};
pub use receiver::rehydrate;
