//! The AMQP bridge carrying indexing jobs from ingestors to indexers
//! (spec.md §4.6).

pub mod consumer;
pub mod producer;

pub use consumer::run_consumer;
pub use producer::QueueProducer;
