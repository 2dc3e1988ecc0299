//! Consumer contract (spec.md §4.6): a long-running background worker that
//! receives indexing jobs and calls [`Indexer::index_book`]. Transient
//! broker failures sleep and reconnect; malformed payloads are logged and
//! dropped; any other error leaves the message unacknowledged so the
//! broker redelivers it.

use futures_lite::stream::StreamExt;
use indexing_core::Indexer;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::ConnectionProperties;
use std::time::Duration;
use tracing::{error, info, warn};

const RECONNECT_BACKOFF: Duration = Duration::from_secs(10);

/// Runs forever, consuming indexing jobs from `queue_name` against
/// `broker_url` and applying them via `indexer`. Intended to be spawned as
/// a background task on the indexing service.
pub async fn run_consumer(broker_url: &str, queue_name: &str, indexer: &Indexer) -> ! {
    loop {
        match consume_until_failure(broker_url, queue_name, indexer).await {
            Ok(()) => {}
            Err(e) => warn!(error = %e, "message queue consumer disconnected"),
        }
        warn!(backoff_secs = RECONNECT_BACKOFF.as_secs(), "reconnecting to broker after backoff");
        tokio::time::sleep(RECONNECT_BACKOFF).await;
    }
}

async fn consume_until_failure(
    broker_url: &str,
    queue_name: &str,
    indexer: &Indexer,
) -> Result<(), lapin::Error> {
    let options = ConnectionProperties::default()
        .with_executor(tokio_executor_trait::Tokio::current())
        .with_reactor(tokio_reactor_trait::Tokio);
    let connection = lapin::Connection::connect(broker_url, options).await?;
    let channel = connection.create_channel().await?;
    channel
        .queue_declare(queue_name, QueueDeclareOptions { durable: true, ..Default::default() }, FieldTable::default())
        .await?;

    let mut consumer = channel
        .basic_consume(queue_name, "indexing-consumer", BasicConsumeOptions::default(), FieldTable::default())
        .await?;

    info!(queue = %queue_name, "message queue consumer connected");

    while let Some(delivery) = consumer.next().await {
        let delivery = delivery?;
        let payload = String::from_utf8_lossy(&delivery.data).trim().to_string();

        let id = match payload.parse::<u32>().ok().and_then(gutenberg::BookId::new) {
            Some(id) => id,
            None => {
                error!(payload = %payload, "dropping malformed indexing job payload");
                delivery.ack(BasicAckOptions::default()).await?;
                continue;
            }
        };

        match indexer.index_book(id).await {
            Ok(_) => {
                delivery.ack(BasicAckOptions::default()).await?;
            }
            Err(e @ (common::AppError::NotFound(_) | common::AppError::BookFormat(_))) => {
                error!(book_id = %id, error = %e, "dropping indexing job, not retryable");
                delivery.ack(BasicAckOptions::default()).await?;
            }
            Err(e) => {
                error!(book_id = %id, error = %e, "indexing job failed, leaving unacknowledged for redelivery");
                delivery.nack(BasicNackOptions { requeue: true, ..Default::default() }).await?;
            }
        }
    }

    Ok(())
}
