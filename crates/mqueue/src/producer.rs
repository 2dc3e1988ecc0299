//! Producer contract (spec.md §4.6): the payload is the decimal identifier
//! itself, marked persistent, with a correlation id equal to the payload
//! and a `sourceNodeIp` header property.

use common::AppError;
use gutenberg::BookId;
use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::{AMQPValue, FieldTable, LongString};
use lapin::{BasicProperties, Channel, ConnectionProperties};
use tracing::info;

pub struct QueueProducer {
    channel: Channel,
    queue_name: String,
    source_node_ip: String,
}

impl QueueProducer {
    pub async fn connect(broker_url: &str, queue_name: &str, source_node_ip: &str) -> Result<Self, AppError> {
        let options = ConnectionProperties::default()
            .with_executor(tokio_executor_trait::Tokio::current())
            .with_reactor(tokio_reactor_trait::Tokio);
        let connection = lapin::Connection::connect(broker_url, options)
            .await
            .map_err(|e| AppError::Queue(e.to_string()))?;
        let channel = connection.create_channel().await.map_err(|e| AppError::Queue(e.to_string()))?;
        channel
            .queue_declare(queue_name, QueueDeclareOptions { durable: true, ..Default::default() }, FieldTable::default())
            .await
            .map_err(|e| AppError::Queue(e.to_string()))?;

        Ok(Self { channel, queue_name: queue_name.to_string(), source_node_ip: source_node_ip.to_string() })
    }

    pub async fn publish_index_job(&self, id: BookId) -> Result<(), AppError> {
        let payload = id.value().to_string();

        let mut headers = FieldTable::default();
        headers.insert("sourceNodeIp".into(), AMQPValue::LongString(LongString::from(self.source_node_ip.clone())));

        let properties = BasicProperties::default()
            .with_delivery_mode(2) // persistent
            .with_correlation_id(payload.clone().into())
            .with_headers(headers);

        self.channel
            .basic_publish(
                "",
                &self.queue_name,
                BasicPublishOptions::default(),
                payload.as_bytes(),
                properties,
            )
            .await
            .map_err(|e| AppError::Queue(e.to_string()))?
            .await
            .map_err(|e| AppError::Queue(e.to_string()))?;

        info!(book_id = %id, queue = %self.queue_name, "published indexing job");
        Ok(())
    }
}
