//! Ingestion Service — Main Entry Point
//!
//! Downloads Project Gutenberg books, splits and stores them in the local
//! datalake, replicates the pair to one peer, and publishes an indexing job
//! onto the cluster-wide message queue (spec.md §2, §4.1, §4.2, §4.5, §4.6).
//!
//! ## Endpoints
//! - `GET /health` → service health check
//! - `POST /ingest/:book_id` → trigger book ingestion
//! - `GET /ingest/status/:book_id` → check availability of a book
//! - `GET /ingest/list` → list all downloaded books
//! - `POST /api/datalake/store` → receive a replicated book from a peer

use axum::{
    routing::{get, post},
    Router,
};
use common::Config;
use datalake::Datalake;
use gutenberg::Downloader;
use mqueue::QueueProducer;
use replication::ReplicationClient;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod models;
mod routes;

use routes::{
    health::health_check,
    ingest::{check_status, ingest_book, list_books, store_from_datalake},
};

/// A configured replication client plus the cluster membership needed to
/// pick candidates at ingest time.
pub struct Replication {
    pub client: ReplicationClient,
}

pub struct AppState {
    pub datalake: Datalake,
    pub downloader: Downloader,
    pub replication: Option<Replication>,
    pub queue_producer: Option<QueueProducer>,
    pub config: Config,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter("ingestion_service=info,tower_http=info").init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let datalake = match config.datalake_type {
        common::DatalakeType::Bucket => {
            Datalake::bucket(&config.datalake_path, &config.datalake_tracking_filename, config.datalake_bucket_size)
        }
        common::DatalakeType::Timestamp => {
            Datalake::timestamp(&config.datalake_path, &config.datalake_tracking_filename)
        }
    };

    let downloader = match Downloader::new(
        config.gutenberg_base_url.clone(),
        Duration::from_millis(config.gutenberg_download_timeout_ms),
    ) {
        Ok(d) => d,
        Err(e) => {
            error!(error = %e, "failed to build Gutenberg downloader");
            std::process::exit(1);
        }
    };

    let replication = if config.datalake_replication_enabled {
        match ReplicationClient::new(
            config.datalake_replication_port,
            &config.datalake_replication_endpoint,
            Duration::from_millis(config.datalake_replication_timeout_ms),
        ) {
            Ok(client) => Some(Replication { client }),
            Err(e) => {
                error!(error = %e, "failed to build replication client");
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    let queue_producer = match QueueProducer::connect(
        &config.amqp_broker_url,
        &config.amqp_queue_name,
        &config.cluster_current_node_ip,
    )
    .await
    {
        Ok(producer) => Some(producer),
        Err(e) => {
            error!(error = %e, "failed to connect to message broker");
            std::process::exit(1);
        }
    };

    info!(port = config.server_port, "ingestion service starting");

    let state = Arc::new(AppState { datalake, downloader, replication, queue_producer, config: config.clone() });

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/ingest/:book_id", post(ingest_book))
        .route("/ingest/status/:book_id", get(check_status))
        .route("/ingest/list", get(list_books))
        .route("/api/datalake/store", post(store_from_datalake))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
