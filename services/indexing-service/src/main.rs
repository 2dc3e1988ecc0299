//! Indexing Service — Main Entry Point
//!
//! Consumes indexing jobs from the message queue, extracts metadata,
//! tokenizes book bodies, and maintains the cluster-wide metadata store and
//! inverted index (spec.md §2, §4.3, §4.6, §4.7). On startup, runs the
//! filesystem-scan consistency check if the inverted index is empty.
//!
//! ## Endpoints
//! - `GET /health`, `GET /stats`
//! - `POST /index/update/:book_id`
//! - `POST /index/rebuild`
//! - `GET /index/status`

use axum::{
    routing::{get, post},
    Router,
};
use cluster_state::{ClusterState, RedisInvertedIndex, RedisLockService, RedisMetadataMap};
use common::Config;
use datalake::Datalake;
use indexing_core::Indexer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod models;
mod routes;

use routes::{
    health::health_check,
    index::{get_index_status, get_stats, index_book, rebuild_index},
};

pub struct AppState {
    pub indexer: Indexer,
    pub cluster: ClusterState,
    last_update: RwLock<Option<String>>,
}

impl AppState {
    async fn touch_last_update(&self) {
        *self.last_update.write().await = Some(chrono::Utc::now().to_rfc3339());
    }

    async fn last_update(&self) -> String {
        self.last_update.read().await.clone().unwrap_or_else(|| "never".to_string())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter("indexing_service=info,tower_http=info").init();

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

    let redis_client = match redis::Client::open(config.redis_url.clone()) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to build Redis client");
            std::process::exit(1);
        }
    };

    let cluster = ClusterState::new(
        Arc::new(RedisMetadataMap::new(redis_client.clone(), config.metadata_map_name.clone())),
        Arc::new(RedisInvertedIndex::new(redis_client.clone(), config.inverted_index_name.clone())),
        Arc::new(RedisLockService::new(redis_client, Duration::from_secs(10), Duration::from_secs(5))),
        config.index_shard_count,
    );

    let indexer = Indexer::new(datalake, cluster.clone());

    if let Err(e) = indexer.ensure_consistent_on_startup().await {
        error!(error = %e, "startup consistency check failed");
    }

    let state = Arc::new(AppState { indexer, cluster, last_update: RwLock::new(None) });

    let queue_state = state.clone();
    let broker_url = config.amqp_broker_url.clone();
    let queue_name = config.amqp_queue_name.clone();
    tokio::spawn(async move {
        mqueue::run_consumer(&broker_url, &queue_name, &queue_state.indexer).await;
    });

    info!(port = config.server_port, "indexing service starting");

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .route("/index/update/:book_id", post(index_book))
        .route("/index/rebuild", post(rebuild_index))
        .route("/index/status", get(get_index_status))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
