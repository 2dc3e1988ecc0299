//! Search Service — Main Entry Point
//!
//! Answers ranked keyword queries against the cluster-wide metadata store
//! and inverted index (spec.md §2, §4.4, §4.7). Read-only: never mutates
//! cluster state.
//!
//! ## Endpoints
//! - `GET /health`, `GET /stats`
//! - `GET /search`
//! - `GET /books`

use axum::{routing::get, Router};
use cluster_state::{ClusterState, RedisInvertedIndex, RedisLockService, RedisMetadataMap};
use common::Config;
use search_core::Searcher;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod models;
mod routes;

use routes::{books::list_books, health::health_check, search::search, stats::get_stats};

pub struct AppState {
    pub searcher: Searcher,
    pub cluster: ClusterState,
    pub default_limit: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter("search_service=info,tower_http=info").init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
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

    let searcher = Searcher::new(cluster.clone(), config.search_max_results, config.search_default_limit);

    let state =
        Arc::new(AppState { searcher, cluster, default_limit: config.search_default_limit });

    info!(port = config.server_port, "search service starting");

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .route("/search", get(search))
        .route("/books", get(list_books))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
