//! Integration Tests for Indexing Service
//!
//! Exercises the live HTTP routes against a running instance on
//! `localhost:7002`.

use serde_json::Value;

#[tokio::test]
async fn test_health_check() {
    let response = reqwest::get("http://0.0.0.0:7002/health").await.expect("Failed to make request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "running");
    assert_eq!(body["service"], "indexing-service");
}

#[tokio::test]
async fn test_index_status() {
    let response = reqwest::get("http://0.0.0.0:7002/index/status").await.expect("Failed to make request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["books_indexed"].is_number());
    assert!(body["unique_words"].is_number());
    assert!(body["last_update"].is_string());
}

#[tokio::test]
async fn test_index_rebuild() {
    let client = reqwest::Client::new();

    let response = client.post("http://0.0.0.0:7002/index/rebuild").send().await.expect("Failed to make request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "completed");
    assert!(body["books_indexed"].is_number());
}

#[tokio::test]
async fn test_index_update_non_existing_book() {
    let client = reqwest::Client::new();
    let book_id = "999999";

    let response = client
        .post(&format!("http://0.0.0.0:7002/index/update/{}", book_id))
        .send()
        .await
        .expect("Failed to make request");

    // The local datalake has no copy of this identifier, so indexing fails.
    assert!(response.status().is_server_error());
}

#[tokio::test]
async fn test_stats() {
    let response = reqwest::get("http://0.0.0.0:7002/stats").await.expect("Failed to make request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["total_books"].is_number());
    assert!(body["unique_words"].is_number());
}
