//! # SQLite Document Store Tests
//!
//! Each test uses an in-memory database so runs stay isolated from one another.

mod common;

use chrono::{TimeZone, Utc};
use common::setup_tracing;
use ielts_ingest::{
    ingest::ExtractedDocument,
    providers::db::{sqlite::SqliteProvider, storage::DocumentStore},
    PageContent, UploadedDocument,
};
use serde_json::json;

fn sample_document() -> UploadedDocument {
    let extracted = ExtractedDocument::from_pages(vec![
        PageContent::from_raw("Reading Passage 1", Some(1), 0),
        PageContent::from_raw("Questions 1-13", Some(2), 1),
    ]);
    UploadedDocument::new(
        "cambridge-18-test-1.pdf",
        48_213,
        "application/pdf",
        json!({ "title": "Cambridge 18 Test 1", "module": "Academic Reading" }),
        extracted,
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
    )
}

async fn provider() -> SqliteProvider {
    let provider = SqliteProvider::new(":memory:")
        .await
        .expect("Failed to create SqliteProvider");
    provider
        .initialize_schema()
        .await
        .expect("Failed to initialize schema");
    provider
}

#[tokio::test]
async fn test_insert_then_get_round_trips_the_record() {
    setup_tracing();
    let provider = provider().await;
    let document = sample_document();

    let id = provider.insert_document(&document).await.unwrap();
    assert!(!id.is_empty());

    let stored = provider
        .get_document(&id)
        .await
        .unwrap()
        .expect("document should exist");
    assert_eq!(stored.id, id);
    assert_eq!(stored.document, document);
    assert_eq!(stored.document.total_pages, 2);
    assert_eq!(stored.document.file_content, "Reading Passage 1\n\nQuestions 1-13");
}

#[tokio::test]
async fn test_each_insert_gets_a_fresh_id() {
    setup_tracing();
    let provider = provider().await;
    let document = sample_document();

    let first = provider.insert_document(&document).await.unwrap();
    let second = provider.insert_document(&document).await.unwrap();
    assert_ne!(first, second);
    assert!(provider.get_document(&first).await.unwrap().is_some());
    assert!(provider.get_document(&second).await.unwrap().is_some());
}

#[tokio::test]
async fn test_unknown_id_is_none() {
    setup_tracing();
    let provider = provider().await;
    let missing = provider.get_document("does-not-exist").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_schema_initialization_is_idempotent() {
    setup_tracing();
    let provider = provider().await;
    provider.initialize_schema().await.unwrap();
    let id = provider.insert_document(&sample_document()).await.unwrap();
    assert!(provider.get_document(&id).await.unwrap().is_some());
}
