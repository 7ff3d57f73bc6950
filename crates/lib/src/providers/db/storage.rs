use crate::types::{StoredDocument, UploadedDocument};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage connection error: {0}")]
    Connection(String),
    #[error("Database error: {0}")]
    Database(#[from] turso::Error),
    #[error("Failed to serialize document field: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Stored document is corrupt: {0}")]
    Corrupt(String),
}

/// Persistence for uploaded document records.
///
/// Records are write-once: there is no update or delete.
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    /// Inserts the record in a single write and returns its generated id.
    async fn insert_document(&self, document: &UploadedDocument) -> Result<String, StoreError>;

    /// Reads a record back by id.
    async fn get_document(&self, id: &str) -> Result<Option<StoredDocument>, StoreError>;
}
