use crate::{
    providers::db::storage::{DocumentStore, StoreError},
    types::{PageContent, StoredDocument, UploadedDocument},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::{self, Debug};
use tracing::{debug, info};
use turso::{Database, Row, Value as TursoValue};
use uuid::Uuid;

pub mod sql;

/// A document store backed by a local SQLite database through Turso.
///
/// When cloned, it shares the same underlying database, allowing concurrent
/// handlers to write through one provider.
#[derive(Clone)]
pub struct SqliteProvider {
    /// The Turso database instance. It's cloneable and thread-safe.
    pub db: Database,
}

impl SqliteProvider {
    /// Opens (or creates) the database at `db_path`. Use ":memory:" for an
    /// isolated in-memory database.
    pub async fn new(db_path: &str) -> Result<Self, StoreError> {
        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        // PRAGMA returns a row, so it goes through `query`.
        conn.query("PRAGMA journal_mode=WAL;", ())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { db })
    }

    /// Ensures that all required tables exist. Idempotent; run on every startup.
    pub async fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ()).await?;
        }
        Ok(())
    }
}

impl Debug for SqliteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteProvider").finish_non_exhaustive()
    }
}

#[async_trait]
impl DocumentStore for SqliteProvider {
    async fn insert_document(&self, document: &UploadedDocument) -> Result<String, StoreError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let id = Uuid::new_v4().to_string();
        let file_size = i64::try_from(document.file_size)
            .map_err(|_| StoreError::Corrupt(format!("file size {} overflows", document.file_size)))?;
        let total_pages = i64::try_from(document.total_pages)
            .map_err(|_| StoreError::Corrupt(format!("page count {} overflows", document.total_pages)))?;

        let params = vec![
            TursoValue::Text(id.clone()),
            TursoValue::Text(document.file_name.clone()),
            TursoValue::Integer(file_size),
            TursoValue::Text(document.file_type.clone()),
            TursoValue::Text(serde_json::to_string(&document.file_metadata)?),
            TursoValue::Text(document.file_content.clone()),
            TursoValue::Text(serde_json::to_string(&document.pages)?),
            TursoValue::Integer(total_pages),
            TursoValue::Text(document.created_at.to_rfc3339()),
        ];

        conn.execute(sql::INSERT_UPLOADED_DOCUMENT, params).await?;
        info!(document_id = %id, file_name = %document.file_name, "Stored uploaded document.");
        Ok(id)
    }

    async fn get_document(&self, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        debug!(document_id = %id, "Fetching uploaded document.");
        let conn = self
            .db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let mut rows = conn
            .query(
                sql::SELECT_UPLOADED_DOCUMENT_BY_ID,
                vec![TursoValue::Text(id.to_string())],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_document(&row)?)),
            None => Ok(None),
        }
    }
}

// --- Row Decoding ---

fn text_at(row: &Row, index: usize, column: &str) -> Result<String, StoreError> {
    match row.get_value(index)? {
        TursoValue::Text(s) => Ok(s),
        other => Err(StoreError::Corrupt(format!(
            "column '{column}' expected text, found {other:?}"
        ))),
    }
}

fn integer_at(row: &Row, index: usize, column: &str) -> Result<i64, StoreError> {
    match row.get_value(index)? {
        TursoValue::Integer(i) => Ok(i),
        other => Err(StoreError::Corrupt(format!(
            "column '{column}' expected integer, found {other:?}"
        ))),
    }
}

fn row_to_document(row: &Row) -> Result<StoredDocument, StoreError> {
    let id = text_at(row, 0, "id")?;
    let file_size = integer_at(row, 2, "file_size")?;
    let total_pages = integer_at(row, 7, "total_pages")?;
    let pages: Vec<PageContent> = serde_json::from_str(&text_at(row, 6, "pages")?)?;
    let created_at = DateTime::parse_from_rfc3339(&text_at(row, 8, "created_at")?)
        .map_err(|e| StoreError::Corrupt(format!("invalid created_at: {e}")))?
        .with_timezone(&Utc);

    let document = UploadedDocument {
        file_name: text_at(row, 1, "file_name")?,
        file_size: u64::try_from(file_size)
            .map_err(|_| StoreError::Corrupt(format!("negative file_size {file_size}")))?,
        file_type: text_at(row, 3, "file_type")?,
        file_metadata: serde_json::from_str(&text_at(row, 4, "file_metadata")?)?,
        file_content: text_at(row, 5, "file_content")?,
        total_pages: usize::try_from(total_pages)
            .map_err(|_| StoreError::Corrupt(format!("negative total_pages {total_pages}")))?,
        pages,
        created_at,
    };

    Ok(StoredDocument { id, document })
}
