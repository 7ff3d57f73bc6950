//! # SQLite Specific SQL Queries
//!
//! This module centralizes SQL strings for the SQLite provider.
//! This makes the core logic cleaner and isolates database-specific syntax.

pub const CREATE_UPLOADED_DOCUMENTS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS uploaded_documents (
        id TEXT PRIMARY KEY,
        file_name TEXT NOT NULL,
        file_size INTEGER NOT NULL,
        file_type TEXT NOT NULL,
        file_metadata TEXT NOT NULL,
        file_content TEXT NOT NULL,
        pages TEXT NOT NULL,
        total_pages INTEGER NOT NULL,
        created_at TEXT NOT NULL
    );
";

/// Every statement needed to bring an empty database up to date.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[CREATE_UPLOADED_DOCUMENTS_TABLE];

pub const INSERT_UPLOADED_DOCUMENT: &str = "
    INSERT INTO uploaded_documents
        (id, file_name, file_size, file_type, file_metadata, file_content, pages, total_pages, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
";

pub const SELECT_UPLOADED_DOCUMENT_BY_ID: &str = "
    SELECT id, file_name, file_size, file_type, file_metadata, file_content, pages, total_pages, created_at
    FROM uploaded_documents
    WHERE id = ?
";
