//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::crawler::CrawlStats;
use crate::storage::{DocumentRecord, DocumentUpsert, RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Document not found: {0}")]
    DocumentNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The crawler only needs the document operations; runs and statistics back
/// the command-line reports.
pub trait Storage {
    // ===== Documents =====

    /// Looks up the stored document for a normalized URL
    fn find_by_url(&self, url: &str) -> StorageResult<Option<DocumentRecord>>;

    /// Inserts a document, or updates it in place when its URL is known
    ///
    /// Stamps both the crawl and index timestamps and returns the
    /// document ID. An empty URL or content hash is a
    /// [`StorageError::ConstraintViolation`].
    fn upsert_document(&mut self, document: &DocumentUpsert<'_>) -> StorageResult<i64>;

    /// Updates only the last-crawled timestamp of a document
    fn touch_document(&mut self, doc_id: i64) -> StorageResult<()>;

    /// Gets total document count
    fn count_documents(&self) -> StorageResult<u64>;

    // ===== Run Management =====

    /// Creates a new crawl run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Records the final status, counters and error list of a run
    fn finish_run(&mut self, run_id: i64, status: RunStatus, stats: &CrawlStats)
        -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;
}
