//! Storage module for persisting crawl data
//!
//! This module handles all persistence for the indexer, including:
//! - SQLite database initialization and schema management
//! - The document store: one row per normalized URL with its snippet,
//!   token text, content hash and cache validators
//! - Run tracking with final counters and error lists
//! - The editable seed list file

mod schema;
mod seeds;
mod sqlite;
mod traits;

pub use seeds::{parse_seed_list, SeedListFile};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::IndexError;

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(IndexError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, IndexError> {
    SqliteStorage::new(path)
}

/// A stored document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub doc_id: i64,
    pub source_url: String,
    pub parent_url: Option<String>,
    pub snippet: String,
    pub full_content: String,
    pub content_hash: String,
    pub etag: Option<String>,
    pub last_modified_header: Option<String>,
    pub last_crawled_at: String,
    pub last_indexed_at: String,
}

/// Fields written when a page is (re)indexed
#[derive(Debug, Clone)]
pub struct DocumentUpsert<'a> {
    pub source_url: &'a str,
    pub parent_url: Option<&'a str>,
    pub snippet: &'a str,
    pub full_content: &'a str,
    pub content_hash: &'a str,
    pub etag: Option<&'a str>,
    pub last_modified_header: Option<&'a str>,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub processed: u64,
    pub indexed: u64,
    pub skipped: u64,
    pub errors: Vec<String>,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    /// The run deadline passed before the work stack was drained
    Interrupted,
    /// A storage failure ended the run early
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "interrupted" => Some(Self::Interrupted),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
