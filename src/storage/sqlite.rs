//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::crawler::CrawlStats;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{DocumentRecord, DocumentUpsert, RunRecord, RunStatus};
use crate::IndexError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const DOCUMENT_COLUMNS: &str = "doc_id, source_url, parent_url, snippet, full_content, content_hash,
     etag, last_modified_header, last_crawled_at, last_indexed_at";

const RUN_COLUMNS: &str =
    "id, started_at, finished_at, config_hash, status, processed, indexed, skipped";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(IndexError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, IndexError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        // Initialize schema
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, IndexError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn run_errors(&self, run_id: i64) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT message FROM crawl_run_errors WHERE run_id = ?1 ORDER BY position",
        )?;
        let errors = stmt
            .query_map(params![run_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(errors)
    }

    fn with_errors(&self, mut run: RunRecord) -> StorageResult<RunRecord> {
        run.errors = self.run_errors(run.id)?;
        Ok(run)
    }
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<DocumentRecord> {
    Ok(DocumentRecord {
        doc_id: row.get(0)?,
        source_url: row.get(1)?,
        parent_url: row.get(2)?,
        snippet: row.get(3)?,
        full_content: row.get(4)?,
        content_hash: row.get(5)?,
        etag: row.get(6)?,
        last_modified_header: row.get(7)?,
        last_crawled_at: row.get(8)?,
        last_indexed_at: row.get(9)?,
    })
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
        processed: row.get::<_, i64>(5)? as u64,
        indexed: row.get::<_, i64>(6)? as u64,
        skipped: row.get::<_, i64>(7)? as u64,
        errors: Vec::new(),
    })
}

impl Storage for SqliteStorage {
    // ===== Documents =====

    fn find_by_url(&self, url: &str) -> StorageResult<Option<DocumentRecord>> {
        let sql = format!("SELECT {} FROM documents WHERE source_url = ?1", DOCUMENT_COLUMNS);
        let document = self
            .conn
            .query_row(&sql, params![url], document_from_row)
            .optional()?;
        Ok(document)
    }

    fn upsert_document(&mut self, document: &DocumentUpsert<'_>) -> StorageResult<i64> {
        if document.source_url.is_empty() {
            return Err(StorageError::ConstraintViolation(
                "source_url must not be empty".to_string(),
            ));
        }
        if document.content_hash.is_empty() {
            return Err(StorageError::ConstraintViolation(format!(
                "content_hash must not be empty for {}",
                document.source_url
            )));
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO documents (source_url, parent_url, snippet, full_content, content_hash,
                                    etag, last_modified_header, last_crawled_at, last_indexed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             ON CONFLICT(source_url) DO UPDATE SET
                parent_url = excluded.parent_url,
                snippet = excluded.snippet,
                full_content = excluded.full_content,
                content_hash = excluded.content_hash,
                etag = excluded.etag,
                last_modified_header = excluded.last_modified_header,
                last_crawled_at = excluded.last_crawled_at,
                last_indexed_at = excluded.last_indexed_at",
            params![
                document.source_url,
                document.parent_url,
                document.snippet,
                document.full_content,
                document.content_hash,
                document.etag,
                document.last_modified_header,
                now,
            ],
        )?;

        // last_insert_rowid is stale when the conflict branch ran
        let doc_id = self.conn.query_row(
            "SELECT doc_id FROM documents WHERE source_url = ?1",
            params![document.source_url],
            |row| row.get(0),
        )?;
        Ok(doc_id)
    }

    fn touch_document(&mut self, doc_id: i64) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE documents SET last_crawled_at = ?1 WHERE doc_id = ?2",
            params![now, doc_id],
        )?;
        if updated == 0 {
            return Err(StorageError::DocumentNotFound(doc_id));
        }
        Ok(())
    }

    fn count_documents(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO crawl_runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        stats: &CrawlStats,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let updated = tx.execute(
            "UPDATE crawl_runs
             SET status = ?1, finished_at = ?2, processed = ?3, indexed = ?4, skipped = ?5
             WHERE id = ?6",
            params![
                status.to_db_string(),
                now,
                stats.processed as i64,
                stats.indexed as i64,
                stats.skipped as i64,
                run_id,
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO crawl_run_errors (run_id, position, message) VALUES (?1, ?2, ?3)",
            )?;
            for (position, message) in stats.errors.iter().enumerate() {
                stmt.execute(params![run_id, position as i64, message])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let sql = format!("SELECT {} FROM crawl_runs WHERE id = ?1", RUN_COLUMNS);
        let run = self
            .conn
            .query_row(&sql, params![run_id], run_from_row)
            .map_err(|_| StorageError::RunNotFound(run_id))?;

        self.with_errors(run)
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let sql = format!("SELECT {} FROM crawl_runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS);
        let run = self.conn.query_row(&sql, [], run_from_row).optional()?;

        match run {
            Some(run) => Ok(Some(self.with_errors(run)?)),
            None => Ok(None),
        }
    }
}
