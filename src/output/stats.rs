//! Statistics generation from the index database
//!
//! This module provides functionality for extracting and displaying
//! index statistics from the storage layer.

use crate::storage::{RunRecord, Storage};
use crate::IndexError;

/// Index statistics summary
#[derive(Debug, Clone)]
pub struct IndexStatistics {
    /// Number of documents in the store
    pub total_documents: u64,

    /// The most recent crawl run, if any
    pub last_run: Option<RunRecord>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(IndexStatistics)` - Successfully loaded statistics
/// * `Err(IndexError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<IndexStatistics, IndexError> {
    let total_documents = storage.count_documents()?;
    let last_run = storage.get_latest_run()?;

    Ok(IndexStatistics {
        total_documents,
        last_run,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &IndexStatistics) {
    println!("=== Index Statistics ===\n");

    println!("Overview:");
    println!("  Documents indexed: {}", stats.total_documents);
    println!();

    let Some(run) = &stats.last_run else {
        println!("No crawl runs recorded yet.");
        return;
    };

    println!("Last Run (#{}):", run.id);
    println!("  Status: {}", run.status.to_db_string());
    println!("  Started: {}", run.started_at);
    if let Some(finished) = &run.finished_at {
        println!("  Finished: {}", finished);
    }
    println!("  Config hash: {}", run.config_hash);
    println!(
        "  Processed: {}, indexed: {}, skipped: {}",
        run.processed, run.indexed, run.skipped
    );

    if !run.errors.is_empty() {
        println!();
        println!("Errors ({}):", run.errors.len());
        for error in &run.errors {
            println!("  - {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::CrawlStats;
    use crate::storage::{DocumentUpsert, RunStatus, SqliteStorage};

    #[test]
    fn test_load_statistics_empty() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let stats = load_statistics(&storage).unwrap();

        assert_eq!(stats.total_documents, 0);
        assert!(stats.last_run.is_none());
    }

    #[test]
    fn test_load_statistics_after_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_document(&DocumentUpsert {
                source_url: "http://a.com/",
                parent_url: None,
                snippet: "A",
                full_content: "a",
                content_hash: "h",
                etag: None,
                last_modified_header: None,
            })
            .unwrap();
        let run_id = storage.create_run("hash").unwrap();
        let crawl = CrawlStats {
            processed: 1,
            indexed: 1,
            ..CrawlStats::default()
        };
        storage
            .finish_run(run_id, RunStatus::Completed, &crawl)
            .unwrap();

        let stats = load_statistics(&storage).unwrap();
        assert_eq!(stats.total_documents, 1);

        let last_run = stats.last_run.unwrap();
        assert_eq!(last_run.id, run_id);
        assert_eq!(last_run.indexed, 1);
    }
}
