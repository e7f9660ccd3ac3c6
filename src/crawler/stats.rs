//! Run-scoped crawl state

use std::collections::HashSet;

/// Counters and error messages accumulated over one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// HTML pages that produced tokens and were hashed
    pub processed: u64,

    /// Pages written to the document store
    pub indexed: u64,

    /// Pages left as they were (304, non-HTML, unchanged content)
    pub skipped: u64,

    /// One human-readable line per failed seed or URL, in order of occurrence
    pub errors: Vec<String>,
}

impl CrawlStats {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// State threaded through a single traversal
#[derive(Debug, Default)]
pub(crate) struct CrawlContext {
    visited: HashSet<String>,
    pub(crate) stats: CrawlStats,
}

impl CrawlContext {
    /// Marks a URL as visited, returning false if it already was
    pub(crate) fn mark_visited(&mut self, url: &str) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string())
    }

    pub(crate) fn record_error(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.stats.errors.push(message);
    }

    pub(crate) fn into_stats(self) -> CrawlStats {
        self.stats
    }
}
