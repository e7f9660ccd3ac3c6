//! Output module for console reports
//!
//! This module handles:
//! - Rendering the result of a crawl run
//! - Rendering index statistics from storage

pub mod stats;

pub use stats::{load_statistics, print_statistics, IndexStatistics};

use crate::crawler::CrawlStats;

/// Headline shown when a run collected errors
pub const STATUS_WITH_ISSUES: &str = "Crawler finished with issues";

/// Headline shown when a run collected no errors
pub const STATUS_SUCCESS: &str = "Crawler ran successfully";

/// The headline for a finished run
pub fn status_message(stats: &CrawlStats) -> &'static str {
    if stats.has_errors() {
        STATUS_WITH_ISSUES
    } else {
        STATUS_SUCCESS
    }
}

/// Formats the counters and error lines of a run
pub fn format_crawl_report(stats: &CrawlStats) -> String {
    let mut lines = vec![
        status_message(stats).to_string(),
        String::new(),
        format!("  Processed: {}", stats.processed),
        format!("  Indexed:   {}", stats.indexed),
        format!("  Skipped:   {}", stats.skipped),
    ];

    if stats.has_errors() {
        lines.push(String::new());
        lines.push(format!("Errors ({}):", stats.errors.len()));
        lines.extend(stats.errors.iter().map(|error| format!("  - {}", error)));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Prints the run report to stdout
pub fn print_crawl_report(stats: &CrawlStats) {
    print!("{}", format_crawl_report(stats));
}
