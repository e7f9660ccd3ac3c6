//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Conditional HTTP fetching with ETag / Last-Modified revalidation
//! - HTML link extraction
//! - Depth-bounded crawl orchestration and run statistics

mod coordinator;
mod fetcher;
mod parser;
mod stats;

pub use coordinator::{run_crawl, Crawler};
pub use fetcher::{
    build_http_client, fetch_conditional, is_html, FetchOutcome, Validators, ACCEPT_HTML,
};
pub use parser::extract_links;
pub use stats::CrawlStats;
