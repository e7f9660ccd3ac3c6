//! Sumi-Index: a seed-list crawler that feeds a full-text index
//!
//! This crate crawls a user-maintained list of seed URLs plus one level of
//! outbound links, revalidates pages with conditional requests, and reduces
//! each HTML page to a normalized token stream and a short snippet.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod text;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Index operations
///
/// Per-URL crawl failures never surface here; they are collected as strings
/// in [`crawler::CrawlStats`]. This type covers failures that end the call.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Empty URL")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlStats, Crawler};
pub use text::{ProcessedContent, Tokenizer};
pub use url::{normalize_url, resolve_link};
